//! The host loop: frames, fixed ticks and physics.
use crate::{
    config::SimConfig,
    operator::SteeringOperator,
    world::{HallwayWorld, PhysicsEvent},
    RandomPolicy,
};
use anyhow::{anyhow, Result};
use hallway_core::{
    record::{Record, Recorder},
    ControlMode, DecisionProtocol, DecisionScheduler, KeyState, World,
};
use log::info;

/// Angle within which the operator walks forward instead of turning, in degrees.
const STEERING_TOLERANCE: f32 = 8.0;

/// Upper bound of frames per episode, relative to the frames of the maximum duration.
const MAX_FRAMES_FACTOR: f32 = 4.0;

/// Runs episodes of the hallway task, playing the role of the game engine.
///
/// Every rendered frame samples the operator's keys and calls
/// [`DecisionScheduler::frame_tick`]. Fixed ticks are run at the fixed rate of the
/// scheduler from the accumulated frame time; each one is followed by a physics
/// step whose contact events are reported back to the scheduler.
pub struct Runner<P: DecisionProtocol> {
    scheduler: DecisionScheduler,
    world: HallwayWorld,
    protocol: P,
    operator: SteeringOperator,
    frame_dt: f32,
}

impl Runner<RandomPolicy> {
    /// Builds a runner with a [`RandomPolicy`] as the decision backend.
    pub fn build(config: &SimConfig) -> Result<Self> {
        Self::with_protocol(config, RandomPolicy::new(config.seed))
    }
}

impl<P: DecisionProtocol> Runner<P> {
    /// Builds a runner with the given decision backend.
    pub fn with_protocol(config: &SimConfig, protocol: P) -> Result<Self> {
        if !(config.frame_rate > 0.0) {
            return Err(anyhow!("frame_rate must be positive, got {}", config.frame_rate));
        }
        let scheduler = DecisionScheduler::build(config.scheduler.clone())?;
        let world = HallwayWorld::build(config.world.clone(), config.seed);
        fastrand::seed(config.seed);

        Ok(Self {
            scheduler,
            world,
            protocol,
            operator: SteeringOperator::new(STEERING_TOLERANCE, config.max_hesitation_frames),
            frame_dt: 1.0 / config.frame_rate,
        })
    }

    /// The decision scheduler.
    pub fn scheduler(&self) -> &DecisionScheduler {
        &self.scheduler
    }

    /// The world.
    pub fn world(&self) -> &HallwayWorld {
        &self.world
    }

    /// The decision backend.
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Runs one episode to its end and returns its record.
    pub fn run_episode(&mut self) -> Result<Record> {
        self.scheduler.begin_episode(&mut self.world);
        self.operator.reset();

        let fixed_dt = self.scheduler.config().fixed_delta;
        let max_frames = (MAX_FRAMES_FACTOR * self.scheduler.config().max_episode_duration
            / self.frame_dt)
            .ceil() as usize;
        let mut accumulator = 0.0;

        for _ in 0..max_frames {
            let keys = self.operator_keys();
            self.scheduler.frame_tick(keys, self.frame_dt);

            accumulator += self.frame_dt;
            while accumulator >= fixed_dt {
                accumulator -= fixed_dt;
                if let Some(record) = self.fixed_tick(fixed_dt) {
                    return Ok(record);
                }
            }
        }

        Err(anyhow!("Episode did not end within {} frames", max_frames))
    }

    /// Runs `n` episodes, writing every record to `recorder`.
    ///
    /// Records are also stored and flushed every `flush_interval` episodes.
    pub fn run<R: Recorder>(
        &mut self,
        n: usize,
        flush_interval: usize,
        recorder: &mut R,
    ) -> Result<()> {
        for i in 0..n {
            let record = self.run_episode()?;
            recorder.write(record.clone());
            recorder.store(record);
            if flush_interval > 0 && (i + 1) % flush_interval == 0 {
                recorder.flush((i + 1) as _);
            }
        }
        recorder.flush(n as _);
        info!("Ran {} episodes", n);
        Ok(())
    }

    fn operator_keys(&mut self) -> KeyState {
        if self.scheduler.mode() != ControlMode::Interactive {
            return KeyState::RELEASED;
        }
        let goal = self
            .scheduler
            .episode()
            .and_then(|e| self.world.pad_position(e.desired_outcome));
        match goal {
            Some(goal) => self.operator.keys(&self.world.agent_state(), goal),
            None => KeyState::RELEASED,
        }
    }

    fn fixed_tick(&mut self, dt: f32) -> Option<Record> {
        if let Some(record) = self.scheduler.fixed_tick(&mut self.world, &mut self.protocol) {
            return Some(record);
        }
        if self.scheduler.state().is_replaying() {
            return None;
        }

        for event in self.world.step_physics(dt) {
            match event {
                PhysicsEvent::WallContact { dt } => self.scheduler.on_wall_contact(dt),
                PhysicsEvent::PadEntered { symbol_is_x } => {
                    let outcome_matches = self
                        .scheduler
                        .episode()
                        .map_or(false, |e| e.matches(symbol_is_x));
                    let record = self.scheduler.on_goal_triggered(
                        outcome_matches,
                        &self.world,
                        &mut self.protocol,
                    );
                    if record.is_some() {
                        return record;
                    }
                }
            }
        }
        None
    }
}
