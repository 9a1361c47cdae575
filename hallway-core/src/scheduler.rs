//! Variable-latency decision scheduling.
mod config;
mod state;
use crate::{
    action_source::{ActionSource, ControlMode},
    base::{
        DecisionProtocol, DecisionRequest, DecisionSource, EpisodeEndReason, Handshake,
        KeyState, Observation, PendingAction, RawDecision, World,
    },
    clock::DecisionClock,
    error::HallwayError,
    indicator::{GroundIndicator, Indicator},
    observation_builder::ObservationBuilder,
    record::{Record, RecordValue},
    reward::RewardLedger,
    trajectory::{ReplayDriver, TrajectoryBuffer, TrajectoryStep},
};
use chrono::Local;
pub use config::SchedulerConfig;
use log::{debug, info, trace};
pub use state::{Episode, SchedulerState};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Decides when the agent reconsiders its action, and drives episodes.
///
/// The host calls [`DecisionScheduler::frame_tick`] once per rendered frame and
/// [`DecisionScheduler::fixed_tick`] once per physics step. Goal triggers and wall
/// contacts detected by the world are reported through
/// [`DecisionScheduler::on_goal_triggered`] and [`DecisionScheduler::on_wall_contact`].
///
/// # Fixed tick
///
/// While an episode is live, a fixed tick runs as follows:
///
/// 1. In [`ControlMode::Interactive`], if a deliberation window opens, the observation
///    is captured and the staged action becomes the executed one.
/// 2. The [`DecisionClock`] advances by one tick.
/// 3. If the episode timed out, no decision is made in this tick. Otherwise, if a
///    decision is due:
///     * The decision cost is charged and the time since the last decision is reset.
///     * [`ControlMode::Interactive`]: the window is recorded as a [`TrajectoryStep`]
///       with the executed action, the window length as its delay, and the reward
///       accrued during the window. The staged action is committed.
///     * [`ControlMode::Autonomous`]: a [`DecisionRequest`] with a live observation and
///       the reward accrued since the previous request is sent, the protocol is
///       advanced, and its answer becomes the committed action.
/// 4. The world moves the agent with the executed action and the tick cost is charged.
/// 5. On timeout, the timeout penalty is charged and the episode ends.
///
/// # States
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Idle: begin_episode
///     Idle --> AwaitingDecision: fixed_tick
///     AwaitingDecision --> Deciding: decision due
///     Idle --> Deciding: decision due
///     Committed --> Deciding: decision due
///     Deciding --> Committed
///     Committed --> AwaitingDecision: fixed_tick
///     AwaitingDecision --> Replaying: timeout or goal (Interactive)
///     Committed --> Replaying: timeout or goal (Interactive)
///     Replaying --> Terminated: trajectory drained
///     AwaitingDecision --> Terminated: timeout or goal (Autonomous)
///     Committed --> Terminated: timeout or goal (Autonomous)
///     Terminated --> Idle: begin_episode
/// ```
///
/// # Episode end
///
/// In [`ControlMode::Interactive`], the recorded trajectory is fed to the protocol
/// before the episode ends, with [`DecisionSource::Replay`] and the recorded action
/// encoded as the heuristic output, so that it can be collected as a demonstration.
/// All steps but the last one are replayed with a request and an advance; the last
/// one forms the [`EpisodeEnd`](crate::EpisodeEnd) message together with the reward
/// accrued after it.
/// With [`SchedulerConfig::replay_steps_per_tick`] set, the replay is spread over
/// the following fixed ticks; the world is frozen meanwhile.
///
/// Every episode end returns a [`Record`] with the keys `"episode"`, `"episode_reward"`,
/// `"decisions"`, `"replayed_steps"`, `"elapsed"`, `"outcome"` and `"ended_at"`.
pub struct DecisionScheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    clock: DecisionClock,
    source: ActionSource,
    builder: ObservationBuilder,

    /// Action executed by the agent until the next decision.
    committed: PendingAction,

    /// Observation at the opening of the current deliberation window.
    window_observation: Option<Observation>,

    buffer: TrajectoryBuffer,
    replay: ReplayDriver,
    handshake: Handshake,
    ledger: RewardLedger,
    indicator: GroundIndicator,
    episode: Option<Episode>,
    n_episodes: usize,
}

/// Live observation of the world at the current time of the episode.
fn observe<W: World + ?Sized>(
    builder: &ObservationBuilder,
    clock: &DecisionClock,
    world: &W,
) -> Observation {
    let progress = clock.time_since_episode_begin() / clock.max_episode_duration();
    builder.build(&world.agent_state(), &world.entities(), progress)
}

impl DecisionScheduler {
    /// Constructs a [`DecisionScheduler`].
    pub fn build(config: SchedulerConfig) -> Result<Self, HallwayError> {
        config.validate()?;

        Ok(Self {
            state: SchedulerState::Terminated,
            clock: DecisionClock::new(config.fixed_delta, config.max_episode_duration),
            source: ActionSource::build(config.mode, config.delays),
            builder: ObservationBuilder::new(config.sensor.clone()),
            committed: PendingAction::default(),
            window_observation: None,
            buffer: TrajectoryBuffer::new(),
            replay: ReplayDriver::new(config.delays),
            handshake: Handshake::default(),
            ledger: RewardLedger::default(),
            indicator: GroundIndicator::default(),
            episode: None,
            n_episodes: 0,
            config,
        })
    }

    /// Begins a new episode.
    ///
    /// The world is randomized and the agent is placed at a random pose. A live
    /// episode, if any, is abandoned without an [`EpisodeEnd`](crate::EpisodeEnd).
    ///
    /// Panics while a trajectory is being replayed.
    pub fn begin_episode<W: World + ?Sized>(&mut self, world: &mut W) {
        assert!(
            !self.state.is_replaying(),
            "An episode cannot begin while a trajectory is being replayed"
        );
        if self.state.is_live() {
            debug!("Abandoned episode {}", self.n_episodes.saturating_sub(1));
        }

        let desired_outcome = world.randomize();
        world.reset_agent();

        self.clock.reset();
        self.source.reset();
        self.committed = PendingAction::default();
        self.window_observation = None;
        self.buffer.clear();
        self.replay.reset();
        self.handshake.reset_steps();
        self.ledger.reset();
        self.episode = Some(Episode {
            index: self.n_episodes,
            desired_outcome,
            decisions: 0,
        });
        self.n_episodes += 1;
        self.state = SchedulerState::Idle;

        debug!(
            "Episode {} began, desired outcome: {}",
            self.n_episodes - 1,
            if desired_outcome { "X" } else { "O" }
        );
    }

    /// Processes one rendered frame.
    ///
    /// `keys` is the operator input in the frame. It is ignored unless the
    /// episode is live in [`ControlMode::Interactive`].
    pub fn frame_tick(&mut self, keys: KeyState, real_dt: f32) {
        self.indicator.frame_tick(real_dt);

        if !self.state.is_live() {
            return;
        }
        if let ActionSource::Interactive(source) = &mut self.source {
            source.sample(keys, self.clock.time_since_last_decision());
        }
    }

    /// Processes one physics step.
    ///
    /// Returns the record of the episode if it ended in this tick.
    pub fn fixed_tick<W, P>(&mut self, world: &mut W, protocol: &mut P) -> Option<Record>
    where
        W: World + ?Sized,
        P: DecisionProtocol + ?Sized,
    {
        match self.state {
            SchedulerState::Replaying(reason) => {
                return self.continue_replay(reason, world, protocol)
            }
            SchedulerState::Terminated => {
                trace!("Fixed tick outside of an episode ignored");
                return None;
            }
            _ => {}
        }

        if self.clock.is_window_start() {
            if let ActionSource::Interactive(source) = &self.source {
                self.committed = PendingAction::new(source.staged().class, 0.0);
                self.window_observation = Some(observe(&self.builder, &self.clock, world));
            }
        }

        self.clock.advance();
        let timed_out = self.clock.is_episode_timed_out();

        if !timed_out && self.clock.is_decision_due(self.source.due_rule(&self.committed)) {
            self.decide(world, protocol);
        } else {
            self.state = SchedulerState::AwaitingDecision;
        }

        let dt = self.clock.fixed_delta();
        world.apply_locomotion(self.committed.class, dt);
        self.ledger.add(-self.config.rewards.tick_cost);

        if timed_out {
            self.ledger.add(-self.config.rewards.timeout_penalty);
            self.finish(EpisodeEndReason::Timeout, world, protocol)
        } else {
            None
        }
    }

    /// Reports that the agent touched a target pad.
    ///
    /// `outcome_matches` tells if the symbol of the pad is the desired one. The
    /// episode ends without the timeout penalty. Returns the record of the episode
    /// if it ended immediately.
    pub fn on_goal_triggered<W, P>(
        &mut self,
        outcome_matches: bool,
        world: &W,
        protocol: &mut P,
    ) -> Option<Record>
    where
        W: World + ?Sized,
        P: DecisionProtocol + ?Sized,
    {
        if !self.state.is_live() {
            debug!("Goal trigger outside of a live episode ignored");
            return None;
        }

        let (indicator, reward) = if outcome_matches {
            (Indicator::Goal, self.config.rewards.goal_reward)
        } else {
            (Indicator::Fail, self.config.rewards.fail_reward)
        };
        self.indicator
            .flash(indicator, self.config.indicator_duration);
        if let Some(r) = reward {
            self.ledger.add(r);
        }

        self.finish(EpisodeEndReason::GoalReached { outcome_matches }, world, protocol)
    }

    /// Reports that the agent touched a wall for `dt` seconds.
    pub fn on_wall_contact(&mut self, dt: f32) {
        if !self.state.is_live() {
            trace!("Wall contact outside of a live episode ignored");
            return;
        }
        self.ledger.add(-self.config.rewards.wall_contact_rate * dt);
    }

    /// Returns the observation the protocol would receive now.
    ///
    /// While replaying, this is the observation of the oldest remaining step.
    pub fn current_observation<W: World + ?Sized>(&self, world: &W) -> Observation {
        if self.state.is_replaying() {
            if let Some(step) = self.buffer.front() {
                return step.observation.clone();
            }
        }
        observe(&self.builder, &self.clock, world)
    }

    /// Returns the heuristic output for the protocol.
    ///
    /// While replaying, this is the oldest remaining step encoded as a raw decision.
    /// Otherwise, the staged operator action with a zero delay parameter, or `None`
    /// in [`ControlMode::Autonomous`].
    pub fn heuristic_output(&self) -> Option<RawDecision> {
        if self.state.is_replaying() {
            return self.buffer.front().map(|step| self.replay.heuristic(step));
        }
        match &self.source {
            ActionSource::Interactive(source) => Some(RawDecision::new(
                source.staged().class.index() as i64,
                0.0,
            )),
            ActionSource::Autonomous(_) => None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The control mode.
    pub fn mode(&self) -> ControlMode {
        self.source.mode()
    }

    /// The current or last episode.
    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    /// The clock.
    pub fn clock(&self) -> &DecisionClock {
        &self.clock
    }

    /// The action executed by the agent.
    pub fn committed(&self) -> PendingAction {
        self.committed
    }

    /// The staged operator action, `None` in [`ControlMode::Autonomous`].
    pub fn staged(&self) -> Option<PendingAction> {
        match &self.source {
            ActionSource::Interactive(source) => Some(source.staged()),
            ActionSource::Autonomous(_) => None,
        }
    }

    /// The recorded trajectory of the current episode.
    pub fn trajectory(&self) -> &TrajectoryBuffer {
        &self.buffer
    }

    /// Cumulative reward of the current episode.
    pub fn episode_reward(&self) -> f32 {
        self.ledger.total()
    }

    /// Reward accrued since it was last delivered or recorded.
    pub fn pending_reward(&self) -> f32 {
        self.ledger.pending()
    }

    /// The number of decisions in the current episode.
    pub fn decisions(&self) -> usize {
        self.episode.as_ref().map_or(0, |e| e.decisions)
    }

    /// The number of completed protocol steps in the current episode.
    pub fn protocol_steps(&self) -> usize {
        self.handshake.steps()
    }

    /// The ground indicator.
    pub fn indicator(&self) -> Indicator {
        self.indicator.current()
    }

    /// Commits a new decision. The clock has just advanced.
    fn decide<W, P>(&mut self, world: &W, protocol: &mut P)
    where
        W: World + ?Sized,
        P: DecisionProtocol + ?Sized,
    {
        let window = self.clock.time_since_last_decision();
        self.clock.reset_decision();
        self.ledger.add(-self.config.rewards.decision_cost);
        self.state = SchedulerState::Deciding;

        match &mut self.source {
            ActionSource::Interactive(source) => {
                let observation = match self.window_observation.take() {
                    Some(observation) => observation,
                    None => observe(&self.builder, &self.clock, world),
                };
                self.buffer.push(TrajectoryStep {
                    observation,
                    action: PendingAction::new(self.committed.class, window),
                    reward: self.ledger.take_pending(),
                });
                self.committed = PendingAction::new(source.commit(), 0.0);
            }
            ActionSource::Autonomous(source) => {
                let request = DecisionRequest {
                    observation: observe(&self.builder, &self.clock, world),
                    reward: self.ledger.take_pending(),
                    heuristic: None,
                    source: DecisionSource::Live,
                };
                self.handshake.request(protocol, &request);
                let decision = self.handshake.advance(protocol);
                self.committed = source.receive(decision);
            }
        }

        if let Some(episode) = self.episode.as_mut() {
            episode.decisions += 1;
        }
        trace!(
            "Decision at {:.2}s after {:.2}s: {:?}",
            self.clock.time_since_episode_begin(),
            window,
            self.committed
        );
        self.state = SchedulerState::Committed;
    }

    /// Ends the live episode, starting the replay in [`ControlMode::Interactive`].
    fn finish<W, P>(
        &mut self,
        reason: EpisodeEndReason,
        world: &W,
        protocol: &mut P,
    ) -> Option<Record>
    where
        W: World + ?Sized,
        P: DecisionProtocol + ?Sized,
    {
        match self.source.mode() {
            ControlMode::Autonomous => Some(self.terminate(reason, world, protocol)),
            ControlMode::Interactive => {
                debug!(
                    "Episode ended ({}), replaying {} steps",
                    reason,
                    self.buffer.len()
                );
                self.state = SchedulerState::Replaying(reason);
                let paced = self.config.replay_steps_per_tick.is_some();
                if paced && self.replay.has_pending(&self.buffer) {
                    None
                } else {
                    self.continue_replay(reason, world, protocol)
                }
            }
        }
    }

    fn continue_replay<W, P>(
        &mut self,
        reason: EpisodeEndReason,
        world: &W,
        protocol: &mut P,
    ) -> Option<Record>
    where
        W: World + ?Sized,
        P: DecisionProtocol + ?Sized,
    {
        match self.config.replay_steps_per_tick {
            None => {
                self.replay
                    .drain(&mut self.buffer, &mut self.handshake, protocol);
            }
            Some(n) => {
                for _ in 0..n {
                    if !self
                        .replay
                        .step(&mut self.buffer, &mut self.handshake, protocol)
                    {
                        break;
                    }
                }
            }
        }

        if self.replay.has_pending(&self.buffer) {
            return None;
        }
        Some(self.terminate(reason, world, protocol))
    }

    /// Sends the terminal message and builds the record of the episode.
    fn terminate<W, P>(&mut self, reason: EpisodeEndReason, world: &W, protocol: &mut P) -> Record
    where
        W: World + ?Sized,
        P: DecisionProtocol + ?Sized,
    {
        assert!(
            !self.handshake.is_outstanding(),
            "An episode ended with an outstanding decision request"
        );

        let residual = self.ledger.take_pending();
        let builder = &self.builder;
        let clock = &self.clock;
        let end = self
            .replay
            .terminal(&mut self.buffer, residual, reason, || {
                observe(builder, clock, world)
            });
        protocol.end_episode(&end);
        self.state = SchedulerState::Terminated;

        let (index, decisions) = self
            .episode
            .as_ref()
            .map_or((0, 0), |e| (e.index, e.decisions));
        info!(
            "Episode {} ended ({}): reward = {:.3}, decisions = {}, elapsed = {:.2}s",
            index,
            reason,
            self.ledger.total(),
            decisions,
            self.clock.time_since_episode_begin()
        );

        Record::from_slice(&[
            ("episode", RecordValue::Scalar(index as f32)),
            ("episode_reward", RecordValue::Scalar(self.ledger.total())),
            ("decisions", RecordValue::Scalar(decisions as f32)),
            (
                "replayed_steps",
                RecordValue::Scalar(self.replay.replayed() as f32),
            ),
            (
                "elapsed",
                RecordValue::Scalar(self.clock.time_since_episode_begin()),
            ),
            ("outcome", RecordValue::String(reason.to_string())),
            ("ended_at", RecordValue::DateTime(Local::now())),
        ])
    }
}
