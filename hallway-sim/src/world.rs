//! Planar kinematic hallway.
use crate::{area::AreaLayout, config::HallwayWorldConfig};
use hallway_core::{ActionClass, AgentState, EntityKind, SensedEntity, World};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Contact events detected by [`HallwayWorld::step_physics`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhysicsEvent {
    /// The agent touched a wall during `dt` seconds.
    WallContact {
        /// Duration of the contact.
        dt: f32,
    },

    /// The agent entered a target pad.
    PadEntered {
        /// Symbol associated with the pad, `true` for X.
        symbol_is_x: bool,
    },
}

/// A hallway with cue symbols on one end and two target pads on the other.
///
/// Locomotion follows rigid-body semantics projected on the ground plane: a forward
/// tick adds an instantaneous velocity change along the heading, turns rotate
/// the heading directly, and [`HallwayWorld::step_physics`] integrates the position,
/// applies drag and resolves contacts with the walls.
pub struct HallwayWorld {
    config: HallwayWorldConfig,
    rng: StdRng,
    layout: AreaLayout,
    agent: AgentState,
    entities: Vec<SensedEntity>,
    inside_pad: Option<usize>,
}

impl HallwayWorld {
    /// Constructs a [`HallwayWorld`].
    pub fn build(config: HallwayWorldConfig, seed: u64) -> Self {
        let layout = AreaLayout::new(config.n_cues);
        let entities = layout.entities(&config);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            layout,
            agent: AgentState::default(),
            entities,
            inside_pad: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &HallwayWorldConfig {
        &self.config
    }

    /// The current layout.
    pub fn layout(&self) -> &AreaLayout {
        &self.layout
    }

    /// Position of the pad associated with the given symbol.
    pub fn pad_position(&self, symbol_is_x: bool) -> Option<[f32; 2]> {
        self.entities
            .iter()
            .find(|e| e.kind == EntityKind::Target && e.value == Some(symbol_is_x))
            .map(|e| e.position)
    }

    /// Places the agent. Used by hosts restoring a pose and by tests.
    pub fn set_agent(&mut self, agent: AgentState) {
        self.agent = agent;
        self.inside_pad = None;
    }

    /// Integrates the motion of the agent over `dt` seconds and detects contacts.
    pub fn step_physics(&mut self, dt: f32) -> Vec<PhysicsEvent> {
        let mut events = vec![];
        let agent = &mut self.agent;

        agent.position[0] += agent.velocity[0] * dt;
        agent.position[1] += agent.velocity[1] * dt;
        let damping = (1.0 - self.config.drag * dt).max(0.0);
        agent.velocity[0] *= damping;
        agent.velocity[1] *= damping;

        let bounds = [
            self.config.half_width - self.config.agent_radius,
            self.config.half_length - self.config.agent_radius,
        ];
        let mut contact = false;
        for axis in 0..2 {
            let p = agent.position[axis];
            if p.abs() > bounds[axis] {
                agent.position[axis] = p.signum() * bounds[axis];
                agent.velocity[axis] = 0.0;
                contact = true;
            }
        }
        if contact {
            trace!("Wall contact at {:?}", agent.position);
            events.push(PhysicsEvent::WallContact { dt });
        }

        let position = agent.position;
        let r2 = self.config.trigger_radius * self.config.trigger_radius;
        let inside = self.entities.iter().position(|e| {
            let dx = e.position[0] - position[0];
            let dz = e.position[1] - position[1];
            e.kind == EntityKind::Target && dx * dx + dz * dz <= r2
        });
        if inside.is_some() && inside != self.inside_pad {
            if let Some(symbol_is_x) = inside.and_then(|i| self.entities[i].value) {
                events.push(PhysicsEvent::PadEntered { symbol_is_x });
            }
        }
        self.inside_pad = inside;

        events
    }
}

impl World for HallwayWorld {
    fn randomize(&mut self) -> bool {
        self.layout.randomize(&mut self.rng);
        self.entities = self.layout.entities(&self.config);
        self.layout.more_xs()
    }

    fn reset_agent(&mut self) {
        let extent = self.config.spawn_extent;
        let x = extent * self.rng.gen::<f32>();
        let z = extent * self.rng.gen::<f32>();
        let heading = self.rng.gen_range(0.0..360.0);
        self.set_agent(AgentState {
            position: [x, z],
            heading,
            ..AgentState::default()
        });
    }

    fn agent_state(&self) -> AgentState {
        self.agent
    }

    fn entities(&self) -> Vec<SensedEntity> {
        self.entities.clone()
    }

    fn apply_locomotion(&mut self, class: ActionClass, dt: f32) {
        let agent = &mut self.agent;
        agent.angular_velocity = 0.0;
        match class {
            ActionClass::Forward => {
                let rad = agent.heading.to_radians();
                agent.velocity[0] += self.config.run_speed * rad.sin();
                agent.velocity[1] += self.config.run_speed * rad.cos();
            }
            ActionClass::TurnRight | ActionClass::TurnLeft => {
                let sign = if class == ActionClass::TurnRight {
                    1.0
                } else {
                    -1.0
                };
                agent.heading =
                    (agent.heading + sign * self.config.rotation_speed * dt).rem_euclid(360.0);
                agent.angular_velocity = sign * self.config.rotation_speed.to_radians();
            }
            ActionClass::Idle => {}
        }
    }
}
