//! This module is used for tests.
use crate::{
    ActionClass, AgentState, DecisionProtocol, DecisionRequest, EntityKind, EpisodeEnd,
    RawDecision, SensedEntity, World,
};
use std::collections::VecDeque;

/// Dummy world.
///
/// The scene is fixed. The agent moves along its heading at one unit per second
/// while going forward, and every applied action class is kept.
#[derive(Clone, Debug, Default)]
pub struct DummyWorld {
    agent: AgentState,
    entities: Vec<SensedEntity>,
    desired_outcome: bool,
    locomotion: Vec<ActionClass>,
    n_randomized: usize,
}

impl DummyWorld {
    /// Constructs a world with two cues and two targets in front of the agent.
    pub fn hallway() -> Self {
        let entity = |kind, value, x, z| SensedEntity {
            kind,
            value: Some(value),
            position: [x, z],
        };
        Self {
            entities: vec![
                entity(EntityKind::Cue, true, -2.0, 3.0),
                entity(EntityKind::Cue, false, 2.0, 3.0),
                entity(EntityKind::Target, true, -2.0, 8.0),
                entity(EntityKind::Target, false, 2.0, 8.0),
            ],
            desired_outcome: true,
            ..Self::default()
        }
    }

    /// Sets the desired outcome returned on randomization.
    pub fn desired_outcome(mut self, v: bool) -> Self {
        self.desired_outcome = v;
        self
    }

    /// Action classes applied so far, one per fixed tick.
    pub fn locomotion(&self) -> &[ActionClass] {
        &self.locomotion
    }

    /// The number of randomizations.
    pub fn n_randomized(&self) -> usize {
        self.n_randomized
    }
}

impl World for DummyWorld {
    fn randomize(&mut self) -> bool {
        self.n_randomized += 1;
        self.desired_outcome
    }

    fn reset_agent(&mut self) {
        self.agent = AgentState::default();
        self.locomotion.clear();
    }

    fn agent_state(&self) -> AgentState {
        self.agent
    }

    fn entities(&self) -> Vec<SensedEntity> {
        self.entities.clone()
    }

    fn apply_locomotion(&mut self, class: ActionClass, dt: f32) {
        self.locomotion.push(class);
        match class {
            ActionClass::Forward => {
                let rad = self.agent.heading.to_radians();
                self.agent.velocity = [rad.sin(), rad.cos()];
                self.agent.position[0] += rad.sin() * dt;
                self.agent.position[1] += rad.cos() * dt;
            }
            ActionClass::TurnRight => self.agent.heading += 90.0 * dt,
            ActionClass::TurnLeft => self.agent.heading -= 90.0 * dt,
            ActionClass::Idle => self.agent.velocity = [0.0, 0.0],
        }
    }
}

/// Dummy decision protocol.
///
/// Answers with scripted decisions, then with a fallback decision. Every request
/// and episode end is kept.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProtocol {
    script: VecDeque<RawDecision>,
    fallback: RawDecision,
    requests: Vec<DecisionRequest>,
    ends: Vec<EpisodeEnd>,
    n_advances: usize,
}

impl ScriptedProtocol {
    /// Always answers with `decision`.
    pub fn constant(decision: RawDecision) -> Self {
        Self {
            fallback: decision,
            ..Self::default()
        }
    }

    /// Answers with `script` in order, then with `fallback`.
    pub fn scripted(script: impl IntoIterator<Item = RawDecision>, fallback: RawDecision) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            ..Self::default()
        }
    }

    /// Received requests.
    pub fn requests(&self) -> &[DecisionRequest] {
        &self.requests
    }

    /// Received episode ends.
    pub fn ends(&self) -> &[EpisodeEnd] {
        &self.ends
    }

    /// The number of advances.
    pub fn n_advances(&self) -> usize {
        self.n_advances
    }
}

impl DecisionProtocol for ScriptedProtocol {
    fn request_decision(&mut self, request: &DecisionRequest) {
        self.requests.push(request.clone());
    }

    fn advance(&mut self) -> RawDecision {
        self.n_advances += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }

    fn end_episode(&mut self, end: &EpisodeEnd) {
        self.ends.push(end.clone());
    }
}
