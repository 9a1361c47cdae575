//! World.
use super::{ActionClass, EntityKind};

/// Kinematic state of the agent, projected on the ground plane.
///
/// `x` points to the right of the area and `z` along the hallway.
/// A heading of zero degrees faces `+z`; positive headings turn clockwise
/// when seen from above.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentState {
    /// Position `[x, z]`, local to the area.
    pub position: [f32; 2],

    /// Linear velocity `[x, z]`.
    pub velocity: [f32; 2],

    /// Heading in degrees.
    pub heading: f32,

    /// Angular velocity around the vertical axis.
    pub angular_velocity: f32,
}

/// An entity the agent may perceive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensedEntity {
    /// Kind of the entity.
    pub kind: EntityKind,

    /// `Some(true)` for X, `Some(false)` for O.
    pub value: Option<bool>,

    /// Position `[x, z]` in the same frame as [`AgentState::position`].
    pub position: [f32; 2],
}

/// The physical and scene collaborators of the decision scheduler.
///
/// Collision and trigger detection are not part of this trait. The host reports
/// them to the scheduler with
/// [`DecisionScheduler::on_goal_triggered`](crate::DecisionScheduler::on_goal_triggered)
/// and [`DecisionScheduler::on_wall_contact`](crate::DecisionScheduler::on_wall_contact).
pub trait World {
    /// Randomizes the scene and returns the desired outcome of the episode,
    /// i.e., if the correct target carries the X symbol.
    fn randomize(&mut self) -> bool;

    /// Places the agent at its initial pose with zero velocity.
    fn reset_agent(&mut self);

    /// Returns the current state of the agent.
    fn agent_state(&self) -> AgentState;

    /// Returns all entities of the scene, in spatial-query order.
    fn entities(&self) -> Vec<SensedEntity>;

    /// Applies the locomotion effect of an action class for one fixed tick of `dt` seconds.
    fn apply_locomotion(&mut self, class: ActionClass, dt: f32);
}
