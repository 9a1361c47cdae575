#![warn(missing_docs)]
//! Variable-latency decision scheduling for the hallway cue-association agent.
//!
//! The agent walks a hallway, looks at two cues showing X or O symbols, and must
//! reach the target whose symbol is the majority one. Instead of acting every tick,
//! the agent chooses how long to keep its action before reconsidering it.
//!
//! * [`DecisionScheduler`] decides when decisions are due, accrues rewards and
//!   drives episodes.
//! * In [`ControlMode::Interactive`], an operator drives the agent; the trajectory
//!   is recorded in a [`TrajectoryBuffer`] and replayed through the
//!   [`DecisionProtocol`] when the episode ends.
//! * In [`ControlMode::Autonomous`], a policy behind the [`DecisionProtocol`]
//!   chooses the action and the delay until its next decision.
//!
//! The physics and scene are provided by an implementation of [`World`].
pub mod error;
pub mod record;

mod base;
pub use base::{
    ActionClass, AgentState, DecisionProtocol, DecisionRequest, DecisionSource, EntityFeature,
    EntityKind, EpisodeEnd, EpisodeEndReason, Handshake, KeyState, Observation, PendingAction,
    RawDecision, SensedEntity, World, ENTITY_FEATURE_DIM, NUM_SCALARS,
};

mod action_source;
pub use action_source::{ActionSource, AutonomousSource, ControlMode, InteractiveSource};

mod clock;
pub use clock::{DecisionClock, DueRule};

mod delay;
pub use delay::DelayMapping;

mod indicator;
pub use indicator::{GroundIndicator, Indicator};

mod observation_builder;
pub use observation_builder::{ObservationBuilder, SensorConfig};

mod reward;
pub use reward::{RewardConfig, RewardLedger};

mod scheduler;
pub use scheduler::{DecisionScheduler, Episode, SchedulerConfig, SchedulerState};

mod trajectory;
pub use trajectory::{ReplayDriver, TrajectoryBuffer, TrajectoryStep};

pub mod dummy;
