#![warn(missing_docs)]
//! A planar hallway world and a host loop for the hallway decision scheduler.
//!
//! [`HallwayWorld`] stands in for the game engine: it randomizes the cues and pads,
//! moves the agent and detects wall contacts and pad triggers. [`Runner`] drives
//! frames and fixed ticks of a [`DecisionScheduler`](hallway_core::DecisionScheduler),
//! with a [`SteeringOperator`] at the keys in interactive mode and a [`RandomPolicy`]
//! behind the decision protocol.
mod area;
mod config;
mod operator;
mod policy;
mod runner;
mod world;
pub use area::AreaLayout;
pub use config::{HallwayWorldConfig, SimConfig};
pub use operator::SteeringOperator;
pub use policy::RandomPolicy;
pub use runner::Runner;
pub use world::{HallwayWorld, PhysicsEvent};
