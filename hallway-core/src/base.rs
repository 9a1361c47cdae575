//! Core types and the interfaces of the external collaborators.
mod action;
mod observation;
mod protocol;
mod world;
pub use action::{ActionClass, KeyState, PendingAction, RawDecision};
pub use observation::{
    EntityFeature, EntityKind, Observation, ENTITY_FEATURE_DIM, NUM_SCALARS,
};
pub use protocol::{
    DecisionProtocol, DecisionRequest, DecisionSource, EpisodeEnd, EpisodeEndReason, Handshake,
};
pub use world::{AgentState, SensedEntity, World};
