//! Action source driven by policy output.
use crate::{
    base::{PendingAction, RawDecision},
    delay::DelayMapping,
};

/// Converts policy output into actions with a self-chosen reconsideration delay.
#[derive(Clone, Debug)]
pub struct AutonomousSource {
    mapping: DelayMapping,
}

impl AutonomousSource {
    /// Constructs an [`AutonomousSource`].
    pub fn new(mapping: DelayMapping) -> Self {
        Self { mapping }
    }

    /// Turns a raw decision into an action.
    pub fn receive(&self, decision: RawDecision) -> PendingAction {
        PendingAction::new(decision.class(), self.mapping.decode(decision.delay_parameter))
    }
}
