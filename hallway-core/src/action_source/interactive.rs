//! Action source driven by operator key holds.
use crate::base::{ActionClass, KeyState, PendingAction};
use log::trace;

/// Turns free-form key holds into delay-tagged decisions.
///
/// The staged action is replaced whenever the held key maps to a different class.
/// The replacement carries the time elapsed since the last decision as its delay,
/// i.e., how long the operator deliberated before switching.
#[derive(Clone, Debug)]
pub struct InteractiveSource {
    staged: PendingAction,
    ceiling: f32,
}

impl InteractiveSource {
    /// Constructs an [`InteractiveSource`] with the given reconsideration ceiling in seconds.
    pub fn new(ceiling: f32) -> Self {
        Self {
            staged: PendingAction::default(),
            ceiling,
        }
    }

    /// Clears the staged action.
    pub fn reset(&mut self) {
        self.staged = PendingAction::default();
    }

    /// Samples the keys once per frame.
    ///
    /// Returns `true` if the staged action was replaced.
    pub fn sample(&mut self, keys: KeyState, time_since_last_decision: f32) -> bool {
        let class = keys.action_class();
        if class != self.staged.class {
            trace!(
                "Staged {:?} after {:.3}s, replacing {:?}",
                class,
                time_since_last_decision,
                self.staged.class
            );
            self.staged = PendingAction::new(class, time_since_last_decision);
            true
        } else {
            false
        }
    }

    /// Returns the staged action.
    pub fn staged(&self) -> PendingAction {
        self.staged
    }

    /// Returns the reconsideration ceiling.
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Marks the staged action as committed, clearing its delay.
    ///
    /// Returns the class the agent executes until the next decision.
    pub fn commit(&mut self) -> ActionClass {
        self.staged.delay = 0.0;
        self.staged.class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_of_mind_stamps_elapsed_time() {
        let mut source = InteractiveSource::new(2.5);
        assert!(source.sample(KeyState::FORWARD, 0.0));
        assert_eq!(source.staged(), PendingAction::new(ActionClass::Forward, 0.0));

        // Holding the same key keeps the staged action
        assert!(!source.sample(KeyState::FORWARD, 1.0));
        assert_eq!(source.staged().delay, 0.0);

        assert!(source.sample(KeyState::RELEASED, 2.0));
        assert_eq!(source.staged(), PendingAction::new(ActionClass::Idle, 2.0));

        assert_eq!(source.commit(), ActionClass::Idle);
        assert_eq!(source.staged().delay, 0.0);
    }
}
