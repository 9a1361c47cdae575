//! Sources of actions: operator input or policy output.
mod autonomous;
mod interactive;
use crate::{base::PendingAction, clock::DueRule, delay::DelayMapping};
pub use autonomous::AutonomousSource;
pub use interactive::InteractiveSource;
use serde::{Deserialize, Serialize};

/// Who chooses the actions of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// A human operator; the episode is recorded and replayed at its end.
    Interactive,

    /// A policy behind the decision protocol.
    Autonomous,
}

/// Action source, selected once from the [`ControlMode`].
#[derive(Clone, Debug)]
pub enum ActionSource {
    /// Operator input.
    Interactive(InteractiveSource),

    /// Policy output.
    Autonomous(AutonomousSource),
}

impl ActionSource {
    /// Builds the action source of the given mode.
    ///
    /// The operator's reconsideration ceiling is the long delay of `mapping`.
    pub fn build(mode: ControlMode, mapping: DelayMapping) -> Self {
        match mode {
            ControlMode::Interactive => Self::Interactive(InteractiveSource::new(mapping.long)),
            ControlMode::Autonomous => Self::Autonomous(AutonomousSource::new(mapping)),
        }
    }

    /// Returns the control mode.
    pub fn mode(&self) -> ControlMode {
        match self {
            Self::Interactive(_) => ControlMode::Interactive,
            Self::Autonomous(_) => ControlMode::Autonomous,
        }
    }

    /// Resets the state of the source at the beginning of an episode.
    pub fn reset(&mut self) {
        if let Self::Interactive(source) = self {
            source.reset();
        }
    }

    /// Returns the rule deciding when the next decision is due.
    ///
    /// `committed` is the action currently executed by the agent.
    pub fn due_rule(&self, committed: &PendingAction) -> DueRule {
        match self {
            Self::Interactive(source) => DueRule::Ceiling {
                ceiling: source.ceiling(),
                staged_delay: source.staged().delay,
            },
            Self::Autonomous(_) => DueRule::SelfPaced {
                delay: committed.delay,
            },
        }
    }
}
