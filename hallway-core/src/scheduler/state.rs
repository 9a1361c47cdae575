//! States of the scheduler and the live episode.
use crate::EpisodeEndReason;

/// State of a [`DecisionScheduler`](super::DecisionScheduler).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// An episode just began; no fixed tick has run yet.
    Idle,

    /// The last committed action is executed until the next decision is due.
    AwaitingDecision,

    /// A decision is being finalized. Only observable by the protocol.
    Deciding,

    /// A decision was committed in the last fixed tick.
    Committed,

    /// The episode ended for the given reason and the operator trajectory is
    /// being replayed.
    Replaying(EpisodeEndReason),

    /// The episode ended. A new one must be begun.
    Terminated,
}

impl SchedulerState {
    /// Returns `true` while the agent acts in the world.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Idle | Self::AwaitingDecision | Self::Committed)
    }

    /// Returns `true` while a trajectory is being replayed.
    pub fn is_replaying(&self) -> bool {
        matches!(self, Self::Replaying(_))
    }
}

/// The live episode.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    /// Zero-based index of the episode.
    pub index: usize,

    /// If the correct target carries the X symbol.
    pub desired_outcome: bool,

    /// The number of decisions made so far.
    pub decisions: usize,
}

impl Episode {
    /// Returns `true` if a target with the given symbol is the correct one.
    pub fn matches(&self, target_is_x: bool) -> bool {
        self.desired_outcome == target_is_x
    }
}
