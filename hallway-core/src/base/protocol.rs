//! Decision protocol.
use super::{Observation, RawDecision};
use std::fmt;

/// Where the content of a [`DecisionRequest`] comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionSource {
    /// Live sensing; the backend is expected to run its policy.
    Live,

    /// A step of a recorded operator trajectory; the backend is expected to
    /// take [`DecisionRequest::heuristic`] as the action.
    Replay,
}

/// A decision request sent to the backend.
#[derive(Clone, Debug)]
pub struct DecisionRequest {
    /// Observation the decision is based on.
    pub observation: Observation,

    /// Reward accrued since the previous request.
    pub reward: f32,

    /// Action to register in place of policy output, set while replaying.
    pub heuristic: Option<RawDecision>,

    /// Origin of the request.
    pub source: DecisionSource,
}

/// Why an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeEndReason {
    /// The episode reached its maximum duration.
    Timeout,

    /// The agent entered a target zone.
    GoalReached {
        /// If the target matches the desired outcome of the episode.
        outcome_matches: bool,
    },
}

impl fmt::Display for EpisodeEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::GoalReached {
                outcome_matches: true,
            } => write!(f, "goal"),
            Self::GoalReached {
                outcome_matches: false,
            } => write!(f, "fail"),
        }
    }
}

/// The final message of an episode sent to the backend.
#[derive(Clone, Debug)]
pub struct EpisodeEnd {
    /// Terminal observation.
    pub observation: Observation,

    /// Reward accrued since the previous request, including terminal rewards.
    pub reward: f32,

    /// Action to register with the terminal step, set while replaying.
    pub heuristic: Option<RawDecision>,

    /// Why the episode ended.
    pub reason: EpisodeEndReason,
}

/// The external training-step protocol.
///
/// A call of [`DecisionProtocol::request_decision`] must be followed by exactly one
/// call of [`DecisionProtocol::advance`] before the next request. The scheduler
/// enforces this ordering; implementations can rely on it.
pub trait DecisionProtocol {
    /// Registers a decision request.
    fn request_decision(&mut self, request: &DecisionRequest);

    /// Advances one protocol step and returns the answer to the outstanding request.
    fn advance(&mut self) -> RawDecision;

    /// Signals the end of the episode.
    fn end_episode(&mut self, end: &EpisodeEnd);
}

impl<P: DecisionProtocol + ?Sized> DecisionProtocol for Box<P> {
    fn request_decision(&mut self, request: &DecisionRequest) {
        (**self).request_decision(request)
    }

    fn advance(&mut self) -> RawDecision {
        (**self).advance()
    }

    fn end_episode(&mut self, end: &EpisodeEnd) {
        (**self).end_episode(end)
    }
}

/// Drives the request/advance handshake of a [`DecisionProtocol`].
#[derive(Debug, Default)]
pub struct Handshake {
    outstanding: bool,
    steps: usize,
}

impl Handshake {
    /// Sends a request.
    ///
    /// Panics if the previous request has not been advanced.
    pub fn request<P: DecisionProtocol + ?Sized>(
        &mut self,
        protocol: &mut P,
        request: &DecisionRequest,
    ) {
        assert!(
            !self.outstanding,
            "A decision was requested before the previous request was advanced"
        );
        self.outstanding = true;
        protocol.request_decision(request);
    }

    /// Advances the outstanding request.
    ///
    /// Panics if there is no outstanding request.
    pub fn advance<P: DecisionProtocol + ?Sized>(&mut self, protocol: &mut P) -> RawDecision {
        assert!(self.outstanding, "Advanced without an outstanding request");
        self.outstanding = false;
        self.steps += 1;
        protocol.advance()
    }

    /// Returns `true` if a request waits for [`Handshake::advance`].
    pub fn is_outstanding(&self) -> bool {
        self.outstanding
    }

    /// The number of completed protocol steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Resets the step counter.
    pub fn reset_steps(&mut self) {
        self.steps = 0;
    }
}
