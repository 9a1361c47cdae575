//! Trajectory of an operator episode.
use crate::base::{Observation, PendingAction};
use std::collections::VecDeque;

/// A decision of the operator.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryStep {
    /// Observation taken when the deliberation window opened.
    pub observation: Observation,

    /// Action executed during the window, with the window length as its delay.
    pub action: PendingAction,

    /// Reward accrued during the window.
    pub reward: f32,
}

/// Chronological log of [`TrajectoryStep`]s of the current episode.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryBuffer {
    steps: VecDeque<TrajectoryStep>,
}

impl TrajectoryBuffer {
    /// Constructs an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, step: TrajectoryStep) {
        self.steps.push_back(step);
    }

    /// Returns the oldest remaining step.
    pub fn front(&self) -> Option<&TrajectoryStep> {
        self.steps.front()
    }

    /// Removes and returns the oldest remaining step.
    pub fn pop_front(&mut self) -> Option<TrajectoryStep> {
        self.steps.pop_front()
    }

    /// The number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the buffer has no step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Removes all steps.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Iterates over the steps, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TrajectoryStep> {
        self.steps.iter()
    }
}
