//! Replay of a recorded trajectory through the decision protocol.
use super::{TrajectoryBuffer, TrajectoryStep};
use crate::{
    base::{
        DecisionProtocol, DecisionRequest, DecisionSource, EpisodeEnd, EpisodeEndReason,
        Handshake, Observation, RawDecision,
    },
    delay::DelayMapping,
};
use log::debug;

/// Feeds the steps of a [`TrajectoryBuffer`] to a [`DecisionProtocol`], oldest first.
///
/// Every step except the last is registered with a request followed by an advance,
/// exactly like a live decision. The last step is kept for the terminal message,
/// built with [`ReplayDriver::terminal`].
#[derive(Clone, Debug)]
pub struct ReplayDriver {
    mapping: DelayMapping,
    replayed: usize,
}

impl ReplayDriver {
    /// Constructs a [`ReplayDriver`].
    pub fn new(mapping: DelayMapping) -> Self {
        Self {
            mapping,
            replayed: 0,
        }
    }

    /// Encodes a recorded step as the output the policy would have produced.
    pub fn heuristic(&self, step: &TrajectoryStep) -> RawDecision {
        RawDecision::new(
            step.action.class.index() as i64,
            self.mapping.encode(step.action.delay),
        )
    }

    /// Returns `true` if steps other than the retained last one remain.
    pub fn has_pending(&self, buffer: &TrajectoryBuffer) -> bool {
        buffer.len() > 1
    }

    /// Replays the oldest step and removes it from the buffer.
    ///
    /// Returns `false` without touching the protocol if only the retained last
    /// step, or nothing, remains.
    pub fn step<P: DecisionProtocol + ?Sized>(
        &mut self,
        buffer: &mut TrajectoryBuffer,
        handshake: &mut Handshake,
        protocol: &mut P,
    ) -> bool {
        if !self.has_pending(buffer) {
            return false;
        }

        // The protocol reads the first remaining step, not live sensing
        let request = match buffer.front() {
            Some(step) => DecisionRequest {
                observation: step.observation.clone(),
                reward: step.reward,
                heuristic: Some(self.heuristic(step)),
                source: DecisionSource::Replay,
            },
            None => return false,
        };
        handshake.request(protocol, &request);
        handshake.advance(protocol);
        buffer.pop_front();
        self.replayed += 1;
        true
    }

    /// Replays all steps but the last one. Returns the number of replayed steps.
    pub fn drain<P: DecisionProtocol + ?Sized>(
        &mut self,
        buffer: &mut TrajectoryBuffer,
        handshake: &mut Handshake,
        protocol: &mut P,
    ) -> usize {
        let mut n = 0;
        while self.step(buffer, handshake, protocol) {
            n += 1;
        }
        debug!("Replayed {} steps, {} retained", n, buffer.len());
        n
    }

    /// Builds the terminal message from the retained last step.
    ///
    /// `residual` is the reward accrued after the last step was recorded.
    /// An empty buffer falls back to `live` for the terminal observation.
    pub fn terminal<F>(
        &self,
        buffer: &mut TrajectoryBuffer,
        residual: f32,
        reason: EpisodeEndReason,
        live: F,
    ) -> EpisodeEnd
    where
        F: FnOnce() -> Observation,
    {
        match buffer.pop_front() {
            Some(step) => EpisodeEnd {
                heuristic: Some(self.heuristic(&step)),
                observation: step.observation,
                reward: step.reward + residual,
                reason,
            },
            None => EpisodeEnd {
                observation: live(),
                reward: residual,
                heuristic: None,
                reason,
            },
        }
    }

    /// The number of steps replayed in the current episode.
    pub fn replayed(&self) -> usize {
        self.replayed
    }

    /// Resets the replay counter.
    pub fn reset(&mut self) {
        self.replayed = 0;
    }
}
