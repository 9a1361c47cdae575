//! A decision backend sampling uniformly random decisions.
use hallway_core::{
    ActionClass, DecisionProtocol, DecisionRequest, DecisionSource, EpisodeEnd, RawDecision,
};
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Samples random decisions and collects the demonstrations it is fed.
///
/// A replayed request carries the operator's decision as its heuristic output;
/// the policy answers with it, as a learner in heuristic mode does.
pub struct RandomPolicy {
    rng: StdRng,
    pending: Option<DecisionRequest>,
    n_live: usize,
    n_demonstrations: usize,
    n_episodes: usize,
    received_reward: f32,
}

impl RandomPolicy {
    /// Constructs a [`RandomPolicy`].
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            pending: None,
            n_live: 0,
            n_demonstrations: 0,
            n_episodes: 0,
            received_reward: 0.0,
        }
    }

    /// The number of answered live requests.
    pub fn n_live(&self) -> usize {
        self.n_live
    }

    /// The number of collected demonstration steps, terminal steps included.
    pub fn n_demonstrations(&self) -> usize {
        self.n_demonstrations
    }

    /// The number of ended episodes.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Sum of the rewards delivered with requests and episode ends.
    pub fn received_reward(&self) -> f32 {
        self.received_reward
    }

    fn sample(&mut self) -> RawDecision {
        RawDecision::new(
            self.rng.gen_range(0..ActionClass::COUNT as i64),
            self.rng.gen_range(-1.0..=1.0),
        )
    }
}

impl DecisionProtocol for RandomPolicy {
    fn request_decision(&mut self, request: &DecisionRequest) {
        self.received_reward += request.reward;
        self.pending = Some(request.clone());
    }

    fn advance(&mut self) -> RawDecision {
        match self.pending.take() {
            Some(DecisionRequest {
                heuristic: Some(decision),
                source: DecisionSource::Replay,
                ..
            }) => {
                self.n_demonstrations += 1;
                trace!("Demonstration: {:?}", decision);
                decision
            }
            _ => {
                self.n_live += 1;
                self.sample()
            }
        }
    }

    fn end_episode(&mut self, end: &EpisodeEnd) {
        self.received_reward += end.reward;
        if end.heuristic.is_some() {
            self.n_demonstrations += 1;
        }
        self.n_episodes += 1;
        debug!(
            "Episode end ({}), reward {:.3}, {} demonstration steps so far",
            end.reason, end.reward, self.n_demonstrations
        );
    }
}
