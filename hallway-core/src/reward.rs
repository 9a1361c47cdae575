//! Reward shaping.
use crate::error::HallwayError;
use serde::{Deserialize, Serialize};

/// Reward constants.
///
/// Costs are given as positive magnitudes and accrue as negative rewards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Cost accrued every fixed tick.
    pub tick_cost: f32,

    /// Cost accrued on every decision.
    pub decision_cost: f32,

    /// Cost accrued once when an episode times out.
    pub timeout_penalty: f32,

    /// Cost per second of contact with a wall.
    pub wall_contact_rate: f32,

    /// Reward for reaching the target matching the desired outcome.
    /// `None` ends the episode without a terminal reward.
    pub goal_reward: Option<f32>,

    /// Reward for reaching the other target. `None` ends the episode without a terminal reward.
    pub fail_reward: Option<f32>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            tick_cost: 0.01,
            decision_cost: 0.1,
            timeout_penalty: 1.0,
            wall_contact_rate: 0.05,
            goal_reward: None,
            fail_reward: None,
        }
    }
}

impl RewardConfig {
    /// Sets the per-tick cost.
    pub fn tick_cost(mut self, v: f32) -> Self {
        self.tick_cost = v;
        self
    }

    /// Sets the per-decision cost.
    pub fn decision_cost(mut self, v: f32) -> Self {
        self.decision_cost = v;
        self
    }

    /// Sets the timeout penalty.
    pub fn timeout_penalty(mut self, v: f32) -> Self {
        self.timeout_penalty = v;
        self
    }

    /// Sets the wall contact cost per second.
    pub fn wall_contact_rate(mut self, v: f32) -> Self {
        self.wall_contact_rate = v;
        self
    }

    /// Sets the terminal rewards on reaching a target.
    pub fn outcome_rewards(mut self, goal: Option<f32>, fail: Option<f32>) -> Self {
        self.goal_reward = goal;
        self.fail_reward = fail;
        self
    }

    /// Checks that the costs are finite and non-negative.
    pub fn validate(&self) -> Result<(), HallwayError> {
        let costs = [
            ("tick_cost", self.tick_cost),
            ("decision_cost", self.decision_cost),
            ("timeout_penalty", self.timeout_penalty),
            ("wall_contact_rate", self.wall_contact_rate),
        ];
        for (name, v) in costs.iter() {
            if !(v.is_finite() && *v >= 0.0) {
                return Err(HallwayError::InvalidConfig(format!(
                    "{} must be a non-negative cost, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

/// Accrues rewards of an episode.
///
/// The pending part is what has not been delivered to the decision protocol
/// or stored into a trajectory step yet.
#[derive(Clone, Debug, Default)]
pub struct RewardLedger {
    pending: f32,
    total: f32,
}

impl RewardLedger {
    /// Adds a reward.
    pub fn add(&mut self, r: f32) {
        self.pending += r;
        self.total += r;
    }

    /// Takes the pending reward, leaving zero.
    pub fn take_pending(&mut self) -> f32 {
        std::mem::replace(&mut self.pending, 0.0)
    }

    /// Reward not delivered yet.
    pub fn pending(&self) -> f32 {
        self.pending
    }

    /// Cumulative reward of the episode.
    pub fn total(&self) -> f32 {
        self.total
    }

    /// Clears the ledger.
    pub fn reset(&mut self) {
        self.pending = 0.0;
        self.total = 0.0;
    }
}
