//! Configuration of [`DecisionScheduler`](super::DecisionScheduler).
use crate::{
    action_source::ControlMode, delay::DelayMapping, error::HallwayError,
    observation_builder::SensorConfig, reward::RewardConfig,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DecisionScheduler`](super::DecisionScheduler).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SchedulerConfig {
    /// Who chooses the actions.
    pub mode: ControlMode,

    /// Duration of a fixed tick in seconds.
    pub fixed_delta: f32,

    /// Maximum duration of an episode in seconds.
    pub max_episode_duration: f32,

    /// Short, typical and long reconsideration delays.
    pub delays: DelayMapping,

    /// Reward constants.
    pub rewards: RewardConfig,

    /// Observation settings.
    pub sensor: SensorConfig,

    /// Maximum number of recorded steps replayed per fixed tick.
    /// `None` replays the whole trajectory as soon as the episode ends.
    pub replay_steps_per_tick: Option<usize>,

    /// Real-time duration of the goal/fail indicator in seconds.
    pub indicator_duration: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Autonomous,
            fixed_delta: 0.02,
            max_episode_duration: 10.0,
            delays: DelayMapping::default(),
            rewards: RewardConfig::default(),
            sensor: SensorConfig::default(),
            replay_steps_per_tick: None,
            indicator_duration: 0.5,
        }
    }
}

impl SchedulerConfig {
    /// Sets the control mode.
    pub fn mode(mut self, v: ControlMode) -> Self {
        self.mode = v;
        self
    }

    /// Sets the duration of a fixed tick.
    pub fn fixed_delta(mut self, v: f32) -> Self {
        self.fixed_delta = v;
        self
    }

    /// Sets the maximum duration of an episode.
    pub fn max_episode_duration(mut self, v: f32) -> Self {
        self.max_episode_duration = v;
        self
    }

    /// Sets the reconsideration delays.
    pub fn delays(mut self, v: DelayMapping) -> Self {
        self.delays = v;
        self
    }

    /// Sets the reward constants.
    pub fn rewards(mut self, v: RewardConfig) -> Self {
        self.rewards = v;
        self
    }

    /// Sets the observation settings.
    pub fn sensor(mut self, v: SensorConfig) -> Self {
        self.sensor = v;
        self
    }

    /// Sets the maximum number of replayed steps per fixed tick.
    pub fn replay_steps_per_tick(mut self, v: Option<usize>) -> Self {
        self.replay_steps_per_tick = v;
        self
    }

    /// Sets the duration of the goal/fail indicator.
    pub fn indicator_duration(mut self, v: f32) -> Self {
        self.indicator_duration = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), HallwayError> {
        if !(self.fixed_delta > 0.0) {
            return Err(HallwayError::InvalidConfig(format!(
                "fixed_delta must be positive, got {}",
                self.fixed_delta
            )));
        }
        if !(self.max_episode_duration > 0.0) {
            return Err(HallwayError::InvalidConfig(format!(
                "max_episode_duration must be positive, got {}",
                self.max_episode_duration
            )));
        }
        if self.replay_steps_per_tick == Some(0) {
            return Err(HallwayError::InvalidConfig(
                "replay_steps_per_tick must be at least 1".to_string(),
            ));
        }
        self.delays.validate()?;
        self.rewards.validate()?;
        self.sensor.validate()
    }

    /// Constructs [`SchedulerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SchedulerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_scheduler_config() -> Result<()> {
        let config = SchedulerConfig::default()
            .mode(ControlMode::Interactive)
            .max_episode_duration(30.0)
            .replay_steps_per_tick(Some(8))
            .rewards(RewardConfig::default().outcome_rewards(Some(1.0), None));

        let dir = TempDir::new("scheduler_config")?;
        let path = dir.path().join("scheduler_config.yaml");
        config.save(&path)?;
        let config_ = SchedulerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(SchedulerConfig::default().validate().is_ok());
        assert!(SchedulerConfig::default().fixed_delta(0.0).validate().is_err());
        assert!(SchedulerConfig::default()
            .replay_steps_per_tick(Some(0))
            .validate()
            .is_err());
        assert!(SchedulerConfig::default()
            .delays(DelayMapping::new(1.0, 0.5, 2.0))
            .validate()
            .is_err());
        assert!(SchedulerConfig::default()
            .sensor(SensorConfig::default().capacity(0))
            .validate()
            .is_err());
        assert!(SchedulerConfig::default()
            .rewards(RewardConfig::default().tick_cost(-0.1))
            .validate()
            .is_err());
    }
}
