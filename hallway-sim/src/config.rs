//! Configuration of the simulated hallway and of a run.
use anyhow::Result;
use hallway_core::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`HallwayWorld`](crate::HallwayWorld).
///
/// Lengths are in meters, angles in degrees. The hallway spans
/// `[-half_width, half_width]` along `x` and `[-half_length, half_length]` along `z`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HallwayWorldConfig {
    /// Velocity change applied by a forward tick.
    pub run_speed: f32,

    /// Rotation speed of a turn, per second.
    pub rotation_speed: f32,

    /// Linear drag per second.
    pub drag: f32,

    /// Radius of the agent.
    pub agent_radius: f32,

    /// Half of the width of the hallway.
    pub half_width: f32,

    /// Half of the length of the hallway.
    pub half_length: f32,

    /// Side of the square `[0, spawn_extent]` along `x` and `z` where the agent spawns.
    pub spawn_extent: f32,

    /// The number of cue symbols.
    pub n_cues: usize,

    /// `z` of the row of cue symbols.
    pub cue_row: f32,

    /// `z` of the row of target pads.
    pub pad_row: f32,

    /// Distance between the two pads and between adjacent cues.
    pub spacing: f32,

    /// Distance from a pad center at which the pad is triggered.
    pub trigger_radius: f32,
}

impl Default for HallwayWorldConfig {
    fn default() -> Self {
        Self {
            run_speed: 1.5,
            rotation_speed: 150.0,
            drag: 4.0,
            agent_radius: 0.5,
            half_width: 6.0,
            half_length: 12.5,
            spawn_extent: 5.0,
            n_cues: 3,
            cue_row: -8.0,
            pad_row: 10.0,
            spacing: 3.0,
            trigger_radius: 1.0,
        }
    }
}

impl HallwayWorldConfig {
    /// Sets the velocity change of a forward tick.
    pub fn run_speed(mut self, v: f32) -> Self {
        self.run_speed = v;
        self
    }

    /// Sets the rotation speed.
    pub fn rotation_speed(mut self, v: f32) -> Self {
        self.rotation_speed = v;
        self
    }

    /// Sets the linear drag.
    pub fn drag(mut self, v: f32) -> Self {
        self.drag = v;
        self
    }

    /// Sets the number of cue symbols.
    pub fn n_cues(mut self, v: usize) -> Self {
        self.n_cues = v;
        self
    }

    /// Sets the size of the spawn square.
    pub fn spawn_extent(mut self, v: f32) -> Self {
        self.spawn_extent = v;
        self
    }
}

/// Configuration of a run of the `hallway` binary.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimConfig {
    /// Configuration of the decision scheduler.
    pub scheduler: SchedulerConfig,

    /// Configuration of the world.
    pub world: HallwayWorldConfig,

    /// Seed of the world and of the random policy.
    pub seed: u64,

    /// Rendered frames per second.
    pub frame_rate: f32,

    /// The maximum number of frames the operator hesitates before switching keys.
    pub max_hesitation_frames: usize,

    /// Interval of flushing records, in episodes.
    pub flush_interval: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            world: HallwayWorldConfig::default(),
            seed: 42,
            frame_rate: 60.0,
            max_hesitation_frames: 12,
            flush_interval: 10,
        }
    }
}

impl SimConfig {
    /// Sets the configuration of the decision scheduler.
    pub fn scheduler(mut self, v: SchedulerConfig) -> Self {
        self.scheduler = v;
        self
    }

    /// Sets the configuration of the world.
    pub fn world(mut self, v: HallwayWorldConfig) -> Self {
        self.world = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the frame rate.
    pub fn frame_rate(mut self, v: f32) -> Self {
        self.frame_rate = v;
        self
    }

    /// Sets the maximum hesitation of the operator.
    pub fn max_hesitation_frames(mut self, v: usize) -> Self {
        self.max_hesitation_frames = v;
        self
    }

    /// Sets the interval of flushing records.
    pub fn flush_interval(mut self, v: usize) -> Self {
        self.flush_interval = v;
        self
    }

    /// Constructs [`SimConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hallway_core::ControlMode;
    use tempdir::TempDir;

    #[test]
    fn test_serde_sim_config() -> Result<()> {
        let config = SimConfig::default()
            .seed(7)
            .scheduler(SchedulerConfig::default().mode(ControlMode::Interactive))
            .world(HallwayWorldConfig::default().n_cues(5));

        let dir = TempDir::new("sim_config")?;
        let path = dir.path().join("sim_config.yaml");
        config.save(&path)?;
        let config_ = SimConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
