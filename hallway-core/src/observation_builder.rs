//! Assembly of observations from the world state.
use crate::{
    base::{AgentState, EntityFeature, Observation, SensedEntity, NUM_SCALARS},
    error::HallwayError,
};
use log::trace;
use serde::{Deserialize, Serialize};

/// Divisor of the velocity features, applied after dividing by the run speed.
const VELOCITY_SCALE: f32 = 15.0;

/// Divisor of the lateral position feature.
const POSITION_X_SCALE: f32 = 10.0;

/// Divisor of the longitudinal position feature.
const POSITION_Z_SCALE: f32 = 25.0;

/// Configuration of [`ObservationBuilder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Radius within which entities are perceived.
    pub sensor_radius: f32,

    /// Maximum number of entity features in an observation.
    pub capacity: usize,

    /// Run speed of the agent, used to normalize velocities.
    pub run_speed: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sensor_radius: 10.0,
            capacity: 20,
            run_speed: 1.5,
        }
    }
}

impl SensorConfig {
    /// Sets the sensing radius.
    pub fn sensor_radius(mut self, v: f32) -> Self {
        self.sensor_radius = v;
        self
    }

    /// Sets the maximum number of entity features.
    pub fn capacity(mut self, v: usize) -> Self {
        self.capacity = v;
        self
    }

    /// Sets the run speed.
    pub fn run_speed(mut self, v: f32) -> Self {
        self.run_speed = v;
        self
    }

    /// Checks the values of the configuration.
    pub fn validate(&self) -> Result<(), HallwayError> {
        if !(self.sensor_radius > 0.0) {
            return Err(HallwayError::InvalidConfig(format!(
                "sensor_radius must be positive, got {}",
                self.sensor_radius
            )));
        }
        if !(self.run_speed > 0.0) {
            return Err(HallwayError::InvalidConfig(format!(
                "run_speed must be positive, got {}",
                self.run_speed
            )));
        }
        if self.capacity == 0 {
            return Err(HallwayError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builds [`Observation`]s.
///
/// The scalar features and their divisors are the input contract of the policy:
///
/// | slot | feature |
/// |------|---------|
/// | 0 | elapsed time / maximum episode duration |
/// | 1 | velocity x / run speed / 15 |
/// | 2 | velocity z / run speed / 15 |
/// | 3 | angular velocity |
/// | 4 | position x / 10 |
/// | 5 | position z / 25 |
/// | 6 | heading / 180 - 1 |
///
/// Entities are sorted by distance to the agent, nearest first, before being
/// truncated to [`SensorConfig::capacity`].
#[derive(Clone, Debug)]
pub struct ObservationBuilder {
    config: SensorConfig,
}

impl ObservationBuilder {
    /// Constructs an [`ObservationBuilder`].
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Builds an observation.
    ///
    /// `progress` is the elapsed fraction of the episode.
    pub fn build(&self, agent: &AgentState, entities: &[SensedEntity], progress: f32) -> Observation {
        let run_speed = self.config.run_speed;
        let scalars: [f32; NUM_SCALARS] = [
            progress,
            agent.velocity[0] / run_speed / VELOCITY_SCALE,
            agent.velocity[1] / run_speed / VELOCITY_SCALE,
            agent.angular_velocity,
            agent.position[0] / POSITION_X_SCALE,
            agent.position[1] / POSITION_Z_SCALE,
            agent.heading.rem_euclid(360.0) / 180.0 - 1.0,
        ];

        let radius = self.config.sensor_radius;
        let mut sensed = entities
            .iter()
            .filter_map(|e| {
                let dx = e.position[0] - agent.position[0];
                let dz = e.position[1] - agent.position[1];
                let d2 = dx * dx + dz * dz;
                if d2 <= radius * radius {
                    Some((d2, self.entity_feature(agent, e, dx, dz)))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        // Stable, so equidistant entities keep the spatial-query order
        sensed.sort_by(|a, b| a.0.total_cmp(&b.0));
        if sensed.len() > self.config.capacity {
            trace!(
                "Dropped {} entities beyond the capacity {}",
                sensed.len() - self.config.capacity,
                self.config.capacity
            );
        }

        let entities = sensed
            .into_iter()
            .take(self.config.capacity)
            .map(|(_, f)| f)
            .collect();

        Observation { scalars, entities }
    }

    /// Rotates the offset `(dx, dz)` into the agent frame and normalizes it.
    fn entity_feature(&self, agent: &AgentState, e: &SensedEntity, dx: f32, dz: f32) -> EntityFeature {
        let (sin, cos) = agent.heading.to_radians().sin_cos();
        let radius = self.config.sensor_radius;
        EntityFeature {
            kind: e.kind,
            value: e.value,
            relative_x: (dx * cos - dz * sin) / radius,
            relative_z: (dx * sin + dz * cos) / radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::EntityKind;

    fn cue(x: f32, z: f32) -> SensedEntity {
        SensedEntity {
            kind: EntityKind::Cue,
            value: Some(true),
            position: [x, z],
        }
    }

    #[test]
    fn test_scalar_normalization() {
        let builder = ObservationBuilder::new(SensorConfig::default().run_speed(2.0));
        let agent = AgentState {
            position: [5.0, -12.5],
            velocity: [3.0, -6.0],
            heading: 270.0,
            angular_velocity: 0.25,
        };
        let obs = builder.build(&agent, &[], 0.4);
        let expected = [0.4, 0.1, -0.2, 0.25, 0.5, -0.5, 0.5];
        for (v, e) in obs.scalars.iter().zip(expected.iter()) {
            assert!((v - e).abs() < 1e-6, "{:?}", obs.scalars);
        }
        assert!(obs.entities.is_empty());
    }

    #[test]
    fn test_negative_heading_wraps() {
        let builder = ObservationBuilder::new(SensorConfig::default());
        let agent = AgentState {
            heading: -90.0,
            ..AgentState::default()
        };
        let obs = builder.build(&agent, &[], 0.0);
        assert!((obs.scalars[6] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_relative_position_in_agent_frame() {
        let builder = ObservationBuilder::new(SensorConfig::default().sensor_radius(4.0));
        let agent = AgentState {
            position: [1.0, 1.0],
            heading: 90.0,
            ..AgentState::default()
        };
        // Facing +x, an entity at +x is straight ahead and one at +z is to the left
        let obs = builder.build(&agent, &[cue(3.0, 1.0), cue(1.0, 4.0)], 0.0);
        assert_eq!(obs.entities.len(), 2);
        assert!(obs.entities[0].relative_x.abs() < 1e-6);
        assert!((obs.entities[0].relative_z - 0.5).abs() < 1e-6);
        assert!((obs.entities[1].relative_x + 0.75).abs() < 1e-6);
        assert!(obs.entities[1].relative_z.abs() < 1e-6);
    }

    #[test]
    fn test_entities_out_of_range_are_ignored() {
        let builder = ObservationBuilder::new(SensorConfig::default().sensor_radius(2.0));
        let obs = builder.build(&AgentState::default(), &[cue(0.0, 2.5), cue(1.0, 1.0)], 0.0);
        assert_eq!(obs.entities.len(), 1);
        assert_eq!(obs.entities[0].to_array(), [1.0, 1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_truncation_keeps_nearest() {
        let builder = ObservationBuilder::new(SensorConfig::default().capacity(3));
        let entities = (0..8).rev().map(|i| cue(0.0, i as f32)).collect::<Vec<_>>();
        let obs = builder.build(&AgentState::default(), &entities, 0.0);
        assert_eq!(obs.entities.len(), 3);
        for (e, z) in obs.entities.iter().zip([0.0f32, 1.0, 2.0].iter()) {
            assert!((e.relative_z * 10.0 - z).abs() < 1e-5);
        }
    }
}
