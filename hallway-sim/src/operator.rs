//! A scripted operator standing in for a human at the keyboard.
use hallway_core::{AgentState, KeyState};

/// Steers the agent toward a goal position with the three keys.
///
/// The operator turns until the goal is within `tolerance` degrees of the heading,
/// then walks forward. Before switching keys, it releases all keys for a random
/// number of frames, up to `max_hesitation` frames.
pub struct SteeringOperator {
    tolerance: f32,
    max_hesitation: usize,
    hesitation: usize,
    intended: KeyState,
}

impl SteeringOperator {
    /// Constructs a [`SteeringOperator`].
    pub fn new(tolerance: f32, max_hesitation: usize) -> Self {
        Self {
            tolerance,
            max_hesitation,
            hesitation: 0,
            intended: KeyState::RELEASED,
        }
    }

    /// Forgets the intention of the previous episode.
    pub fn reset(&mut self) {
        self.hesitation = 0;
        self.intended = KeyState::RELEASED;
    }

    /// Returns the keys held in the next frame.
    pub fn keys(&mut self, agent: &AgentState, goal: [f32; 2]) -> KeyState {
        let keys = self.steer(agent, goal);
        if keys != self.intended {
            self.intended = keys;
            self.hesitation = if self.max_hesitation > 0 {
                fastrand::usize(..=self.max_hesitation)
            } else {
                0
            };
        }

        if self.hesitation > 0 {
            self.hesitation -= 1;
            KeyState::RELEASED
        } else {
            self.intended
        }
    }

    fn steer(&self, agent: &AgentState, goal: [f32; 2]) -> KeyState {
        let dx = goal[0] - agent.position[0];
        let dz = goal[1] - agent.position[1];
        let bearing = dx.atan2(dz).to_degrees();
        let diff = (bearing - agent.heading + 180.0).rem_euclid(360.0) - 180.0;

        if diff > self.tolerance {
            KeyState {
                turn_right: true,
                ..KeyState::RELEASED
            }
        } else if diff < -self.tolerance {
            KeyState {
                turn_left: true,
                ..KeyState::RELEASED
            }
        } else {
            KeyState::FORWARD
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hallway_core::ActionClass;

    #[test]
    fn test_steering() {
        let mut operator = SteeringOperator::new(10.0, 0);
        let agent = AgentState::default();

        // Straight ahead, to the right, to the left, behind on the right
        let keys = |op: &mut SteeringOperator, goal| op.keys(&agent, goal).action_class();
        assert_eq!(keys(&mut operator, [0.0, 5.0]), ActionClass::Forward);
        assert_eq!(keys(&mut operator, [5.0, 1.0]), ActionClass::TurnRight);
        assert_eq!(keys(&mut operator, [-5.0, 1.0]), ActionClass::TurnLeft);
        assert_eq!(keys(&mut operator, [1.0, -5.0]), ActionClass::TurnRight);
    }

    #[test]
    fn test_hesitation_releases_keys() {
        fastrand::seed(42);
        let mut operator = SteeringOperator::new(10.0, 5);
        let agent = AgentState::default();

        let mut n_released = 0;
        for _ in 0..10 {
            let keys = operator.keys(&agent, [0.0, 5.0]);
            if keys == KeyState::RELEASED {
                n_released += 1;
            } else {
                assert_eq!(keys, KeyState::FORWARD);
            }
        }
        assert!(n_released <= 5);
        assert_eq!(operator.keys(&agent, [0.0, 5.0]), KeyState::FORWARD);
    }
}
