//! Mapping between reconsideration delays and the continuous action parameter.
use crate::error::HallwayError;
use serde::{Deserialize, Serialize};

/// Linear interpolation with `t` clamped into `[0, 1]`.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Inverse of [`lerp`], clamped into `[0, 1]`. Returns 0 when `a == b`.
fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((v - a) / (b - a)).clamp(0.0, 1.0)
    }
}

/// Two-segment piecewise-linear mapping anchored at three delays.
///
/// The continuous parameter `-1`, `0` and `1` correspond to
/// [`short`](DelayMapping::short), [`typical`](DelayMapping::typical) and
/// [`long`](DelayMapping::long), respectively. [`DelayMapping::decode`] is used
/// when a policy chooses its own delay and [`DelayMapping::encode`] when a
/// recorded operator delay is turned back into a training target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DelayMapping {
    /// Delay for parameter `-1`, in seconds.
    pub short: f32,

    /// Delay for parameter `0`, in seconds.
    pub typical: f32,

    /// Delay for parameter `1`, in seconds. Also the reconsideration ceiling of the operator.
    pub long: f32,
}

impl Default for DelayMapping {
    fn default() -> Self {
        Self {
            short: 0.1,
            typical: 0.5,
            long: 2.5,
        }
    }
}

impl DelayMapping {
    /// Constructs a [`DelayMapping`].
    pub fn new(short: f32, typical: f32, long: f32) -> Self {
        Self {
            short,
            typical,
            long,
        }
    }

    /// Checks `0 <= short < typical < long`.
    ///
    /// Both segments must be non-degenerate for [`DelayMapping::encode`] to invert
    /// [`DelayMapping::decode`].
    pub fn validate(&self) -> Result<(), HallwayError> {
        let ordered = 0.0 <= self.short && self.short < self.typical && self.typical < self.long;
        if !ordered {
            return Err(HallwayError::InvalidConfig(format!(
                "delays must satisfy 0 <= short < typical < long, got {:?}",
                self
            )));
        }
        Ok(())
    }

    /// Maps a continuous parameter to a delay in seconds.
    ///
    /// The parameter is clamped into `[-1, 1]`; NaN is treated as 0.
    pub fn decode(&self, parameter: f32) -> f32 {
        let p = if parameter.is_nan() {
            0.0
        } else {
            parameter.clamp(-1.0, 1.0)
        };

        if p < 0.0 {
            lerp(self.short, self.typical, p + 1.0)
        } else {
            lerp(self.typical, self.long, p)
        }
    }

    /// Maps a delay in seconds to the continuous parameter in `[-1, 1]`.
    ///
    /// Delays outside `[short, long]` saturate. `typical` maps to exactly 0.
    pub fn encode(&self, delay: f32) -> f32 {
        if delay < self.typical {
            inverse_lerp(self.short, self.typical, delay) - 1.0
        } else {
            inverse_lerp(self.typical, self.long, delay)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors() {
        let m = DelayMapping::new(0.1, 0.5, 2.5);
        assert_eq!(m.decode(-1.0), 0.1);
        assert_eq!(m.decode(0.0), 0.5);
        assert_eq!(m.decode(1.0), 2.5);
        assert_eq!(m.encode(0.1), -1.0);
        assert_eq!(m.encode(0.5), 0.0);
        assert_eq!(m.encode(2.5), 1.0);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let m = DelayMapping::new(0.1, 0.5, 2.5);
        assert_eq!(m.decode(-7.0), 0.1);
        assert_eq!(m.decode(3.0), 2.5);
        assert_eq!(m.decode(f32::NAN), 0.5);
        assert_eq!(m.encode(0.0), -1.0);
        assert_eq!(m.encode(10.0), 1.0);
    }

    #[test]
    fn test_segments() {
        let m = DelayMapping::new(0.0, 1.0, 3.0);
        assert!((m.decode(-0.5) - 0.5).abs() < 1e-6);
        assert!((m.decode(0.5) - 2.0).abs() < 1e-6);
        assert!((m.encode(0.25) + 0.75).abs() < 1e-6);
        assert!((m.encode(1.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_validate() {
        assert!(DelayMapping::default().validate().is_ok());
        assert!(DelayMapping::new(0.5, 0.5, 0.5).validate().is_err());
        assert!(DelayMapping::new(0.6, 0.5, 1.0).validate().is_err());
        assert!(DelayMapping::new(-0.1, 0.5, 1.0).validate().is_err());
        assert!(DelayMapping::new(0.5, 0.5, 1.0).validate().is_err());
        assert!(DelayMapping::new(0.1, 1.0, 1.0).validate().is_err());
        assert!(DelayMapping::new(0.0, 0.5, 1.0).validate().is_ok());
    }
}
