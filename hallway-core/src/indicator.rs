//! Cosmetic ground indicator.

/// Visual state of the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// Default material.
    Default,

    /// Flashed after reaching the correct target.
    Goal,

    /// Flashed after reaching the wrong target.
    Fail,
}

/// Swaps the ground indicator and restores the default after a delay in real time.
///
/// The timer is advanced by frame ticks and never blocks the tick loop. A new
/// flash replaces the running one.
#[derive(Clone, Debug)]
pub struct GroundIndicator {
    current: Indicator,
    remaining: Option<f32>,
}

impl Default for GroundIndicator {
    fn default() -> Self {
        Self {
            current: Indicator::Default,
            remaining: None,
        }
    }
}

impl GroundIndicator {
    /// Shows `indicator` for `duration` seconds of real time.
    pub fn flash(&mut self, indicator: Indicator, duration: f32) {
        self.current = indicator;
        self.remaining = Some(duration);
    }

    /// Advances the timer by `dt` seconds of real time.
    pub fn frame_tick(&mut self, dt: f32) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.current = Indicator::Default;
                self.remaining = None;
            }
        }
    }

    /// Returns the indicator currently shown.
    pub fn current(&self) -> Indicator {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_is_restored() {
        let mut indicator = GroundIndicator::default();
        indicator.flash(Indicator::Goal, 0.5);
        indicator.frame_tick(0.3);
        assert_eq!(indicator.current(), Indicator::Goal);
        indicator.frame_tick(0.3);
        assert_eq!(indicator.current(), Indicator::Default);
    }

    #[test]
    fn test_new_flash_replaces_running_one() {
        let mut indicator = GroundIndicator::default();
        indicator.flash(Indicator::Goal, 0.5);
        indicator.frame_tick(0.4);
        indicator.flash(Indicator::Fail, 0.5);
        indicator.frame_tick(0.4);
        assert_eq!(indicator.current(), Indicator::Fail);
        indicator.frame_tick(0.2);
        assert_eq!(indicator.current(), Indicator::Default);
    }
}
