//! Episode and decision timing.

/// Fraction of a fixed tick tolerated when comparing elapsed time with a threshold.
const TICK_TOLERANCE: f64 = 1e-3;

/// Condition under which a new decision is due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DueRule {
    /// Operator input: due at the reconsideration ceiling, or as soon as the
    /// staged action carries a non-zero delay.
    Ceiling {
        /// Reconsideration ceiling in seconds.
        ceiling: f32,

        /// Delay of the staged action in seconds.
        staged_delay: f32,
    },

    /// Policy output: due when the delay chosen by the previous decision has elapsed.
    SelfPaced {
        /// Delay of the committed action in seconds.
        delay: f32,
    },
}

/// Tracks the elapsed time of an episode and since the last decision.
///
/// Time advances only in whole fixed ticks and is kept as tick counts, so that
/// thresholds that are multiples of the tick are reached on the exact tick.
#[derive(Clone, Debug)]
pub struct DecisionClock {
    fixed_delta: f32,
    max_episode_duration: f32,
    ticks_since_episode_begin: u64,
    ticks_since_last_decision: u64,
}

impl DecisionClock {
    /// Constructs a clock advancing `fixed_delta` seconds per tick.
    pub fn new(fixed_delta: f32, max_episode_duration: f32) -> Self {
        Self {
            fixed_delta,
            max_episode_duration,
            ticks_since_episode_begin: 0,
            ticks_since_last_decision: 0,
        }
    }

    /// Resets both timers to zero.
    pub fn reset(&mut self) {
        self.ticks_since_episode_begin = 0;
        self.ticks_since_last_decision = 0;
    }

    /// Advances both timers by one fixed tick.
    pub fn advance(&mut self) {
        self.ticks_since_episode_begin += 1;
        self.ticks_since_last_decision += 1;
    }

    /// Resets the time since the last decision.
    pub fn reset_decision(&mut self) {
        self.ticks_since_last_decision = 0;
    }

    /// Duration of a fixed tick in seconds.
    pub fn fixed_delta(&self) -> f32 {
        self.fixed_delta
    }

    /// Maximum duration of an episode in seconds.
    pub fn max_episode_duration(&self) -> f32 {
        self.max_episode_duration
    }

    /// The number of fixed ticks since the beginning of the episode.
    pub fn ticks_since_episode_begin(&self) -> u64 {
        self.ticks_since_episode_begin
    }

    /// Seconds since the beginning of the episode.
    pub fn time_since_episode_begin(&self) -> f32 {
        self.seconds(self.ticks_since_episode_begin) as f32
    }

    /// Seconds since the last decision.
    pub fn time_since_last_decision(&self) -> f32 {
        self.seconds(self.ticks_since_last_decision) as f32
    }

    /// Returns `true` if no time has elapsed since the last decision, i.e., a new
    /// deliberation window is about to open.
    pub fn is_window_start(&self) -> bool {
        self.ticks_since_last_decision == 0
    }

    /// Returns `true` once the episode reached its maximum duration.
    pub fn is_episode_timed_out(&self) -> bool {
        self.reached(self.ticks_since_episode_begin, self.max_episode_duration)
    }

    /// Returns `true` if a new decision is due under the given rule.
    pub fn is_decision_due(&self, rule: DueRule) -> bool {
        match rule {
            DueRule::Ceiling {
                ceiling,
                staged_delay,
            } => staged_delay != 0.0 || self.reached(self.ticks_since_last_decision, ceiling),
            DueRule::SelfPaced { delay } => self.reached(self.ticks_since_last_decision, delay),
        }
    }

    fn seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.fixed_delta as f64
    }

    fn reached(&self, ticks: u64, threshold: f32) -> bool {
        self.seconds(ticks) + TICK_TOLERANCE * self.fixed_delta as f64 >= threshold as f64
    }
}
