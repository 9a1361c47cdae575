//! Actions.
use serde::{Deserialize, Serialize};

/// Discrete locomotion class of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionClass {
    /// No input. The agent keeps drifting with its current velocity.
    Idle,

    /// Forward impulse.
    Forward,

    /// Rotation to the right.
    TurnRight,

    /// Rotation to the left.
    TurnLeft,
}

impl ActionClass {
    /// The number of action classes.
    pub const COUNT: usize = 4;

    /// Returns the class index used on the protocol, `0..4`.
    pub fn index(self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Forward => 1,
            Self::TurnRight => 2,
            Self::TurnLeft => 3,
        }
    }

    /// Converts a raw class index into a class.
    ///
    /// Indices outside of `0..4` are clamped into the range.
    pub fn from_index(ix: i64) -> Self {
        match ix.clamp(0, Self::COUNT as i64 - 1) {
            0 => Self::Idle,
            1 => Self::Forward,
            2 => Self::TurnRight,
            _ => Self::TurnLeft,
        }
    }
}

impl Default for ActionClass {
    fn default() -> Self {
        Self::Idle
    }
}

/// An action class together with the delay before the next reconsideration.
///
/// The delay is in seconds of simulated time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Action class.
    pub class: ActionClass,

    /// Delay in seconds.
    pub delay: f32,
}

impl PendingAction {
    /// Constructs a [`PendingAction`].
    ///
    /// Negative or NaN delays are replaced with zero.
    pub fn new(class: ActionClass, delay: f32) -> Self {
        let delay = if delay > 0.0 { delay } else { 0.0 };
        Self { class, delay }
    }
}

/// States of the three keys the operator can hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Forward key (`W`).
    pub forward: bool,

    /// Turn-right key (`D`).
    pub turn_right: bool,

    /// Turn-left key (`A`).
    pub turn_left: bool,
}

impl KeyState {
    /// No key is held.
    pub const RELEASED: Self = Self {
        forward: false,
        turn_right: false,
        turn_left: false,
    };

    /// Only the forward key is held.
    pub const FORWARD: Self = Self {
        forward: true,
        turn_right: false,
        turn_left: false,
    };

    /// Maps the key state to an action class.
    ///
    /// When several keys are held, forward wins over turn-right, which wins over turn-left.
    pub fn action_class(&self) -> ActionClass {
        if self.forward {
            ActionClass::Forward
        } else if self.turn_right {
            ActionClass::TurnRight
        } else if self.turn_left {
            ActionClass::TurnLeft
        } else {
            ActionClass::Idle
        }
    }
}

/// Output of the decision backend: a class index and a continuous delay parameter.
///
/// Neither field is trusted. The class index is clamped into `0..4` and the delay
/// parameter into `[-1, 1]` when the decision is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDecision {
    /// Class index.
    pub class_index: i64,

    /// Continuous delay parameter in `[-1, 1]`.
    pub delay_parameter: f32,
}

impl RawDecision {
    /// Constructs a [`RawDecision`].
    pub fn new(class_index: i64, delay_parameter: f32) -> Self {
        Self {
            class_index,
            delay_parameter,
        }
    }

    /// Returns the action class, clamping the raw index.
    pub fn class(&self) -> ActionClass {
        ActionClass::from_index(self.class_index)
    }
}
