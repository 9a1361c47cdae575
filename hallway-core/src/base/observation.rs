//! Observation.
use serde::{Deserialize, Serialize};

/// The number of scalar features in an [`Observation`].
pub const NUM_SCALARS: usize = 7;

/// The number of values in a flattened [`EntityFeature`].
pub const ENTITY_FEATURE_DIM: usize = 4;

/// Kind of a perceivable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A cue symbol, shown to the agent at the start of the hallway.
    Cue,

    /// A target zone (pressure pad) carrying a symbol.
    Target,
}

/// Features of a single entity within the sensing radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityFeature {
    /// Kind of the entity.
    pub kind: EntityKind,

    /// `Some(true)` for an X symbol, `Some(false)` for an O symbol.
    pub value: Option<bool>,

    /// Position along the agent's right axis, divided by the sensing radius.
    pub relative_x: f32,

    /// Position along the agent's forward axis, divided by the sensing radius.
    pub relative_z: f32,
}

impl EntityFeature {
    /// Flattens the feature into the vector fed to the entity buffer sensor:
    /// `[kind flag, value flag, x, z]`.
    ///
    /// The kind flag is 1 for cues and 0 for targets. The value flag is +1 for X,
    /// -1 for O and 0 if the value is undefined.
    pub fn to_array(&self) -> [f32; ENTITY_FEATURE_DIM] {
        let kind = match self.kind {
            EntityKind::Cue => 1.0,
            EntityKind::Target => 0.0,
        };
        let value = match self.value {
            Some(true) => 1.0,
            Some(false) => -1.0,
            None => 0.0,
        };
        [kind, value, self.relative_x, self.relative_z]
    }
}

/// Observation of the agent: fixed scalar features and a variable-length entity list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Scalar features.
    pub scalars: [f32; NUM_SCALARS],

    /// Entity features.
    pub entities: Vec<EntityFeature>,
}

impl Observation {
    /// Returns an observation with zero scalars and no entity.
    pub fn empty() -> Self {
        Self {
            scalars: [0.0; NUM_SCALARS],
            entities: vec![],
        }
    }
}
