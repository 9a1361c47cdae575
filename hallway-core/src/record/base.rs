//! Key-value records of episodes.
use crate::error::HallwayError;
use chrono::prelude::{DateTime, Local};
use std::collections::{hash_map::Iter, HashMap};

/// A value in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, e.g., an episode reward.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A text value, e.g., the outcome of an episode.
    String(String),
}

/// Key-value pairs describing an event, typically the end of an episode.
///
/// ```rust
/// use hallway_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("episode_reward", -1.5);
/// record.insert("outcome", RecordValue::String("timeout".to_string()));
/// assert_eq!(record.get_scalar("episode_reward").unwrap(), -1.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates a record with a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a value, replacing the one with the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Iterates over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns the value of a key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Gets a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, HallwayError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(HallwayError::RecordValueTypeError("Scalar".to_string())),
            None => Err(HallwayError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string.
    pub fn get_string(&self, k: &str) -> Result<String, HallwayError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(HallwayError::RecordValueTypeError("String".to_string())),
            None => Err(HallwayError::RecordKeyError(k.to_string())),
        }
    }
}
