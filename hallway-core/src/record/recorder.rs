use super::Record;

/// Writes records to an output destination.
pub trait Recorder {
    /// Writes a record immediately.
    fn write(&mut self, record: Record);

    /// Stores a record for later aggregation.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records and clears them.
    ///
    /// `step` is the index of the aggregation, e.g., the number of episodes so far.
    fn flush(&mut self, step: i64);
}
