use super::{Record, RecordValue, Recorder};
use log::info;
use std::collections::BTreeMap;

/// Keeps records in memory.
///
/// Written records are kept as they are. Stored records are averaged key by key
/// on [`Recorder::flush`]; non-scalar values are dropped from the aggregate.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    stored: Vec<Record>,
    aggregates: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the written records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Returns the aggregated records, one per flush.
    pub fn aggregates(&self) -> &[Record] {
        &self.aggregates
    }

    /// The number of stored records waiting for a flush.
    pub fn n_stored(&self) -> usize {
        self.stored.len()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn store(&mut self, record: Record) {
        self.stored.push(record);
    }

    fn flush(&mut self, step: i64) {
        if self.stored.is_empty() {
            return;
        }

        let mut sums: BTreeMap<String, (f32, usize)> = BTreeMap::new();
        for record in self.stored.drain(..) {
            for (k, v) in record.iter() {
                if let RecordValue::Scalar(v) = v {
                    let e = sums.entry(k.clone()).or_insert((0.0, 0));
                    e.0 += *v;
                    e.1 += 1;
                }
            }
        }

        let mut aggregate = Record::from_scalar("step", step as f32);
        for (k, (sum, n)) in sums.into_iter() {
            let mean = sum / n as f32;
            info!("step {}: {} = {:.4}", step, k, mean);
            aggregate.insert(k, RecordValue::Scalar(mean));
        }
        self.aggregates.push(aggregate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_averages_scalars() {
        let mut recorder = BufferedRecorder::new();
        recorder.store(Record::from_slice(&[
            ("reward", RecordValue::Scalar(1.0)),
            ("outcome", RecordValue::String("goal".to_string())),
        ]));
        recorder.store(Record::from_scalar("reward", 3.0));
        recorder.flush(2);

        assert_eq!(recorder.n_stored(), 0);
        let aggregate = &recorder.aggregates()[0];
        assert_eq!(aggregate.get_scalar("reward").unwrap(), 2.0);
        assert_eq!(aggregate.get_scalar("step").unwrap(), 2.0);
        assert!(aggregate.get("outcome").is_none());

        // Nothing stored, nothing aggregated
        recorder.flush(3);
        assert_eq!(recorder.aggregates().len(), 1);
    }
}
