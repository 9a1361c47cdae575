//! Records of episodes and their destinations.
//!
//! The [`DecisionScheduler`](crate::DecisionScheduler) emits a [`Record`] at the end
//! of every episode. Hosts pass it to a [`Recorder`]:
//!
//! * [`BufferedRecorder`] keeps records in memory and averages stored scalars on flush.
//! * [`NullRecorder`] discards everything.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
