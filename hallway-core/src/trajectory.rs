//! Capture of operator trajectories and their replay.
mod buffer;
mod replay;
pub use buffer::{TrajectoryBuffer, TrajectoryStep};
pub use replay::ReplayDriver;
