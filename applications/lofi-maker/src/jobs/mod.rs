/// Background jobs
pub mod batch;

pub use batch::{collect_inputs, BatchJob, BatchQueue, BatchReport, FailedTrack};
