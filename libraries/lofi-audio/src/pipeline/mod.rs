//! Slowed + reverb pipeline
//!
//! # Architecture
//!
//! ```text
//! decode primary -> normalize -> Mixer (+ looped, scaled effects)
//!     -> tempo shift (relabel rate) -> Reverb -> StereoDelay -> encode
//! ```

mod lofi;
mod output;

pub use lofi::{apply_slowed_reverb, LofiPipeline};
pub use output::{PipelineOutput, PipelineWarning, RenderOutcome, RenderRequest};
