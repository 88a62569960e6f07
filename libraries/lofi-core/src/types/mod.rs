/// Domain types for Lofi Maker
mod audio;
mod params;

pub use audio::{AudioBuffer, AudioFormat, SampleRate};
pub use params::{EffectSpec, PipelineParams, ReverbParams};
