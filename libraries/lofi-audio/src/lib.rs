//! Lofi Maker Audio
//!
//! Audio decoding, encoding, and the "slowed + reverb" processing pipeline.
//!
//! This crate provides:
//! - Audio decoding via Symphonia (MP3, FLAC, OGG, WAV, AAC)
//! - WAV encoding via hound for the lossless intermediate file
//! - Buffer preparation: mono-to-stereo, looping/trimming, mixing, tempo shift
//! - Effects: Freeverb-style room reverb and a Haas stereo delay
//! - `LofiPipeline`, which sequences all of the above for one track
//!
//! # Example: Processing a Track
//!
//! ```rust,no_run
//! use lofi_audio::{LofiPipeline, SymphoniaDecoder};
//! use lofi_core::{EffectSpec, PipelineParams};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = LofiPipeline::new(SymphoniaDecoder::new(), PipelineParams::default())?;
//! let output = pipeline.process(
//!     Path::new("/music/song.mp3"),
//!     &[EffectSpec::new("/fx/rain.wav", 0.4)],
//! )?;
//!
//! println!(
//!     "Rendered {} frames at {} Hz ({} warnings)",
//!     output.buffer.frames(),
//!     output.buffer.sample_rate().as_hz(),
//!     output.warnings.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Using Effects
//!
//! ```rust
//! use lofi_audio::effects::{EffectChain, Reverb, StereoDelay};
//! use lofi_core::{AudioBuffer, AudioFormat, ReverbParams, SampleRate};
//!
//! let rate = SampleRate::new(40_572);
//! let mut chain = EffectChain::new();
//! chain.add_effect(Box::new(Reverb::new(ReverbParams::default(), rate)));
//! chain.add_effect(Box::new(StereoDelay::new(2.0)));
//!
//! let mut buffer = AudioBuffer::silence(1024, AudioFormat::stereo(rate));
//! chain.process(&mut buffer);
//! assert_eq!(buffer.frames(), 1024);
//! ```

mod decoder;
pub mod dsp;
pub mod effects;
mod encoder;
mod error;
pub mod pipeline;

pub use decoder::SymphoniaDecoder;
pub use encoder::{WavEncoder, WavSampleFormat};
pub use error::{AudioError, Result};
pub use pipeline::{
    apply_slowed_reverb, LofiPipeline, PipelineOutput, PipelineWarning, RenderOutcome,
    RenderRequest,
};
