//! Lofi Maker Core
//!
//! Platform-agnostic core types, traits, and error handling for Lofi Maker.
//!
//! This crate provides the foundational building blocks shared by the audio
//! pipeline and the command-line front end.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Audio Types**: `AudioBuffer`, `AudioFormat`, `SampleRate`
//! - **Parameters**: `PipelineParams`, `ReverbParams`, `EffectSpec`
//! - **Core Traits**: `AudioDecoder`, `AudioEncoder`
//! - **Error Handling**: Unified `LofiError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lofi_core::{AudioBuffer, AudioFormat, PipelineParams, SampleRate};
//!
//! // Two frames of interleaved stereo audio
//! let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 32);
//! let buffer = AudioBuffer::new(vec![0.1, -0.1, 0.2, -0.2], format);
//! assert_eq!(buffer.frames(), 2);
//!
//! // Default "slowed + reverb" settings
//! let params = PipelineParams::default();
//! assert!(params.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{LofiError, Result};
pub use traits::{AudioDecoder, AudioEncoder};

pub use types::{
    // Audio types
    AudioBuffer, AudioFormat, SampleRate,
    // Parameters
    EffectSpec, PipelineParams, ReverbParams,
};
