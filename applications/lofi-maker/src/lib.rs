//! Lofi Maker Library
//!
//! Command-line "slowed + reverb" renderer: configuration, effect presets,
//! the render service (pipeline, WAV, MP3 via ffmpeg), and the batch queue.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod jobs;
pub mod presets;
pub mod services;

// Re-export commonly used types for convenience
pub use config::{EffectPreset, LofiConfig, OutputFormat, SampleFormat};
pub use error::{AppError, Result};
pub use jobs::{BatchQueue, BatchReport};
pub use services::{FfmpegFallbackDecoder, RenderService, RenderedTrack, TranscodingService};
