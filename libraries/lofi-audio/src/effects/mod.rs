//! Offline audio effects
//!
//! Effects run over whole buffers, in order, through an [`EffectChain`].
//!
//! Available effects:
//! - **Reverb**: Freeverb-style room reverb (combs + all-passes)
//! - **StereoDelay**: Haas widening by delaying the left channel

mod chain;
mod reverb;
mod stereo_delay;

pub use chain::{AudioEffect, EffectChain};
pub use reverb::Reverb;
pub use stereo_delay::{delay_samples, StereoDelay};
