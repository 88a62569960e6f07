//! Buffer preparation stages
//!
//! Everything that happens to the audio before the effects run:
//! - **normalize_channels**: mono to stereo
//! - **loop_to_length**: cyclic repeat / trim to an exact frame count
//! - **Mixer**: primary track plus volume-scaled auxiliary tracks
//! - **shifted_rate**: the "slowed" sample rate

mod channels;
mod looper;
mod mixer;
mod tempo;

pub use channels::normalize_channels;
pub use looper::loop_to_length;
pub use mixer::{mix, Mixer};
pub use tempo::{apply_tempo_shift, shifted_rate};
