//! Haas-effect stereo widening

use super::chain::AudioEffect;
use lofi_core::{AudioBuffer, SampleRate};

/// Delay in whole samples: `floor(delay_ms * rate / 1000)`
pub fn delay_samples(delay_ms: f64, sample_rate: SampleRate) -> usize {
    if !delay_ms.is_finite() || delay_ms <= 0.0 {
        return 0;
    }
    (delay_ms * f64::from(sample_rate.as_hz()) / 1000.0).floor() as usize
}

/// Delays the left channel against the right one.
///
/// The left channel gets `shift` leading zeros and loses its last `shift`
/// samples, so the buffer length is unchanged. The right channel and any
/// further channels are not touched. A shift longer than the buffer
/// silences the left channel.
///
/// Mono buffers pass through.
#[derive(Debug, Clone)]
pub struct StereoDelay {
    delay_ms: f64,
    enabled: bool,
}

impl StereoDelay {
    /// Create a left-channel delay of `delay_ms` milliseconds
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            enabled: true,
        }
    }

    /// Configured delay in milliseconds
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }
}

impl AudioEffect for StereoDelay {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.channels();
        if channels < 2 {
            return;
        }

        let frames = buffer.frames();
        let shift = delay_samples(self.delay_ms, buffer.sample_rate()).min(frames);
        if shift == 0 {
            return;
        }
        tracing::trace!("Delaying left channel by {} samples", shift);

        // Walk backwards so every source sample is read before it is overwritten
        for frame in (shift..frames).rev() {
            buffer.samples[frame * channels] = buffer.samples[(frame - shift) * channels];
        }
        for frame in 0..shift {
            buffer.samples[frame * channels] = 0.0;
        }
    }

    fn reset(&mut self) {}

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "StereoDelay"
    }
}
