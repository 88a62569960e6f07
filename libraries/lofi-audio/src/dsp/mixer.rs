/// Summing auxiliary tracks into the primary one
use super::{loop_to_length, normalize_channels};
use lofi_core::{AudioBuffer, LofiError, Result};

/// Accumulates volume-scaled effect tracks on top of a primary track.
///
/// The accumulator starts as the (stereo-normalized) primary buffer and its
/// length never changes: every effect is looped or trimmed to that length
/// before it is added. Nothing is clipped here.
///
/// An effect is either added completely or not at all. If preparing it fails
/// the accumulator is left untouched.
#[derive(Debug, Clone)]
pub struct Mixer {
    accumulator: AudioBuffer,
}

impl Mixer {
    /// Start a mix from the primary track
    pub fn new(primary: AudioBuffer) -> Self {
        Self {
            accumulator: normalize_channels(primary),
        }
    }

    /// Length of the mix in frames
    pub fn frames(&self) -> usize {
        self.accumulator.frames()
    }

    /// Add `effect` scaled by `volume`.
    ///
    /// Channel `c` of the effect lands on channel `c` of the mix; channels
    /// only one side has are left alone. Effects recorded at a different
    /// sample rate are aligned frame by frame, not by duration.
    ///
    /// # Errors
    /// `InvalidParameter` for a non-finite volume, an effect with no frames
    /// or an empty primary track.
    pub fn add(&mut self, effect: &AudioBuffer, volume: f32) -> Result<()> {
        if !volume.is_finite() {
            return Err(LofiError::invalid_parameter(format!(
                "effect volume must be finite (got {volume})"
            )));
        }

        if effect.sample_rate() != self.accumulator.sample_rate() {
            tracing::debug!(
                "Effect at {} Hz mixed into {} Hz track by frame count",
                effect.sample_rate().as_hz(),
                self.accumulator.sample_rate().as_hz()
            );
        }

        let prepared = loop_to_length(&normalize_channels(effect.clone()), self.frames())?;
        if volume == 0.0 {
            return Ok(());
        }

        let mix_channels = self.accumulator.channels();
        let fx_channels = prepared.channels();
        for (mix_frame, fx_frame) in self
            .accumulator
            .samples
            .chunks_exact_mut(mix_channels)
            .zip(prepared.samples.chunks_exact(fx_channels))
        {
            for (out, &sample) in mix_frame.iter_mut().zip(fx_frame) {
                *out += sample * volume;
            }
        }

        Ok(())
    }

    /// The mixed buffer
    pub fn finish(self) -> AudioBuffer {
        self.accumulator
    }
}

/// Mix `effects` (buffer, volume) into `primary` in one call
pub fn mix(primary: AudioBuffer, effects: &[(AudioBuffer, f32)]) -> Result<AudioBuffer> {
    let mut mixer = Mixer::new(primary);
    for (effect, volume) in effects {
        mixer.add(effect, *volume)?;
    }
    Ok(mixer.finish())
}
