/// Audio-related types
use crate::error::{LofiError, Result};
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// 44.1kHz
    pub const CD_QUALITY: Self = Self(44_100);
    /// 48kHz
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Audio format information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample of the source material
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// 32-bit float stereo at the given rate (the shape the pipeline works in)
    pub fn stereo(sample_rate: SampleRate) -> Self {
        Self::new(sample_rate, 2, 32)
    }
}

/// Audio buffer containing decoded samples
///
/// Interleaved format: [L, R, L, R, ...] for stereo. Samples are nominally
/// in [-1.0, 1.0] but intermediate stages (mixing) may leave that range.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Audio samples (f32, interleaved)
    pub samples: Vec<f32>,

    /// Audio format information
    pub format: AudioFormat,
}

impl AudioBuffer {
    /// Create a new audio buffer
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Self {
        Self { samples, format }
    }

    /// Create a buffer of `frames` silent frames
    pub fn silence(frames: usize, format: AudioFormat) -> Self {
        Self {
            samples: vec![0.0; frames * format.channels as usize],
            format,
        }
    }

    /// Number of interleaved channels
    pub fn channels(&self) -> usize {
        self.format.channels as usize
    }

    /// Sample rate the buffer is tagged with
    pub fn sample_rate(&self) -> SampleRate {
        self.format.sample_rate
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        match self.channels() {
            0 => 0,
            channels => self.samples.len() / channels,
        }
    }

    /// Samples of frame `index`, one per channel
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        let channels = self.channels();
        let start = index.checked_mul(channels)?;
        self.samples.get(start..start + channels)
    }

    /// Iterate over the samples of one channel
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        let channels = self.channels().max(1);
        let skip = if channel < self.channels() {
            channel
        } else {
            self.samples.len()
        };
        self.samples.iter().skip(skip).step_by(channels).copied()
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        match self.format.sample_rate.as_hz() {
            0 => 0.0,
            hz => self.frames() as f64 / f64::from(hz),
        }
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check the buffer invariants: at least one channel, a positive rate,
    /// and whole frames only.
    pub fn validate(&self) -> Result<()> {
        let channels = self.channels();
        if channels == 0 {
            return Err(LofiError::invalid_parameter(
                "audio buffer must have at least one channel",
            ));
        }
        if self.format.sample_rate.as_hz() == 0 {
            return Err(LofiError::invalid_parameter(
                "audio buffer sample rate must be positive",
            ));
        }
        if self.samples.len() % channels != 0 {
            return Err(LofiError::invalid_parameter(format!(
                "{} samples do not divide into {} channels",
                self.samples.len(),
                channels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_common_values() {
        assert_eq!(SampleRate::CD_QUALITY.as_hz(), 44_100);
        assert_eq!(SampleRate::DVD_QUALITY.as_hz(), 48_000);
    }

    #[test]
    fn audio_buffer_frames_calculation() {
        let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 16);
        // 8 samples with 2 channels = 4 frames
        let buffer = AudioBuffer::new(vec![0.0; 8], format);
        assert_eq!(buffer.frames(), 4);
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn audio_buffer_duration() {
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16);
        // 88200 samples with 2 channels = 44100 frames = 1 second
        let buffer = AudioBuffer::new(vec![0.0; 88_200], format);
        assert!((buffer.duration_secs() - 1.0).abs() < 0.01);
    }

    #[test]
    fn frame_and_channel_access() {
        let format = AudioFormat::stereo(SampleRate::new(1000));
        let buffer = AudioBuffer::new(vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0], format);

        assert_eq!(buffer.frame(1), Some(&[2.0, -2.0][..]));
        assert_eq!(buffer.frame(3), None);
        assert_eq!(buffer.channel(0).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(buffer.channel(1).collect::<Vec<_>>(), vec![-1.0, -2.0, -3.0]);
        assert_eq!(buffer.channel(2).count(), 0);
    }

    #[test]
    fn silence_has_requested_shape() {
        let buffer = AudioBuffer::silence(10, AudioFormat::stereo(SampleRate::CD_QUALITY));
        assert_eq!(buffer.frames(), 10);
        assert_eq!(buffer.channels(), 2);
        assert!(buffer.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn validate_rejects_broken_buffers() {
        let zero_channels = AudioBuffer::new(vec![0.0; 4], AudioFormat::new(SampleRate::CD_QUALITY, 0, 32));
        assert!(zero_channels.validate().is_err());
        assert_eq!(zero_channels.frames(), 0);

        let partial_frame = AudioBuffer::new(vec![0.0; 3], AudioFormat::stereo(SampleRate::CD_QUALITY));
        assert!(partial_frame.validate().is_err());

        let zero_rate = AudioBuffer::new(vec![0.0; 2], AudioFormat::stereo(SampleRate::new(0)));
        assert!(zero_rate.validate().is_err());

        let ok = AudioBuffer::new(vec![0.0; 4], AudioFormat::stereo(SampleRate::CD_QUALITY));
        assert!(ok.validate().is_ok());
    }
}
