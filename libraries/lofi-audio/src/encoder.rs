/// WAV encoder for the lossless intermediate file
use crate::error::{AudioError, Result};
use lofi_core::{AudioBuffer, AudioEncoder};
use std::io::BufWriter;
use std::path::Path;
use tempfile::NamedTempFile;

/// Sample encoding used inside the WAV container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavSampleFormat {
    /// 16-bit signed PCM; samples outside [-1.0, 1.0] are clipped
    #[default]
    Pcm16,
    /// 32-bit IEEE float; samples are written unclipped
    Float32,
}

impl WavSampleFormat {
    /// Lower-case name used in configuration files and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pcm16 => "pcm16",
            Self::Float32 => "float32",
        }
    }
}

/// Writes buffers as RIFF/WAVE files via hound
///
/// The file is first written to a temporary sibling of the destination and
/// only renamed into place once it is complete, so a failed encode never
/// leaves a truncated WAV behind.
#[derive(Debug, Clone, Default)]
pub struct WavEncoder {
    sample_format: WavSampleFormat,
}

impl WavEncoder {
    /// Create an encoder writing 16-bit PCM
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with the given sample format
    pub fn with_sample_format(sample_format: WavSampleFormat) -> Self {
        Self { sample_format }
    }

    /// Sample format this encoder writes
    pub fn sample_format(&self) -> WavSampleFormat {
        self.sample_format
    }

    fn write(&self, buffer: &AudioBuffer, destination: &Path) -> Result<()> {
        buffer
            .validate()
            .map_err(|e| AudioError::InvalidBuffer(e.to_string()))?;
        let channels = u16::try_from(buffer.channels())
            .map_err(|_| AudioError::InvalidBuffer("too many channels for WAV".to_string()))?;

        let spec = match self.sample_format {
            WavSampleFormat::Pcm16 => hound::WavSpec {
                channels,
                sample_rate: buffer.sample_rate().as_hz(),
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            },
            WavSampleFormat::Float32 => hound::WavSpec {
                channels,
                sample_rate: buffer.sample_rate().as_hz(),
                bits_per_sample: 32,
                sample_format: hound::SampleFormat::Float,
            },
        };

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staging = NamedTempFile::new_in(dir)?;

        {
            let mut writer = hound::WavWriter::new(BufWriter::new(staging.as_file_mut()), spec)?;
            match self.sample_format {
                WavSampleFormat::Pcm16 => {
                    for &sample in &buffer.samples {
                        writer.write_sample(to_pcm16(sample))?;
                    }
                }
                WavSampleFormat::Float32 => {
                    for &sample in &buffer.samples {
                        writer.write_sample(sample)?;
                    }
                }
            }
            writer.finalize()?;
        }

        staging
            .persist(destination)
            .map_err(|e| AudioError::Io(e.error))?;

        tracing::debug!(
            "Wrote {} ({} frames, {} Hz, {})",
            destination.display(),
            buffer.frames(),
            buffer.sample_rate().as_hz(),
            self.sample_format.name()
        );
        Ok(())
    }
}

/// Clip to [-1.0, 1.0] and scale to the signed 16-bit range
fn to_pcm16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

impl AudioEncoder for WavEncoder {
    fn encode(&mut self, buffer: &AudioBuffer, destination: &Path) -> lofi_core::Result<()> {
        self.write(buffer, destination)
            .map_err(|e| e.encoding(destination))
    }

    fn extension(&self) -> &'static str {
        "wav"
    }
}
