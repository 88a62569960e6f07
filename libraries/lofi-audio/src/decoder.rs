/// Audio decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use lofi_core::{AudioBuffer, AudioDecoder, AudioFormat, SampleRate};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Extensions the bundled Symphonia codecs can read
const SUPPORTED_EXTENSIONS: [&str; 7] = ["mp3", "flac", "ogg", "wav", "m4a", "aac", "mp4"];

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG/Vorbis, WAV, AAC (MP4 container)
///
/// Unlike a playback decoder this keeps the file's own channel layout:
/// mono stays mono so the pipeline can decide how to widen it.
#[derive(Debug, Default)]
pub struct SymphoniaDecoder {
    _private: (),
}

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Decode the whole file into one interleaved buffer
    fn decode_file(path: &Path) -> Result<AudioBuffer> {
        // Check if file exists
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| match e {
                SymphoniaError::Unsupported(what) => AudioError::UnsupportedFormat(what.to_string()),
                other => AudioError::Symphonia(format!("Failed to probe file: {}", other)),
            })?;

        let mut format = probed.format;

        // First track with a real codec
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::DecodeError("No audio tracks found".to_string()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());
        let bits_per_sample = track
            .codec_params
            .bits_per_sample
            .and_then(|b| u16::try_from(b).ok())
            .unwrap_or(32);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| match e {
                SymphoniaError::Unsupported(what) => AudioError::UnsupportedFormat(what.to_string()),
                other => AudioError::Symphonia(format!("Failed to create decoder: {}", other)),
            })?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(e) => {
                    return Err(AudioError::Symphonia(format!("Error reading packet: {}", e)));
                }
            };

            // Skip packets that are not for the selected track
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    // A single corrupt packet is dropped, the rest of the stream is kept
                    tracing::warn!("Skipping corrupt packet in {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(AudioError::DecodeError(e.to_string())),
            };

            let spec = *decoded.spec();
            sample_rate = sample_rate.or(Some(spec.rate));
            channels = channels.or(Some(spec.channels.count()));

            let needed = decoded.capacity() * spec.channels.count();
            if !matches!(sample_buf.as_ref(), Some(buf) if buf.capacity() >= needed) {
                sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }
            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        let sample_rate = sample_rate
            .filter(|&hz| hz > 0)
            .ok_or_else(|| AudioError::DecodeError("Unknown sample rate".to_string()))?;
        let channels = channels
            .and_then(|c| u16::try_from(c).ok())
            .filter(|&c| c > 0)
            .ok_or_else(|| AudioError::DecodeError("Unknown channel layout".to_string()))?;

        let buffer = AudioBuffer::new(
            samples,
            AudioFormat::new(SampleRate::new(sample_rate), channels, bits_per_sample),
        );
        buffer
            .validate()
            .map_err(|e| AudioError::InvalidBuffer(e.to_string()))?;

        tracing::debug!(
            "Decoded {}: {} frames, {} channels, {} Hz",
            path.display(),
            buffer.frames(),
            channels,
            sample_rate
        );

        Ok(buffer)
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&mut self, path: &Path) -> lofi_core::Result<AudioBuffer> {
        Self::decode_file(path).map_err(|e| e.decoding(path))
    }

    fn supports_format(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}
