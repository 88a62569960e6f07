//! Shared helpers for lofi-audio integration tests

#![allow(dead_code)]

use lofi_core::{AudioBuffer, AudioDecoder, AudioFormat, LofiError, Result, SampleRate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Decoder serving pre-built buffers by path
///
/// Unknown paths fail the same way a missing file does.
#[derive(Debug, Default)]
pub struct MemoryDecoder {
    tracks: HashMap<PathBuf, AudioBuffer>,
    decoded: Vec<PathBuf>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, path: impl Into<PathBuf>, buffer: AudioBuffer) -> Self {
        self.tracks.insert(path.into(), buffer);
        self
    }

    /// Paths decoded so far, in order
    pub fn decoded(&self) -> &[PathBuf] {
        &self.decoded
    }
}

impl AudioDecoder for MemoryDecoder {
    fn decode(&mut self, path: &Path) -> Result<AudioBuffer> {
        self.decoded.push(path.to_path_buf());
        self.tracks
            .get(path)
            .cloned()
            .ok_or_else(|| LofiError::decode(path, "File not found"))
    }

    fn supports_format(&self, path: &Path) -> bool {
        self.tracks.contains_key(path)
    }
}

/// Stereo buffer with every sample set to `value`
pub fn constant_stereo(frames: usize, value: f32, rate: u32) -> AudioBuffer {
    AudioBuffer::new(
        vec![value; frames * 2],
        AudioFormat::stereo(SampleRate::new(rate)),
    )
}

/// Mono sine wave
pub fn sine_mono(freq: f32, rate: u32, frames: usize, amplitude: f32) -> AudioBuffer {
    let samples = (0..frames)
        .map(|i| {
            let t = i as f32 / rate as f32;
            (2.0 * std::f32::consts::PI * freq * t).sin() * amplitude
        })
        .collect();
    AudioBuffer::new(samples, AudioFormat::new(SampleRate::new(rate), 1, 16))
}

/// Write a 16-bit PCM WAV file
pub fn write_wav(path: &Path, channels: u16, rate: u32, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}
