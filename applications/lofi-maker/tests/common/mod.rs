//! Common test utilities and fixtures
#![allow(dead_code)]

use lofi_maker::config::{LofiConfig, OutputFormat};
use std::path::Path;

/// Write a 16-bit PCM WAV of a 220 Hz tone
pub fn write_tone(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = ((2.0 * std::f32::consts::PI * 220.0 * t).sin() * 8_000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// Config writing WAV output into `output_dir`
pub fn wav_config(output_dir: &Path) -> LofiConfig {
    let mut config = LofiConfig::default();
    config.output.directory = output_dir.to_path_buf();
    config.output.format = OutputFormat::Wav;
    config.batch.workers = 2;
    config
}

/// Helper to check if FFmpeg is available
pub async fn is_ffmpeg_available() -> bool {
    tokio::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .map(|out| out.status.success())
        .unwrap_or(false)
}
