/// Render service tests
/// Tests WAV output, MP3 transcoding, and cleanup on failure
mod common;

use common::{is_ffmpeg_available, wav_config, write_tone};
use lofi_core::EffectSpec;
use lofi_maker::{
    config::{OutputFormat, SampleFormat},
    AppError, RenderService,
};
use std::path::PathBuf;
use tempfile::TempDir;

#[tokio::test]
async fn renders_wav_with_prefix_and_slowed_rate() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("song.wav");
    write_tone(&input, 1, 44_100, 22_050);

    let out_dir = temp_dir.path().join("out");
    let service = RenderService::from_config(&wav_config(&out_dir));
    let track = service
        .render(service.request_for(&input, None, Vec::new()))
        .await
        .unwrap();

    assert_eq!(track.output, out_dir.join("LoFi song.wav"));
    assert_eq!(track.sample_rate, 40_572);
    assert!((track.duration_secs - 22_050.0 / 40_572.0).abs() < 1e-9);
    assert!(track.intermediate.is_none());

    let reader = hound::WavReader::open(&track.output).unwrap();
    assert_eq!(reader.spec().sample_rate, 40_572);
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.duration(), 22_050);
}

#[tokio::test]
async fn float_output_and_effect_warnings() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("song.wav");
    let rain = temp_dir.path().join("rain.wav");
    write_tone(&input, 2, 48_000, 4_800);
    write_tone(&rain, 2, 48_000, 1_000);

    let mut config = wav_config(temp_dir.path());
    config.output.sample_format = SampleFormat::Float32;
    let service = RenderService::from_config(&config);

    let effects = vec![
        EffectSpec::new(&rain, 0.5),
        EffectSpec::new(temp_dir.path().join("missing.wav"), 0.5),
    ];
    let track = service
        .render(service.request_for(&input, Some("custom"), effects))
        .await
        .unwrap();

    assert_eq!(track.output, temp_dir.path().join("custom.wav"));
    assert_eq!(track.sample_rate, 48_000 - 3_840);
    assert_eq!(track.warnings.len(), 1);
    assert!(track.warnings[0].contains("missing.wav"));

    let reader = hound::WavReader::open(&track.output).unwrap();
    assert_eq!(reader.spec().sample_format, hound::SampleFormat::Float);
}

#[tokio::test]
async fn missing_input_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let service = RenderService::from_config(&wav_config(temp_dir.path()));

    let err = service
        .render(service.request_for(&temp_dir.path().join("nope.wav"), None, Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Pipeline(_)));
    assert!(!temp_dir.path().join("LoFi nope.wav").exists());
}

#[tokio::test]
async fn failed_mp3_encode_keeps_wav() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("song.wav");
    write_tone(&input, 2, 44_100, 4_410);

    let mut config = wav_config(temp_dir.path());
    config.output.format = OutputFormat::Mp3;
    config.transcoding.ffmpeg_path = PathBuf::from("/nonexistent/ffmpeg");
    let service = RenderService::from_config(&config);

    let err = service
        .render(service.request_for(&input, None, Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Transcoding(_)));
    assert!(temp_dir.path().join("LoFi song.wav").exists());
    assert!(!temp_dir.path().join("LoFi song.mp3").exists());
}

/// Full MP3 path (requires FFmpeg)
#[tokio::test]
async fn mp3_output_replaces_intermediate() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("song.wav");
    write_tone(&input, 2, 44_100, 44_100);

    let mut config = wav_config(temp_dir.path());
    config.output.format = OutputFormat::Mp3;
    let service = RenderService::from_config(&config);

    let track = service
        .render(service.request_for(&input, None, Vec::new()))
        .await
        .unwrap();

    assert_eq!(track.output, temp_dir.path().join("LoFi song.mp3"));
    assert!(track.output.exists());
    assert!(!temp_dir.path().join("LoFi song.wav").exists());
}

/// Intermediate WAV kept on request (requires FFmpeg)
#[tokio::test]
async fn mp3_output_can_keep_intermediate() {
    if !is_ffmpeg_available().await {
        eprintln!("Skipping test: FFmpeg not available");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("song.wav");
    write_tone(&input, 1, 22_050, 22_050);

    let mut config = wav_config(temp_dir.path());
    config.output.format = OutputFormat::Mp3;
    config.output.keep_intermediate = true;
    let service = RenderService::from_config(&config);

    let track = service
        .render(service.request_for(&input, None, Vec::new()))
        .await
        .unwrap();

    assert!(track.output.exists());
    assert_eq!(track.intermediate, Some(temp_dir.path().join("LoFi song.wav")));
    assert!(temp_dir.path().join("LoFi song.wav").exists());
}
