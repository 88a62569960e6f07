//! Property-based tests for the buffer stages and effects
//!
//! These tests use proptest to verify invariants across many random inputs.

use lofi_audio::dsp::{loop_to_length, mix, normalize_channels, shifted_rate};
use lofi_audio::effects::{AudioEffect, Reverb, StereoDelay};
use lofi_core::{AudioBuffer, AudioFormat, ReverbParams, SampleRate};
use proptest::prelude::*;

fn buffer_strategy(max_frames: usize) -> impl Strategy<Value = AudioBuffer> {
    (1u16..=2, 1usize..max_frames).prop_flat_map(|(channels, frames)| {
        prop::collection::vec(-1.0f32..1.0, frames * channels as usize).prop_map(move |samples| {
            AudioBuffer::new(
                samples,
                AudioFormat::new(SampleRate::CD_QUALITY, channels, 16),
            )
        })
    })
}

proptest! {
    /// Property: looping always hits the target and follows result[i] == source[i mod len]
    #[test]
    fn looper_index_law(source in buffer_strategy(64), target in 1usize..500) {
        let looped = loop_to_length(&source, target).unwrap();
        prop_assert_eq!(looped.frames(), target);
        prop_assert_eq!(looped.format, source.format);

        for i in 0..target {
            prop_assert_eq!(looped.frame(i), source.frame(i % source.frames()));
        }
    }

    /// Property: normalizing is idempotent and always yields at least two channels
    #[test]
    fn normalize_is_idempotent(source in buffer_strategy(64)) {
        let once = normalize_channels(source.clone());
        prop_assert!(once.channels() >= 2);
        prop_assert_eq!(once.frames(), source.frames());
        prop_assert_eq!(normalize_channels(once.clone()), once);
    }

    /// Property: the mix is as long as the primary, whatever the effects look like
    #[test]
    fn mix_keeps_primary_length(
        primary in buffer_strategy(200),
        effects in prop::collection::vec((buffer_strategy(300), 0.0f32..2.0), 0..4),
    ) {
        let frames = primary.frames();
        let mixed = mix(primary, &effects).unwrap();
        prop_assert_eq!(mixed.frames(), frames);
        prop_assert_eq!(mixed.channels(), 2);
    }

    /// Property: the shifted rate is positive and never above the input rate
    #[test]
    fn shifted_rate_is_bounded(hz in 1u32..200_000, factor in 0.0f64..0.999) {
        let shifted = shifted_rate(SampleRate::new(hz), factor).unwrap().as_hz();
        prop_assert!(shifted >= 1);
        prop_assert!(shifted <= hz);
    }

    /// Property: reverb keeps the buffer shape and never produces NaN or Inf
    #[test]
    fn reverb_preserves_shape(
        source in buffer_strategy(2_000),
        room_size in 0.0f32..1.0,
        damping in 0.0f32..1.0,
        wet_level in 0.0f32..1.0,
        dry_level in 0.0f32..1.0,
    ) {
        let params = ReverbParams { room_size, damping, wet_level, dry_level };
        let mut buffer = source.clone();
        Reverb::new(params, SampleRate::CD_QUALITY).process(&mut buffer);

        prop_assert_eq!(buffer.frames(), source.frames());
        prop_assert_eq!(buffer.channels(), source.channels());
        prop_assert!(buffer.samples.iter().all(|s| s.is_finite()));
    }

    /// Property: the stereo delay keeps length and never touches the right channel
    #[test]
    fn stereo_delay_keeps_right_channel(
        source in buffer_strategy(500),
        delay_ms in 0.0f64..20.0,
    ) {
        let stereo = normalize_channels(source);
        let mut buffer = stereo.clone();
        StereoDelay::new(delay_ms).process(&mut buffer);

        prop_assert_eq!(buffer.frames(), stereo.frames());
        prop_assert!(buffer.channel(1).eq(stereo.channel(1)));
    }
}
