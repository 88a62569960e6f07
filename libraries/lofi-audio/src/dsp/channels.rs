/// Channel layout normalization
use lofi_core::{AudioBuffer, AudioFormat};

/// Make sure a buffer has at least two channels.
///
/// Mono is duplicated into left and right frame by frame. Buffers that
/// already have two or more channels are returned untouched; stages that
/// expect stereo work on the first two channels of wider layouts.
pub fn normalize_channels(buffer: AudioBuffer) -> AudioBuffer {
    if buffer.channels() != 1 {
        return buffer;
    }

    let mut samples = Vec::with_capacity(buffer.samples.len() * 2);
    for &sample in &buffer.samples {
        samples.push(sample); // Left
        samples.push(sample); // Right
    }

    AudioBuffer::new(
        samples,
        AudioFormat {
            channels: 2,
            ..buffer.format
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofi_core::SampleRate;

    fn buffer(samples: Vec<f32>, channels: u16) -> AudioBuffer {
        AudioBuffer::new(samples, AudioFormat::new(SampleRate::CD_QUALITY, channels, 16))
    }

    #[test]
    fn mono_is_duplicated() {
        let out = normalize_channels(buffer(vec![0.1, 0.2, 0.3], 1));
        assert_eq!(out.channels(), 2);
        assert_eq!(out.frames(), 3);
        assert_eq!(out.samples, vec![0.1, 0.1, 0.2, 0.2, 0.3, 0.3]);
        assert_eq!(out.sample_rate(), SampleRate::CD_QUALITY);
        assert_eq!(out.format.bits_per_sample, 16);
    }

    #[test]
    fn stereo_passes_through() {
        let input = buffer(vec![0.1, -0.1, 0.2, -0.2], 2);
        assert_eq!(normalize_channels(input.clone()), input);
    }

    #[test]
    fn wider_layouts_pass_through() {
        let input = buffer(vec![0.5; 12], 6);
        assert_eq!(normalize_channels(input.clone()), input);
    }

    #[test]
    fn normalizing_twice_equals_once() {
        let once = normalize_channels(buffer(vec![0.25, -0.75], 1));
        let twice = normalize_channels(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_mono_becomes_empty_stereo() {
        let out = normalize_channels(buffer(vec![], 1));
        assert_eq!(out.channels(), 2);
        assert!(out.is_empty());
    }
}
