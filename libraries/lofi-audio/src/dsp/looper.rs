/// Loop or trim a buffer to an exact length
use lofi_core::{AudioBuffer, LofiError, Result};

/// Repeat `buffer` end to end and cut it at exactly `target_frames` frames.
///
/// Frame `i` of the result is frame `i % len` of the source. There is no
/// crossfade at the loop points.
///
/// # Errors
/// `InvalidParameter` if the source has no frames (no number of repeats can
/// fill the target) or if `target_frames` is zero.
pub fn loop_to_length(buffer: &AudioBuffer, target_frames: usize) -> Result<AudioBuffer> {
    let frames = buffer.frames();
    if frames == 0 {
        return Err(LofiError::invalid_parameter(
            "cannot loop a buffer with no frames",
        ));
    }
    if target_frames == 0 {
        return Err(LofiError::invalid_parameter(
            "loop target length must be at least one frame",
        ));
    }

    let channels = buffer.channels();
    let repeats = target_frames.div_ceil(frames);
    tracing::trace!(
        "Looping {} frames x{} into {} frames",
        frames,
        repeats,
        target_frames
    );

    let source = &buffer.samples[..frames * channels];
    let samples: Vec<f32> = source
        .iter()
        .cycle()
        .take(target_frames * channels)
        .copied()
        .collect();

    Ok(AudioBuffer::new(samples, buffer.format))
}
