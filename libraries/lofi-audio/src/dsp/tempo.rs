/// Tempo shift by sample-rate relabeling
use lofi_core::{AudioBuffer, LofiError, Result, SampleRate};

/// Output rate for a slow factor: `rate - trunc(rate * slow_factor)`.
///
/// # Errors
/// `InvalidParameter` if `slow_factor` is negative or not finite, or if
/// the result would not be a positive rate.
pub fn shifted_rate(rate: SampleRate, slow_factor: f64) -> Result<SampleRate> {
    if !slow_factor.is_finite() || slow_factor < 0.0 {
        return Err(LofiError::invalid_parameter(format!(
            "slow_factor must be a finite, non-negative number (got {slow_factor})"
        )));
    }

    let hz = f64::from(rate.as_hz());
    let shifted = hz - (hz * slow_factor).trunc();
    if shifted < 1.0 {
        return Err(LofiError::invalid_parameter(format!(
            "slow_factor {slow_factor} leaves no output rate for {} Hz",
            rate.as_hz()
        )));
    }

    // shifted is in [1, hz], so the cast is exact
    Ok(SampleRate::new(shifted as u32))
}

/// Slow `buffer` down by retagging it with the shifted rate.
///
/// Samples are not touched: played back at the lower rate everything is
/// slower and lower in pitch by the same ratio.
pub fn apply_tempo_shift(buffer: &mut AudioBuffer, slow_factor: f64) -> Result<()> {
    let original = buffer.sample_rate();
    let shifted = shifted_rate(original, slow_factor)?;
    buffer.format.sample_rate = shifted;

    tracing::debug!(
        "Tempo shift: {} Hz -> {} Hz (factor {})",
        original.as_hz(),
        shifted.as_hz(),
        slow_factor
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofi_core::AudioFormat;

    #[test]
    fn classic_preset_rate() {
        assert_eq!(
            shifted_rate(SampleRate::CD_QUALITY, 0.08).unwrap(),
            SampleRate::new(40_572)
        );
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(shifted_rate(SampleRate::DVD_QUALITY, 0.125).unwrap().as_hz(), 42_000);
        // 1001 * 0.5 = 500.5 -> 500 removed
        assert_eq!(shifted_rate(SampleRate::new(1001), 0.5).unwrap().as_hz(), 501);
    }

    #[test]
    fn zero_factor_keeps_rate() {
        assert_eq!(
            shifted_rate(SampleRate::CD_QUALITY, 0.0).unwrap(),
            SampleRate::CD_QUALITY
        );
    }

    #[test]
    fn degenerate_factors_rejected() {
        for factor in [1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    shifted_rate(SampleRate::CD_QUALITY, factor),
                    Err(LofiError::InvalidParameter(_))
                ),
                "factor {factor} accepted"
            );
        }
    }

    #[test]
    fn samples_are_untouched() {
        let samples = vec![0.1, -0.2, 0.3, -0.4];
        let mut buffer = AudioBuffer::new(samples.clone(), AudioFormat::stereo(SampleRate::new(1000)));

        apply_tempo_shift(&mut buffer, 0.1).unwrap();
        assert_eq!(buffer.sample_rate().as_hz(), 900);
        assert_eq!(buffer.samples, samples);
    }

    #[test]
    fn failed_shift_keeps_rate() {
        let mut buffer = AudioBuffer::silence(4, AudioFormat::stereo(SampleRate::new(1000)));
        assert!(apply_tempo_shift(&mut buffer, 2.0).is_err());
        assert_eq!(buffer.sample_rate().as_hz(), 1000);
    }
}
