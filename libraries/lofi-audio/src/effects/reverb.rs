//! Freeverb-style room reverb
//!
//! Per channel: eight parallel feedback combs with a one-pole lowpass in
//! the loop (damping), followed by four series all-passes for diffusion.
//! The right channel's delay lines are longer by a fixed spread so the two
//! tails decorrelate.

use super::chain::AudioEffect;
use lofi_core::{AudioBuffer, ReverbParams, SampleRate};

/// Comb delay lengths in samples at 44.1kHz
const COMB_TUNING: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// All-pass delay lengths in samples at 44.1kHz
const ALLPASS_TUNING: [usize; 4] = [556, 441, 341, 225];

/// Extra delay of the right channel's lines, in samples at 44.1kHz
const STEREO_SPREAD: usize = 23;

/// Rate the tunings are specified at
const TUNING_RATE: f64 = 44_100.0;

const FIXED_GAIN: f32 = 0.015;
const SCALE_WET: f32 = 3.0;
const SCALE_DAMP: f32 = 0.4;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;
const ALLPASS_FEEDBACK: f32 = 0.5;

/// Feedback comb filter with damping
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    filter_state: f32,
}

impl CombFilter {
    fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            pos: 0,
            filter_state: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32, feedback: f32, damp1: f32, damp2: f32) -> f32 {
        let output = self.buffer[self.pos];

        self.filter_state = output * damp2 + self.filter_state * damp1;
        self.buffer[self.pos] = input + self.filter_state * feedback;

        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        output
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.pos = 0;
    }
}

/// Schroeder all-pass filter for diffusion
#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
}

impl AllpassFilter {
    fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            pos: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.pos];
        self.buffer[self.pos] = input + buffered * ALLPASS_FEEDBACK;

        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
        buffered - input
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

/// Comb bank plus all-pass chain for one output channel
#[derive(Debug, Clone)]
struct Tank {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl Tank {
    fn new(sample_rate: SampleRate, spread: usize) -> Self {
        let scale = f64::from(sample_rate.as_hz()) / TUNING_RATE;
        let scaled = |len: usize| ((len + spread) as f64 * scale) as usize;

        Self {
            combs: COMB_TUNING.iter().map(|&len| CombFilter::new(scaled(len))).collect(),
            allpasses: ALLPASS_TUNING
                .iter()
                .map(|&len| AllpassFilter::new(scaled(len)))
                .collect(),
        }
    }

    #[inline]
    fn process(&mut self, input: f32, coeffs: &Coefficients) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input, coeffs.feedback, coeffs.damp1, coeffs.damp2);
        }
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
    }
}

/// Gains derived from [`ReverbParams`]
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    feedback: f32,
    damp1: f32,
    damp2: f32,
    wet: f32,
    dry: f32,
}

impl From<ReverbParams> for Coefficients {
    fn from(params: ReverbParams) -> Self {
        let damp1 = params.damping * SCALE_DAMP;
        Self {
            feedback: params.room_size * SCALE_ROOM + OFFSET_ROOM,
            damp1,
            damp2: 1.0 - damp1,
            wet: params.wet_level * SCALE_WET,
            dry: params.dry_level,
        }
    }
}

/// Room reverb
///
/// Both channels are summed into one send that feeds a left and a right
/// tank; each output is `dry * input + wet * tank`. With `wet_level = 0`
/// and `dry_level = 1` the output equals the input exactly.
///
/// Mono buffers go through the left tank only. On wider layouts the first
/// two channels are processed and the rest pass through.
///
/// Parameters are fixed for the lifetime of the effect; build a new one per
/// track. The delay lines are sized for the rate given at construction and
/// are rebuilt if a buffer at another rate comes through.
#[derive(Debug, Clone)]
pub struct Reverb {
    params: ReverbParams,
    coeffs: Coefficients,
    sample_rate: SampleRate,
    left: Tank,
    right: Tank,
    enabled: bool,
}

impl Reverb {
    /// Create a reverb tuned for `sample_rate`
    pub fn new(params: ReverbParams, sample_rate: SampleRate) -> Self {
        Self {
            params,
            coeffs: Coefficients::from(params),
            sample_rate,
            left: Tank::new(sample_rate, 0),
            right: Tank::new(sample_rate, STEREO_SPREAD),
            enabled: true,
        }
    }

    /// Parameters this reverb was built with
    pub fn params(&self) -> ReverbParams {
        self.params
    }

    /// Rate the delay lines are currently sized for
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn retune(&mut self, sample_rate: SampleRate) {
        tracing::debug!(
            "Retuning reverb from {} Hz to {} Hz",
            self.sample_rate.as_hz(),
            sample_rate.as_hz()
        );
        self.sample_rate = sample_rate;
        self.left = Tank::new(sample_rate, 0);
        self.right = Tank::new(sample_rate, STEREO_SPREAD);
    }
}

impl AudioEffect for Reverb {
    fn process(&mut self, buffer: &mut AudioBuffer) {
        if buffer.sample_rate() != self.sample_rate {
            self.retune(buffer.sample_rate());
        }

        let coeffs = self.coeffs;
        let channels = buffer.channels();
        match channels {
            0 => {}
            1 => {
                for sample in &mut buffer.samples {
                    let input = *sample * FIXED_GAIN;
                    let wet = self.left.process(input, &coeffs);
                    *sample = *sample * coeffs.dry + wet * coeffs.wet;
                }
            }
            _ => {
                for frame in buffer.samples.chunks_exact_mut(channels) {
                    let (l, r) = (frame[0], frame[1]);
                    let input = (l + r) * FIXED_GAIN;

                    let wet_l = self.left.process(input, &coeffs);
                    let wet_r = self.right.process(input, &coeffs);

                    frame[0] = l * coeffs.dry + wet_l * coeffs.wet;
                    frame[1] = r * coeffs.dry + wet_r * coeffs.wet;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Reverb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::tests::generate_sine;
    use lofi_core::AudioFormat;

    fn impulse(frames: usize, rate: u32) -> AudioBuffer {
        let mut buffer = AudioBuffer::silence(frames, AudioFormat::stereo(SampleRate::new(rate)));
        buffer.samples[0] = 1.0;
        buffer.samples[1] = 1.0;
        buffer
    }

    fn wet_only() -> ReverbParams {
        ReverbParams {
            room_size: 0.75,
            damping: 0.5,
            wet_level: 1.0,
            dry_level: 0.0,
        }
    }

    #[test]
    fn dry_passthrough_is_exact() {
        let input = generate_sine(440.0, 44_100, 0.1);
        let mut buffer = input.clone();

        let params = ReverbParams {
            room_size: 0.3,
            damping: 0.9,
            ..ReverbParams::dry()
        };
        Reverb::new(params, SampleRate::CD_QUALITY).process(&mut buffer);

        assert_eq!(buffer, input);
    }

    #[test]
    fn preserves_shape() {
        let mut buffer = generate_sine(220.0, 40_572, 0.05);
        let frames = buffer.frames();

        Reverb::new(ReverbParams::default(), SampleRate::new(40_572)).process(&mut buffer);

        assert_eq!(buffer.frames(), frames);
        assert_eq!(buffer.channels(), 2);
        assert!(buffer.samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn impulse_produces_a_tail() {
        let mut buffer = impulse(44_100, 44_100);
        Reverb::new(wet_only(), SampleRate::CD_QUALITY).process(&mut buffer);

        // Nothing comes out before the shortest comb has wrapped
        assert!(buffer.samples[..2 * 1000].iter().all(|&s| s == 0.0));

        let tail_energy: f32 = buffer.samples[2 * 2000..].iter().map(|s| s * s).sum();
        assert!(tail_energy > 0.0);
    }

    #[test]
    fn tail_decays() {
        let mut buffer = impulse(44_100 * 3, 44_100);
        Reverb::new(wet_only(), SampleRate::CD_QUALITY).process(&mut buffer);

        let energy = |from: usize, to: usize| -> f32 {
            buffer.samples[2 * from..2 * to].iter().map(|s| s * s).sum()
        };
        let early = energy(2_000, 22_050);
        let late = energy(110_250, 132_300);
        assert!(late < early * 0.1, "early {early}, late {late}");
    }

    #[test]
    fn larger_room_rings_longer() {
        let late_energy = |room_size: f32| -> f32 {
            let mut buffer = impulse(44_100 * 2, 44_100);
            let params = ReverbParams {
                room_size,
                ..wet_only()
            };
            Reverb::new(params, SampleRate::CD_QUALITY).process(&mut buffer);
            buffer.samples[2 * 44_100..].iter().map(|s| s * s).sum()
        };

        assert!(late_energy(0.95) > late_energy(0.2));
    }

    #[test]
    fn channels_decorrelate() {
        let mut buffer = impulse(8_000, 44_100);
        Reverb::new(wet_only(), SampleRate::CD_QUALITY).process(&mut buffer);

        let left: Vec<f32> = buffer.channel(0).collect();
        let right: Vec<f32> = buffer.channel(1).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn mono_and_extra_channels() {
        let mut mono = AudioBuffer::new(vec![0.5; 500], AudioFormat::new(SampleRate::CD_QUALITY, 1, 16));
        Reverb::new(ReverbParams::default(), SampleRate::CD_QUALITY).process(&mut mono);
        assert_eq!(mono.frames(), 500);
        assert_eq!(mono.channels(), 1);

        let mut quad = AudioBuffer::new(vec![0.5; 400], AudioFormat::new(SampleRate::CD_QUALITY, 4, 16));
        Reverb::new(ReverbParams::default(), SampleRate::CD_QUALITY).process(&mut quad);
        for frame in quad.samples.chunks_exact(4) {
            assert_eq!(&frame[2..], &[0.5, 0.5]);
        }
    }

    #[test]
    fn retunes_for_other_rates() {
        let mut reverb = Reverb::new(ReverbParams::default(), SampleRate::CD_QUALITY);
        let mut buffer = generate_sine(440.0, 22_050, 0.05);

        reverb.process(&mut buffer);
        assert_eq!(reverb.sample_rate(), SampleRate::new(22_050));
        assert_eq!(reverb.left.combs[0].buffer.len(), 558);
    }

    #[test]
    fn reset_clears_the_tail() {
        let mut reverb = Reverb::new(wet_only(), SampleRate::CD_QUALITY);
        reverb.process(&mut impulse(4_000, 44_100));
        reverb.reset();

        let mut silence = AudioBuffer::silence(4_000, AudioFormat::stereo(SampleRate::CD_QUALITY));
        reverb.process(&mut silence);
        assert!(silence.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn fresh_instances_are_independent() {
        let input = generate_sine(330.0, 44_100, 0.05);

        let mut first = input.clone();
        let mut reverb = Reverb::new(ReverbParams::default(), SampleRate::CD_QUALITY);
        reverb.process(&mut first);

        let mut second = input;
        Reverb::new(ReverbParams::default(), SampleRate::CD_QUALITY).process(&mut second);

        assert_eq!(first, second);
    }
}
