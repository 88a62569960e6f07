/// Single-track slowed + reverb pipeline
use super::output::{PipelineOutput, PipelineWarning, RenderOutcome, RenderRequest};
use crate::dsp::{apply_tempo_shift, Mixer};
use crate::effects::{EffectChain, Reverb, StereoDelay};
use lofi_core::{
    AudioBuffer, AudioDecoder, AudioEncoder, EffectSpec, LofiError, PipelineParams, Result,
};
use std::path::Path;
use std::time::Instant;

/// Slow `buffer` down, then run the reverb and the stereo delay at the new
/// rate.
///
/// # Errors
/// `InvalidParameter` if `params` do not validate or leave no output rate
/// for the buffer. The buffer is untouched in that case.
pub fn apply_slowed_reverb(buffer: &mut AudioBuffer, params: &PipelineParams) -> Result<()> {
    params.validate()?;
    apply_tempo_shift(buffer, params.slow_factor)?;

    let rate = buffer.sample_rate();
    let mut chain = EffectChain::new()
        .with(Reverb::new(params.reverb(), rate))
        .with(StereoDelay::new(params.delay_ms));
    chain.process(buffer);
    Ok(())
}

/// Turns one primary track plus effects into a finished buffer.
///
/// Decoding goes through the injected [`AudioDecoder`], so the pipeline runs
/// against in-memory buffers in tests. Every call builds fresh filter state;
/// nothing carries over between tracks.
///
/// A primary track that cannot be decoded aborts the run. An effect that
/// cannot be decoded or prepared is left out of the mix entirely and
/// reported as a [`PipelineWarning`].
#[derive(Debug)]
pub struct LofiPipeline<D: AudioDecoder> {
    decoder: D,
    params: PipelineParams,
}

impl<D: AudioDecoder> LofiPipeline<D> {
    /// Create a pipeline
    ///
    /// # Errors
    /// `InvalidParameter` if `params` fail validation. Nothing is decoded
    /// before this check.
    pub fn new(decoder: D, params: PipelineParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { decoder, params })
    }

    /// Parameters this pipeline runs with
    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// The injected decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decode `primary` and run it through the pipeline.
    ///
    /// # Errors
    /// - `InvalidParameter` for a negative or non-finite effect volume
    /// - `Decode` if the primary track cannot be decoded or has no frames
    pub fn process(&mut self, primary: &Path, effects: &[EffectSpec]) -> Result<PipelineOutput> {
        validate_effects(effects)?;

        let started = Instant::now();
        let buffer = self.decoder.decode(primary)?;
        if buffer.frames() == 0 {
            return Err(LofiError::decode(primary, "no audio frames"));
        }
        tracing::debug!(
            "Decoded {} in {:?} ({} frames, {} Hz)",
            primary.display(),
            started.elapsed(),
            buffer.frames(),
            buffer.sample_rate().as_hz()
        );

        self.process_buffer(buffer, effects)
    }

    /// Run an already decoded primary buffer through the pipeline.
    ///
    /// Effects are still decoded through the pipeline's decoder.
    ///
    /// # Errors
    /// `InvalidParameter` for an invalid or empty primary buffer, an invalid
    /// effect volume, or a slow factor that leaves no output rate.
    pub fn process_buffer(
        &mut self,
        primary: AudioBuffer,
        effects: &[EffectSpec],
    ) -> Result<PipelineOutput> {
        validate_effects(effects)?;
        primary.validate()?;
        if primary.frames() == 0 {
            return Err(LofiError::invalid_parameter(
                "primary track has no audio frames",
            ));
        }

        let started = Instant::now();
        let mut mixer = Mixer::new(primary);
        let mut warnings = Vec::new();

        for effect in effects {
            if effect.is_silent() {
                tracing::debug!("Skipping silent effect {}", effect.path.display());
                continue;
            }

            let added = self
                .decoder
                .decode(&effect.path)
                .and_then(|buffer| usable_effect(&effect.path, buffer))
                .and_then(|buffer| mixer.add(&buffer, effect.volume));

            match added {
                Ok(()) => tracing::debug!(
                    "Mixed {} at volume {}",
                    effect.path.display(),
                    effect.volume
                ),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Leaving {} out of the mix: {}", effect.path.display(), e);
                    warnings.push(PipelineWarning::new(effect.path.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        let mut buffer = mixer.finish();
        apply_slowed_reverb(&mut buffer, &self.params)?;

        tracing::debug!(
            "Processed {} frames in {:?}, output at {} Hz",
            buffer.frames(),
            started.elapsed(),
            buffer.sample_rate().as_hz()
        );

        Ok(PipelineOutput { buffer, warnings })
    }

    /// Process `request` and write the result with `encoder`.
    ///
    /// The output directory is created if it does not exist.
    ///
    /// # Errors
    /// Anything [`LofiPipeline::process`] returns, `Io` if the output
    /// directory cannot be created, and `Encode` from the encoder.
    pub fn render<E>(&mut self, request: &RenderRequest, encoder: &mut E) -> Result<RenderOutcome>
    where
        E: AudioEncoder + ?Sized,
    {
        let output = self.process(&request.input, &request.effects)?;

        std::fs::create_dir_all(&request.output_dir)?;
        let destination = request.destination(encoder.extension());
        encoder.encode(&output.buffer, &destination)?;

        tracing::info!(
            "Rendered {} -> {}",
            request.input.display(),
            destination.display()
        );

        Ok(RenderOutcome {
            destination,
            sample_rate: output.buffer.sample_rate(),
            frames: output.buffer.frames(),
            warnings: output.warnings,
        })
    }
}

fn validate_effects(effects: &[EffectSpec]) -> Result<()> {
    effects.iter().try_for_each(EffectSpec::validate)
}

/// A decoded effect that is malformed or has no frames counts as undecodable
fn usable_effect(path: &Path, buffer: AudioBuffer) -> Result<AudioBuffer> {
    buffer
        .validate()
        .map_err(|e| LofiError::decode(path, e.to_string()))?;
    if buffer.frames() == 0 {
        return Err(LofiError::decode(path, "no audio frames"));
    }
    Ok(buffer)
}
