/// Render service - runs the pipeline for one track and produces the output files
use super::{FfmpegFallbackDecoder, TranscodingService};
use crate::config::{LofiConfig, OutputFormat, OutputSettings};
use crate::error::{AppError, Result};
use lofi_audio::{
    LofiPipeline, RenderOutcome, RenderRequest, SymphoniaDecoder, WavEncoder, WavSampleFormat,
};
use lofi_core::{EffectSpec, PipelineParams};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A finished track
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTrack {
    pub input: PathBuf,
    /// Final file (MP3 or WAV, depending on configuration)
    pub output: PathBuf,
    /// Intermediate WAV, if it was kept next to the MP3
    pub intermediate: Option<PathBuf>,
    pub sample_rate: u32,
    pub duration_secs: f64,
    /// Effects left out of the mix
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RenderService {
    params: PipelineParams,
    output: OutputSettings,
    transcoder: TranscodingService,
}

impl RenderService {
    pub fn new(params: PipelineParams, output: OutputSettings, transcoder: TranscodingService) -> Self {
        Self {
            params,
            output,
            transcoder,
        }
    }

    pub fn from_config(config: &LofiConfig) -> Self {
        Self::new(
            config.pipeline,
            config.output.clone(),
            TranscodingService::new(config.transcoding.ffmpeg_path.clone()),
        )
    }

    /// Request for `input`, named `<prefix><input stem>` unless `name` is given
    pub fn request_for(&self, input: &Path, name: Option<&str>, effects: Vec<EffectSpec>) -> RenderRequest {
        let request = RenderRequest::new(input, &self.output.directory).with_effects(effects);
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{}{}", self.output.name_prefix, request.output_name),
        };
        request.with_name(name)
    }

    /// Render one track
    ///
    /// The pipeline runs on the blocking pool. For MP3 output the WAV is
    /// transcoded afterwards and removed unless `keep_intermediate` is set;
    /// if transcoding fails the WAV stays on disk.
    pub async fn render(&self, request: RenderRequest) -> Result<RenderedTrack> {
        let input = request.input.clone();
        let outcome = self.render_wav(request).await?;
        let wav = outcome.destination.clone();

        let (output, intermediate) = match self.output.format {
            OutputFormat::Wav => (wav, None),
            OutputFormat::Mp3 => {
                let mp3 = wav.with_extension(OutputFormat::Mp3.extension());
                if let Err(e) = self.transcoder.to_mp3(&wav, &mp3, &self.output.bitrate).await {
                    tracing::warn!("Keeping {} after failed MP3 encode", wav.display());
                    return Err(e);
                }

                if self.output.keep_intermediate {
                    (mp3, Some(wav))
                } else {
                    (mp3, discard_intermediate(wav).await)
                }
            }
        };

        tracing::info!("Finished {} -> {}", input.display(), output.display());

        Ok(RenderedTrack {
            input,
            output,
            intermediate,
            sample_rate: outcome.sample_rate.as_hz(),
            duration_secs: outcome.duration_secs(),
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
        })
    }

    async fn render_wav(&self, request: RenderRequest) -> Result<RenderOutcome> {
        let params = self.params;
        let sample_format: WavSampleFormat = self.output.sample_format.into();
        let ffmpeg_path = self.transcoder.ffmpeg_path().to_path_buf();

        let outcome = tokio::task::spawn_blocking(move || -> Result<RenderOutcome> {
            let decoder = FfmpegFallbackDecoder::new(SymphoniaDecoder::new(), ffmpeg_path);
            let mut pipeline = LofiPipeline::new(decoder, params)?;
            let mut encoder = WavEncoder::with_sample_format(sample_format);
            pipeline
                .render(&request, &mut encoder)
                .map_err(AppError::from)
        })
        .await??;

        Ok(outcome)
    }
}

/// Remove the intermediate WAV once the MP3 exists.
///
/// A WAV that cannot be removed is logged and returned as kept.
async fn discard_intermediate(wav: PathBuf) -> Option<PathBuf> {
    match tokio::fs::remove_file(&wav).await {
        Ok(()) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("Could not remove intermediate {}: {}", wav.display(), e);
            Some(wav)
        }
    }
}
