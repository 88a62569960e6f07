/// Application configuration
use crate::error::{AppError, Result};
use lofi_audio::WavSampleFormat;
use lofi_core::PipelineParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when no `--config` is given (if it exists)
pub const DEFAULT_CONFIG_FILE: &str = "lofi.toml";

/// Prefix of environment overrides, e.g. `LOFI_PIPELINE__SLOW_FACTOR=0.1`
pub const ENV_PREFIX: &str = "LOFI";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LofiConfig {
    #[serde(default)]
    pub pipeline: PipelineParams,

    #[serde(default = "default_output")]
    pub output: OutputSettings,

    #[serde(default = "default_transcoding")]
    pub transcoding: TranscodingSettings,

    #[serde(default = "default_batch")]
    pub batch: BatchSettings,

    #[serde(default)]
    pub effects: Vec<EffectPreset>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Prepended to the input's file stem
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// ffmpeg `-b:a` value for MP3 output
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// Keep the WAV next to the MP3
    #[serde(default)]
    pub keep_intermediate: bool,

    #[serde(default)]
    pub sample_format: SampleFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodingSettings {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchSettings {
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// A named sound effect that can be mixed under every track
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EffectPreset {
    pub name: String,
    pub path: PathBuf,
    /// 0.0 leaves the preset out
    #[serde(default)]
    pub volume: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mp3,
    Wav,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    #[default]
    Pcm16,
    Float32,
}

impl From<SampleFormat> for WavSampleFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Pcm16 => WavSampleFormat::Pcm16,
            SampleFormat::Float32 => WavSampleFormat::Float32,
        }
    }
}

impl LofiConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `lofi.toml` in the working
    /// directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    /// [`LofiConfig::load`] with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with LOFI_)
        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Validate configuration before any audio is touched
    pub fn validate(&self) -> Result<()> {
        self.pipeline
            .validate()
            .map_err(|e| AppError::Config(format!("pipeline: {e}")))?;

        if self.batch.workers == 0 {
            return Err(AppError::Config(
                "batch.workers must be at least 1".to_string(),
            ));
        }

        if self.output.format == OutputFormat::Mp3 && !is_valid_bitrate(&self.output.bitrate) {
            return Err(AppError::Config(format!(
                "output.bitrate must look like \"320k\" (got {:?})",
                self.output.bitrate
            )));
        }

        for preset in &self.effects {
            if preset.name.trim().is_empty() {
                return Err(AppError::Config("effect preset without a name".to_string()));
            }
            if !preset.volume.is_finite() || preset.volume < 0.0 {
                return Err(AppError::Config(format!(
                    "effect preset {:?} has invalid volume {}",
                    preset.name, preset.volume
                )));
            }
        }

        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// `LOFI_SECTION__KEY` environment source
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn is_valid_bitrate(bitrate: &str) -> bool {
    match bitrate.strip_suffix('k') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

// Default values
fn default_output() -> OutputSettings {
    OutputSettings {
        directory: default_output_directory(),
        name_prefix: default_name_prefix(),
        format: default_format(),
        bitrate: default_bitrate(),
        keep_intermediate: false,
        sample_format: SampleFormat::default(),
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_name_prefix() -> String {
    "LoFi ".to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Mp3
}

fn default_bitrate() -> String {
    "320k".to_string()
}

fn default_transcoding() -> TranscodingSettings {
    TranscodingSettings {
        ffmpeg_path: default_ffmpeg_path(),
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_batch() -> BatchSettings {
    BatchSettings {
        workers: default_workers(),
    }
}

fn default_workers() -> usize {
    num_cpus::get().max(1)
}

impl Default for LofiConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineParams::default(),
            output: default_output(),
            transcoding: default_transcoding(),
            batch: default_batch(),
            effects: Vec::new(),
        }
    }
}
