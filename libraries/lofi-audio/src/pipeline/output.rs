/// Pipeline results and render requests
use lofi_core::{AudioBuffer, EffectSpec, SampleRate};
use std::fmt;
use std::path::{Path, PathBuf};

/// An effect that was left out of the mix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineWarning {
    /// Source file of the excluded effect
    pub path: PathBuf,
    /// Why it was excluded
    pub message: String,
}

impl PipelineWarning {
    /// Create a new warning
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped effect {}: {}", self.path.display(), self.message)
    }
}

/// Processed audio, ready for encoding
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Final buffer, tagged with the output rate
    pub buffer: AudioBuffer,
    /// Effects that could not be prepared and were excluded
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineOutput {
    /// Output sample rate
    pub fn sample_rate(&self) -> SampleRate {
        self.buffer.sample_rate()
    }
}

/// One track to render to disk
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Primary track
    pub input: PathBuf,
    /// Output file name, without directory; the encoder's extension is
    /// appended unless already present
    pub output_name: String,
    /// Directory the output is written to (created if missing)
    pub output_dir: PathBuf,
    /// Auxiliary tracks mixed under the primary one
    pub effects: Vec<EffectSpec>,
}

impl RenderRequest {
    /// Render `input` into `output_dir`, named after the input's file stem
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output_name = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        Self {
            input,
            output_name,
            output_dir: output_dir.into(),
            effects: Vec::new(),
        }
    }

    /// Override the output file name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Set the effects to mix in
    #[must_use]
    pub fn with_effects(mut self, effects: Vec<EffectSpec>) -> Self {
        self.effects = effects;
        self
    }

    /// Output path for files with extension `ext`
    pub fn destination(&self, ext: &str) -> PathBuf {
        let suffix = format!(".{ext}");
        let has_ext = self.output_name.len() > suffix.len()
            && self.output_name.to_lowercase().ends_with(&suffix.to_lowercase());
        if has_ext {
            self.output_dir.join(&self.output_name)
        } else {
            self.output_dir.join(format!("{}{}", self.output_name, suffix))
        }
    }
}

/// What a render produced
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// File that was written
    pub destination: PathBuf,
    /// Rate the file was written at
    pub sample_rate: SampleRate,
    /// Length of the written audio in frames
    pub frames: usize,
    /// Effects that were excluded from the mix
    pub warnings: Vec<PipelineWarning>,
}

impl RenderOutcome {
    /// Written file
    pub fn path(&self) -> &Path {
        &self.destination
    }

    /// Length of the written audio at its own rate
    pub fn duration_secs(&self) -> f64 {
        match self.sample_rate.as_hz() {
            0 => 0.0,
            hz => self.frames as f64 / f64::from(hz),
        }
    }
}
