/// Decoder that falls back to an ffmpeg conversion for unsupported inputs
use lofi_core::{AudioBuffer, AudioDecoder, LofiError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Wraps a native decoder and retries through ffmpeg when it fails.
///
/// The input is converted to a temporary WAV which the inner decoder then
/// reads. The temporary file is deleted when decoding finishes, whether it
/// succeeded or not. Missing files are not retried.
#[derive(Debug)]
pub struct FfmpegFallbackDecoder<D: AudioDecoder> {
    inner: D,
    ffmpeg_path: PathBuf,
}

impl<D: AudioDecoder> FfmpegFallbackDecoder<D> {
    pub fn new(inner: D, ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    fn convert_and_decode(&mut self, path: &Path) -> std::result::Result<AudioBuffer, String> {
        let staging = tempfile::Builder::new()
            .prefix("lofi-decode-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| format!("cannot create temporary file: {e}"))?;

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("wav")
            .arg(staging.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("could not run {}: {e}", self.ffmpeg_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("ffmpeg failed: {}", stderr.trim()));
        }

        self.inner
            .decode(staging.path())
            .map_err(|e| format!("converted file unreadable: {e}"))
    }
}

impl<D: AudioDecoder> AudioDecoder for FfmpegFallbackDecoder<D> {
    fn decode(&mut self, path: &Path) -> Result<AudioBuffer> {
        let native_error = match self.inner.decode(path) {
            Ok(buffer) => return Ok(buffer),
            Err(e) if !path.is_file() => return Err(e),
            Err(e) => e,
        };

        tracing::debug!(
            "Native decode of {} failed ({}), converting with ffmpeg",
            path.display(),
            native_error
        );

        self.convert_and_decode(path).map_err(|fallback| {
            let message = match native_error {
                LofiError::Decode { message, .. } => message,
                other => other.to_string(),
            };
            LofiError::decode(path, format!("{message}; {fallback}"))
        })
    }

    fn supports_format(&self, path: &Path) -> bool {
        self.inner.supports_format(path) || path.is_file()
    }
}
