/// Transcoding service - FFmpeg wrapper for the final MP3 encode
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct TranscodingService {
    ffmpeg_path: PathBuf,
}

impl TranscodingService {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Check whether the configured ffmpeg binary can be started
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Encode `input` to an MP3 at `output` with LAME at `bitrate`
    ///
    /// A partially written `output` is removed if ffmpeg fails.
    pub async fn to_mp3(&self, input: &Path, output: &Path, bitrate: &str) -> Result<()> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-y") // Overwrite output file
            .arg("-i")
            .arg(input)
            .arg("-codec:a")
            .arg("libmp3lame")
            .arg("-b:a")
            .arg(bitrate)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("Running {:?}", cmd.as_std());

        let result = match cmd.output().await {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                Err(AppError::Transcoding(format!(
                    "FFmpeg failed on {}: {}",
                    input.display(),
                    stderr.trim()
                )))
            }
            Err(e) => Err(AppError::Transcoding(format!(
                "could not run {}: {}",
                self.ffmpeg_path.display(),
                e
            ))),
        };

        if result.is_err() {
            remove_if_exists(output).await?;
        }
        result
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
