/// Audio-specific errors
use lofi_core::LofiError;
use std::path::Path;
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Invalid audio buffer
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Symphonia error
    #[error("Symphonia error: {0}")]
    Symphonia(String),

    /// WAV writer error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl AudioError {
    /// Attach the source path and fold into the core decode error
    pub(crate) fn decoding(self, path: &Path) -> LofiError {
        LofiError::decode(path, self.to_string())
    }

    /// Attach the destination path and fold into the core encode error
    pub(crate) fn encoding(self, path: &Path) -> LofiError {
        LofiError::encode(path, self.to_string())
    }
}
