/// Core error types for Lofi Maker
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using `LofiError`
pub type Result<T> = std::result::Result<T, LofiError>;

/// Core error type for Lofi Maker
#[derive(Error, Debug)]
pub enum LofiError {
    /// Source file is missing, unreadable, corrupt, or uses an unsupported codec
    #[error("Failed to decode {}: {message}", .path.display())]
    Decode {
        /// File that failed
        path: PathBuf,
        /// Backend message
        message: String,
    },

    /// Destination could not be written
    #[error("Failed to encode {}: {message}", .path.display())]
    Encode {
        /// Destination that failed
        path: PathBuf,
        /// Backend message
        message: String,
    },

    /// A parameter is outside the range the pipeline can work with
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LofiError {
    /// Create a decode error for the given source
    pub fn decode(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    /// Create an encode error for the given destination
    pub fn encode(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::Encode {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Decode { path, .. } | Self::Encode { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether the pipeline may drop the failing input and carry on.
    ///
    /// Only decode failures qualify. The pipeline drops effect tracks on
    /// these; the same error on the primary track still aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
