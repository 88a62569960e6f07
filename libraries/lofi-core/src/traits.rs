/// Core traits for Lofi Maker
use crate::error::Result;
use crate::types::AudioBuffer;
use std::path::Path;

/// Audio decoder trait
///
/// Implementers decode an audio file into an interleaved `AudioBuffer`
/// carrying the file's native sample rate and channel count.
///
/// The pipeline only depends on this trait, so tests can substitute an
/// in-memory implementation for the real decoder.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path (loads entire file)
    ///
    /// # Errors
    /// Returns `LofiError::Decode` naming `path` if the file is missing,
    /// uses an unsupported codec, or contains corrupt data
    fn decode(&mut self, path: &Path) -> Result<AudioBuffer>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}

/// Audio encoder trait
///
/// Implementers write an `AudioBuffer` to a destination file at the rate
/// the buffer is tagged with.
pub trait AudioEncoder: Send {
    /// Encode `buffer` to `destination`
    ///
    /// Implementations must not leave a partially written file behind on
    /// failure.
    ///
    /// # Errors
    /// Returns `LofiError::Encode` naming `destination` on I/O or codec failure
    fn encode(&mut self, buffer: &AudioBuffer, destination: &Path) -> Result<()>;

    /// File extension (without dot) of the files this encoder produces
    fn extension(&self) -> &'static str;
}

impl<T: AudioDecoder + ?Sized> AudioDecoder for Box<T> {
    fn decode(&mut self, path: &Path) -> Result<AudioBuffer> {
        (**self).decode(path)
    }

    fn supports_format(&self, path: &Path) -> bool {
        (**self).supports_format(path)
    }
}

impl<T: AudioEncoder + ?Sized> AudioEncoder for Box<T> {
    fn encode(&mut self, buffer: &AudioBuffer, destination: &Path) -> Result<()> {
        (**self).encode(buffer, destination)
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}
