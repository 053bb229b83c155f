//! Error types for buzchunk.

use thiserror::Error;

/// Errors that can occur during chunking operations.
///
/// Every variant is terminal for the run that produced it: chunks emitted
/// before the error stay valid, nothing is emitted after it, and a new run
/// has to start again from the beginning of the source.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The byte source failed with something other than end-of-stream.
    #[error("source read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A digest or rolling-hash capability rejected its input.
    #[error("digest ingest failed: {message}")]
    Digest {
        /// Description of what the capability rejected.
        message: String,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A [`ChunkEngine`](crate::ChunkEngine) call arrived out of order, such
    /// as `feed()` before a full window was seeded.
    #[error("engine misuse: {message}")]
    InvalidState {
        /// Description of the rejected call.
        message: &'static str,
    },

    /// The run was cancelled, or its consumer went away, before completion.
    #[error("chunking cancelled")]
    Cancelled,
}

impl ChunkError {
    /// Returns true if this error came from the byte source.
    pub fn is_io(&self) -> bool {
        matches!(self, ChunkError::Io(_))
    }
}
