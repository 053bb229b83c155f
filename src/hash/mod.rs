//! Strong digest implementations for chunk identity.
//!
//! The chunking engine only talks to the [`StreamDigest`] trait, so the
//! digest algorithm can be swapped without touching boundary detection or
//! chunk accumulation.
//!
//! - [`Sha512_256Digest`] - SHA-512/256, the default
//! - [`Blake3Digest`] - BLAKE3 (requires `hash-blake3` feature)

#[cfg(feature = "hash-blake3")]
mod blake3;
mod sha512;

#[cfg(feature = "hash-blake3")]
pub use blake3::Blake3Digest;
pub use sha512::Sha512_256Digest;

use crate::chunk::ChunkHash;
use crate::error::ChunkError;

/// An incremental cryptographic digest.
///
/// The engine keeps two instances per run: one over the whole stream and one
/// reset after every emitted chunk.
pub trait StreamDigest {
    /// Feeds more bytes into the digest.
    ///
    /// # Errors
    ///
    /// An implementation that cannot accept the bytes returns
    /// [`ChunkError::Digest`]; the run that fed them fails.
    fn update(&mut self, data: &[u8]) -> Result<(), ChunkError>;

    /// Returns the digest of everything fed since the last reset, leaving the
    /// state untouched.
    fn snapshot(&self) -> ChunkHash;

    /// Resets the digest to its empty state.
    fn reset(&mut self);
}
