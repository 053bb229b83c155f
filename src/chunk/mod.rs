//! Chunk types.
//!
//! - [`ChunkInfo`] - Offset, length and digest of one emitted chunk
//! - [`ChunkHash`] - 32-byte cryptographic digest

mod hash;
mod info;

pub use hash::ChunkHash;
pub use info::ChunkInfo;
