//! SHA-512/256 chunk digest.

use sha2::{Digest, Sha512_256};

use super::StreamDigest;
use crate::chunk::ChunkHash;
use crate::error::ChunkError;

/// A [`StreamDigest`] computing SHA-512/256.
#[derive(Debug, Clone, Default)]
pub struct Sha512_256Digest {
    state: Sha512_256,
}

impl Sha512_256Digest {
    /// Creates a new, empty digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Digests `data` in one shot.
    pub fn digest(data: &[u8]) -> ChunkHash {
        let mut digest = Self::new();
        Digest::update(&mut digest.state, data);
        digest.snapshot()
    }
}

impl StreamDigest for Sha512_256Digest {
    fn update(&mut self, data: &[u8]) -> Result<(), ChunkError> {
        Digest::update(&mut self.state, data);
        Ok(())
    }

    fn snapshot(&self) -> ChunkHash {
        let out = self.state.clone().finalize();
        let mut bytes = [0u8; ChunkHash::SIZE];
        bytes.copy_from_slice(&out);
        ChunkHash::new(bytes)
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.state);
    }
}
