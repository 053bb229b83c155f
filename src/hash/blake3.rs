//! BLAKE3 chunk digest.

use super::StreamDigest;
use crate::chunk::ChunkHash;
use crate::error::ChunkError;

/// A [`StreamDigest`] computing BLAKE3.
#[derive(Debug, Clone, Default)]
pub struct Blake3Digest {
    state: blake3::Hasher,
}

impl Blake3Digest {
    /// Creates a new, empty digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Digests `data` in one shot.
    pub fn digest(data: &[u8]) -> ChunkHash {
        ChunkHash::new(blake3::hash(data).into())
    }
}

impl StreamDigest for Blake3Digest {
    fn update(&mut self, data: &[u8]) -> Result<(), ChunkError> {
        self.state.update(data);
        Ok(())
    }

    fn snapshot(&self) -> ChunkHash {
        ChunkHash::new(self.state.finalize().into())
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_one_shot() {
        let mut digest = Blake3Digest::new();
        digest.update(b"hello ").unwrap();
        digest.update(b"world").unwrap();

        let expected: [u8; 32] = blake3::hash(b"hello world").into();
        assert_eq!(digest.snapshot(), ChunkHash::new(expected));
    }

    #[test]
    fn test_reset() {
        let mut digest = Blake3Digest::new();
        digest.update(b"some data").unwrap();
        digest.reset();
        digest.update(b"hello world").unwrap();
        assert_eq!(digest.snapshot(), Blake3Digest::digest(b"hello world"));
    }
}
