//! Content-Defined Chunking (CDC) primitives.
//!
//! This module contains the rolling-window hash and the predicate that turns
//! its state into chunk boundaries.
//!
//! - [`RollingHash`] - Capability trait for sliding-window hashes
//! - [`Buzhash64`] - Cyclic-polynomial rolling hash, the default
//! - [`BoundaryDetector`] - Low-bits-zero boundary predicate

mod boundary;
mod buzhash;

pub use boundary::BoundaryDetector;
pub use buzhash::Buzhash64;

use crate::error::ChunkError;

/// A hash over a fixed-size window that slides one byte at a time.
///
/// Implementations must make [`RollingHash::roll`] O(1) and must make the
/// state after any roll depend only on the bytes currently in the window.
pub trait RollingHash {
    /// Replaces the window with `window` and recomputes the state in bulk.
    ///
    /// The window length for all following rolls is `window.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::Digest`] if the implementation cannot hold a
    /// window of this length.
    fn seed(&mut self, window: &[u8]) -> Result<(), ChunkError>;

    /// Slides the window forward by one byte.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::Digest`] if the byte cannot be taken, including
    /// a roll before the first `seed()`.
    fn roll(&mut self, byte: u8) -> Result<(), ChunkError>;

    /// Returns the current state as a 64-bit value.
    fn sum64(&self) -> u64;

    /// Returns the current state as big-endian bytes.
    fn snapshot(&self) -> [u8; 8] {
        self.sum64().to_be_bytes()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Buzhash that takes `budget` bytes in total across `seed()` and
    /// `roll()`, then rejects the rest.
    #[derive(Debug, Clone)]
    pub(crate) struct BudgetRoller {
        inner: Buzhash64,
        budget: usize,
    }

    impl BudgetRoller {
        pub(crate) fn new(budget: usize) -> Self {
            Self {
                inner: Buzhash64::new(),
                budget,
            }
        }

        fn spend(&mut self, n: usize) -> Result<(), ChunkError> {
            if n > self.budget {
                return Err(ChunkError::Digest {
                    message: "rolling hash budget exhausted".into(),
                });
            }
            self.budget -= n;
            Ok(())
        }
    }

    impl RollingHash for BudgetRoller {
        fn seed(&mut self, window: &[u8]) -> Result<(), ChunkError> {
            self.spend(window.len())?;
            self.inner.seed(window)
        }

        fn roll(&mut self, byte: u8) -> Result<(), ChunkError> {
            self.spend(1)?;
            self.inner.roll(byte)
        }

        fn sum64(&self) -> u64 {
            self.inner.sum64()
        }
    }
}
