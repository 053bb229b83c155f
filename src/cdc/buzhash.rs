//! Buzhash (cyclic polynomial) rolling hash.
//!
//! The state over a window `b[0..n]` is
//!
//! ```text
//! H = rotl(T[b0], n-1) ^ rotl(T[b1], n-2) ^ ... ^ rotl(T[b(n-1)], 0)
//! ```
//!
//! where `T` maps each byte value to a pseudo-random 64-bit word. Sliding the
//! window rotates the whole state by one, cancels the outgoing byte's term
//! (which has been rotated `n` times by then) and mixes in the new byte.

use super::RollingHash;
use crate::config::MAX_WINDOW_SIZE;
use crate::error::ChunkError;

/// Seed for the byte substitution table.
const TABLE_SEED: u64 = 0x6275_7a68_6173_6836;

/// Generates the byte substitution table at compile time (splitmix64).
const fn substitution_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut state = TABLE_SEED;
    let mut i = 0;
    while i < 256 {
        state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        table[i] = z ^ (z >> 31);
        i += 1;
    }
    table
}

static TABLE: [u64; 256] = substitution_table();

/// A 64-bit buzhash over a window of up to [`MAX_WINDOW_SIZE`] bytes.
///
/// # Example
///
/// ```
/// use buzchunk::{Buzhash64, RollingHash};
///
/// let mut rolled = Buzhash64::new();
/// rolled.seed(b"0123456789abcdef")?;
/// rolled.roll(b'g')?;
///
/// let mut seeded = Buzhash64::new();
/// seeded.seed(b"123456789abcdefg")?;
///
/// assert_eq!(rolled.sum64(), seeded.sum64());
/// # Ok::<(), buzchunk::ChunkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Buzhash64 {
    window: [u8; MAX_WINDOW_SIZE],
    len: usize,
    /// Index of the oldest byte in `window`.
    head: usize,
    state: u64,
}

impl Buzhash64 {
    /// Creates an empty rolling hash. Call [`RollingHash::seed`] before rolling.
    pub fn new() -> Self {
        Self {
            window: [0u8; MAX_WINDOW_SIZE],
            len: 0,
            head: 0,
            state: 0,
        }
    }

    /// Returns the current window length.
    pub fn window_len(&self) -> usize {
        self.len
    }
}

impl Default for Buzhash64 {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingHash for Buzhash64 {
    fn seed(&mut self, window: &[u8]) -> Result<(), ChunkError> {
        if window.is_empty() || window.len() > MAX_WINDOW_SIZE {
            return Err(ChunkError::Digest {
                message: format!(
                    "buzhash window of {} bytes outside 1..={}",
                    window.len(),
                    MAX_WINDOW_SIZE
                ),
            });
        }

        self.window[..window.len()].copy_from_slice(window);
        self.len = window.len();
        self.head = 0;
        self.state = window
            .iter()
            .fold(0u64, |h, &b| h.rotate_left(1) ^ TABLE[b as usize]);
        Ok(())
    }

    #[inline]
    fn roll(&mut self, byte: u8) -> Result<(), ChunkError> {
        if self.len == 0 {
            return Err(ChunkError::Digest {
                message: "buzhash rolled before it was seeded".into(),
            });
        }

        let out = self.window[self.head];
        self.window[self.head] = byte;
        self.head += 1;
        if self.head == self.len {
            self.head = 0;
        }

        self.state = self.state.rotate_left(1)
            ^ TABLE[out as usize].rotate_left(self.len as u32)
            ^ TABLE[byte as usize];
        Ok(())
    }

    #[inline]
    fn sum64(&self) -> u64 {
        self.state
    }
}
