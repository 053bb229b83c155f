//! Configuration for chunking behavior.
//!
//! [`ChunkConfig`] controls the rolling window, the boundary predicate and
//! how the drivers read from their source.
//!
//! # Example
//!
//! ```
//! use buzchunk::ChunkConfig;
//!
//! // Default: 16-byte window, 24-bit predicate (~16 MiB chunks), no cap
//! let config = ChunkConfig::default();
//!
//! // Smaller chunks with a hard cap
//! let config = ChunkConfig::new(16, 13)?.with_max_chunk_len(Some(64 * 1024));
//! config.validate()?;
//!
//! # Ok::<(), buzchunk::ChunkError>(())
//! ```

use crate::error::ChunkError;

/// Default rolling window size in bytes.
pub const DEFAULT_WINDOW_SIZE: usize = 16;

/// Default boundary predicate width. A cut needs this many low bits of the
/// rolling state to be zero, giving an expected chunk length of `2^24` bytes.
pub const DEFAULT_BOUNDARY_BITS: u32 = 24;

/// Default size of a single read from the source.
pub const DEFAULT_READ_BLOCK_SIZE: usize = 1024;

/// Largest supported rolling window.
pub const MAX_WINDOW_SIZE: usize = 64;

/// Configuration for content-defined chunking.
///
/// # Chunk Lengths
///
/// There is no minimum chunk length beyond the initial window fill, and by
/// default no maximum: a chunk ends only where the boundary predicate fires
/// or where the stream ends. Setting [`ChunkConfig::with_max_chunk_len`]
/// forces a cut once a chunk reaches the cap; this changes boundaries for any
/// input that would otherwise produce a longer chunk.
///
/// # Example
///
/// ```
/// use buzchunk::ChunkConfig;
///
/// let config = ChunkConfig::default()
///     .with_boundary_bits(20)
///     .with_read_block_size(64 * 1024);
/// assert_eq!(config.expected_chunk_len(), 1 << 20);
/// # Ok::<(), buzchunk::ChunkError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    /// Rolling window size in bytes.
    window_size: usize,

    /// Number of low rolling-state bits that must be zero at a cut point.
    boundary_bits: u32,

    /// Optional hard cap on chunk length.
    max_chunk_len: Option<u64>,

    /// Size of each read issued to the source.
    read_block_size: usize,
}

impl ChunkConfig {
    /// Creates a new configuration with the given window and predicate width.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if:
    /// - `window_size` is zero or larger than [`MAX_WINDOW_SIZE`]
    /// - `boundary_bits` is outside `1..=63`
    pub fn new(window_size: usize, boundary_bits: u32) -> Result<Self, ChunkError> {
        let config = Self {
            window_size,
            boundary_bits,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the rolling window size.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Sets the boundary predicate width.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_boundary_bits(mut self, bits: u32) -> Self {
        self.boundary_bits = bits;
        self
    }

    /// Sets an optional hard cap on chunk length.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_max_chunk_len(mut self, max: Option<u64>) -> Self {
        self.max_chunk_len = max;
        self
    }

    /// Sets the size of each read issued to the source.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_read_block_size(mut self, size: usize) -> Self {
        self.read_block_size = size;
        self
    }

    /// Returns the rolling window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the boundary predicate width.
    pub fn boundary_bits(&self) -> u32 {
        self.boundary_bits
    }

    /// Returns the chunk length cap, if any.
    pub fn max_chunk_len(&self) -> Option<u64> {
        self.max_chunk_len
    }

    /// Returns the read block size.
    pub fn read_block_size(&self) -> usize {
        self.read_block_size
    }

    /// Returns the expected chunk length for uniformly distributed input.
    pub fn expected_chunk_len(&self) -> u64 {
        1u64 << self.boundary_bits.min(63)
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use buzchunk::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_window_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.window_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "window_size must be non-zero",
            });
        }

        if self.window_size > MAX_WINDOW_SIZE {
            return Err(ChunkError::InvalidConfig {
                message: "window_size cannot exceed 64 bytes",
            });
        }

        if self.boundary_bits == 0 || self.boundary_bits > 63 {
            return Err(ChunkError::InvalidConfig {
                message: "boundary_bits must be in 1..=63",
            });
        }

        if let Some(max) = self.max_chunk_len {
            if max < self.window_size as u64 {
                return Err(ChunkError::InvalidConfig {
                    message: "max_chunk_len cannot be smaller than window_size",
                });
            }
        }

        if self.read_block_size == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "read_block_size must be non-zero",
            });
        }

        Ok(())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            boundary_bits: DEFAULT_BOUNDARY_BITS,
            max_chunk_len: None,
            read_block_size: DEFAULT_READ_BLOCK_SIZE,
        }
    }
}
