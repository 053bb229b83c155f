//! Core chunking engine - window seeding, boundary checks and emission.
//!
//! [`ChunkEngine`] owns all per-run state: the rolling window, the boundary
//! predicate, the whole-stream digest and the chunk digest. It never reads
//! from a source itself. Drivers ([`ChunkIter`](crate::ChunkIter), the async
//! stream and the pipeline task) feed it bytes in three steps:
//!
//! 1. `seed()` - once, with the first `window_size` bytes (fewer at end-of-stream)
//! 2. `feed()` - repeatedly, with whatever the source returned
//! 3. `finish()` - once, at end-of-stream, to flush the trailing chunk
//!
//! Out-of-order calls fail with [`ChunkError::InvalidState`]: `feed()` is only
//! accepted after a seed of exactly `window_size` bytes.
//!
//! # Example
//!
//! ```
//! use buzchunk::{ChunkConfig, ChunkEngine};
//!
//! let config = ChunkConfig::new(16, 8)?;
//! let mut engine = ChunkEngine::new(&config);
//! let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 + 13) as u8).collect();
//!
//! let mut chunks = Vec::new();
//! chunks.extend(engine.seed(&data[..16])?);
//!
//! let mut rest = &data[16..];
//! while !rest.is_empty() {
//!     let (used, chunk) = engine.feed(rest)?;
//!     chunks.extend(chunk);
//!     rest = &rest[used..];
//! }
//! chunks.extend(engine.finish());
//!
//! let total: u64 = chunks.iter().map(|c| c.length).sum();
//! assert_eq!(total, 4096);
//! # Ok::<(), buzchunk::ChunkError>(())
//! ```

use tracing::{debug, trace, warn};

use crate::cdc::{BoundaryDetector, Buzhash64, RollingHash};
use crate::chunk::{ChunkHash, ChunkInfo};
use crate::config::ChunkConfig;
use crate::error::ChunkError;
use crate::hash::{Sha512_256Digest, StreamDigest};

/// Per-run chunking statistics.
///
/// Every driver owns its own `ChunkStats`; nothing is shared between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkStats {
    /// Number of chunks emitted so far.
    pub chunks: u64,
    /// Number of stream bytes ingested so far.
    pub bytes: u64,
    /// Number of bytes covered by emitted chunks.
    pub emitted: u64,
    /// Length of the longest chunk emitted so far.
    pub largest: u64,
}

impl ChunkStats {
    /// Returns the mean length of the emitted chunks, or `None` before the
    /// first emission.
    pub fn mean_chunk_len(&self) -> Option<f64> {
        (self.chunks > 0).then(|| self.emitted as f64 / self.chunks as f64)
    }

    fn record(&mut self, length: u64) {
        self.chunks += 1;
        self.emitted += length;
        self.largest = self.largest.max(length);
    }
}

/// Lifecycle of a driver run.
///
/// `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DriverState {
    Initializing,
    Streaming,
    Flushing,
    Done,
    Failed,
}

/// Moves a driver to `Done` and logs the run.
pub(crate) fn enter_done(state: &mut DriverState, stats: &ChunkStats) {
    *state = DriverState::Done;
    log_done(stats);
}

pub(crate) fn log_done(stats: &ChunkStats) {
    debug!(
        chunks = stats.chunks,
        bytes = stats.bytes,
        mean_chunk_len = stats.mean_chunk_len().unwrap_or(0.0),
        largest = stats.largest,
        "chunking finished"
    );
}

/// Moves a driver to `Failed`, logs the run, and hands the error back for
/// delivery through the driver's error slot.
pub(crate) fn enter_failed(
    state: &mut DriverState,
    err: ChunkError,
    stats: &ChunkStats,
) -> ChunkError {
    *state = DriverState::Failed;
    match err {
        ChunkError::Cancelled => debug!(bytes = stats.bytes, "chunking cancelled"),
        ref err => warn!(
            error = %err,
            chunks = stats.chunks,
            bytes = stats.bytes,
            "chunking failed"
        ),
    }
    err
}

/// Stateful CDC engine.
///
/// Generic over its two capabilities so window hashing and digesting can be
/// replaced without touching the accumulation logic. The defaults are
/// [`Buzhash64`] and [`Sha512_256Digest`].
///
/// # Emission Rules
///
/// - A boundary is checked once right after seeding, then after every byte
///   passed to `feed()`.
/// - With `max_chunk_len` set, a chunk is also cut once it reaches the cap.
/// - `finish()` emits whatever has accumulated since the last boundary.
///
/// Emitted chunks are contiguous, 1-based, and never empty.
#[derive(Debug, Clone)]
pub struct ChunkEngine<H = Buzhash64, D = Sha512_256Digest> {
    roller: H,
    detector: BoundaryDetector,
    window_size: usize,
    max_chunk_len: Option<u64>,
    stream_digest: D,
    chunk_digest: D,
    /// 1-based start of the chunk currently accumulating.
    offset: u64,
    chunk_len: u64,
    seeded: bool,
    /// Set once the window holds `window_size` bytes.
    primed: bool,
    stats: ChunkStats,
}

impl ChunkEngine {
    /// Creates an engine with the default capabilities.
    pub fn new(config: &ChunkConfig) -> Self {
        Self::with_capabilities(config, Buzhash64::new(), Sha512_256Digest::new())
    }
}

impl<H: RollingHash, D: StreamDigest + Clone> ChunkEngine<H, D> {
    /// Creates an engine from explicit capabilities.
    ///
    /// `digest` must be in its empty state; it is cloned for the chunk digest.
    pub fn with_capabilities(config: &ChunkConfig, roller: H, digest: D) -> Self {
        Self {
            roller,
            detector: BoundaryDetector::new(config.boundary_bits()),
            window_size: config.window_size(),
            max_chunk_len: config.max_chunk_len(),
            chunk_digest: digest.clone(),
            stream_digest: digest,
            offset: 1,
            chunk_len: 0,
            seeded: false,
            primed: false,
            stats: ChunkStats::default(),
        }
    }

    /// Seeds the rolling window with the stream's first bytes.
    ///
    /// `window` holds `window_size` bytes, or fewer when the stream ends
    /// inside the first window; an empty `window` is a zero-length stream.
    /// Returns a chunk if a boundary (or the length cap) falls inside it.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::InvalidState`] on a second seed, or a `window` longer
    ///   than the configured window size
    /// - [`ChunkError::Digest`] if a capability rejects the bytes
    pub fn seed(&mut self, window: &[u8]) -> Result<Option<ChunkInfo>, ChunkError> {
        if self.seeded {
            return Err(ChunkError::InvalidState {
                message: "engine already seeded",
            });
        }
        if window.len() > self.window_size {
            return Err(ChunkError::InvalidState {
                message: "seed longer than the configured window",
            });
        }
        self.seeded = true;
        if window.is_empty() {
            return Ok(None);
        }

        self.roller.seed(window)?;
        self.ingest(window)?;
        self.primed = window.len() == self.window_size;

        if self.detector.is_boundary(&self.roller) || self.cap_reached(self.chunk_len) {
            return Ok(Some(self.emit()));
        }
        Ok(None)
    }

    /// Slides `data` through the window one byte at a time, stopping at the
    /// first boundary.
    ///
    /// Returns how many bytes of `data` were consumed and the chunk that ended
    /// at the last consumed byte, if any. Callers pass the unconsumed tail
    /// back in on the next call.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::InvalidState`] unless a full window was seeded first
    /// - [`ChunkError::Digest`] if a capability rejects the bytes
    pub fn feed(&mut self, data: &[u8]) -> Result<(usize, Option<ChunkInfo>), ChunkError> {
        if !self.primed {
            return Err(ChunkError::InvalidState {
                message: "feed before a full window was seeded",
            });
        }

        for (i, &byte) in data.iter().enumerate() {
            self.roller.roll(byte)?;

            let len = self.chunk_len + i as u64 + 1;
            if self.detector.is_boundary(&self.roller) || self.cap_reached(len) {
                self.ingest(&data[..=i])?;
                return Ok((i + 1, Some(self.emit())));
            }
        }

        self.ingest(data)?;
        Ok((data.len(), None))
    }

    /// Flushes the trailing chunk at end-of-stream.
    ///
    /// The flushed chunk is indistinguishable from a content-defined one.
    pub fn finish(&mut self) -> Option<ChunkInfo> {
        (self.chunk_len > 0).then(|| self.emit())
    }

    /// Returns the digest of every byte ingested so far.
    pub fn stream_hash(&self) -> ChunkHash {
        self.stream_digest.snapshot()
    }

    /// Returns the statistics of this run.
    pub fn stats(&self) -> ChunkStats {
        self.stats
    }

    /// Returns the 1-based offset of the chunk currently accumulating.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the number of bytes accumulated since the last emission.
    pub fn pending_len(&self) -> u64 {
        self.chunk_len
    }

    /// Writes `data` into both digests and advances the counters.
    fn ingest(&mut self, data: &[u8]) -> Result<(), ChunkError> {
        self.stream_digest.update(data)?;
        self.chunk_digest.update(data)?;
        self.chunk_len += data.len() as u64;
        self.stats.bytes += data.len() as u64;
        Ok(())
    }

    fn cap_reached(&self, len: u64) -> bool {
        self.max_chunk_len.is_some_and(|max| len >= max)
    }

    fn emit(&mut self) -> ChunkInfo {
        let chunk = ChunkInfo {
            offset: self.offset,
            length: self.chunk_len,
            hash: self.chunk_digest.snapshot(),
        };
        trace!(offset = chunk.offset, length = chunk.length, "chunk boundary");

        self.offset += self.chunk_len;
        self.chunk_len = 0;
        self.chunk_digest.reset();
        self.stats.record(chunk.length);
        chunk
    }
}
