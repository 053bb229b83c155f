//! Synchronous driver - Chunker and ChunkIter.
//!
//! [`ChunkIter`] is the pull-based form of the producer/consumer contract:
//! the consumer asks for the next chunk, the iterator reads just enough of
//! the source to find it, and nothing runs when nobody is asking. Memory is
//! one read block plus the engine's fixed-size state.
//!
//! # Example
//!
//! ```no_run
//! use buzchunk::{ChunkConfig, Chunker};
//! use std::fs::File;
//!
//! let file = File::open("data.bin")?;
//! let chunker = Chunker::new(ChunkConfig::default());
//!
//! for chunk in chunker.chunk(file) {
//!     let chunk = chunk?;
//!     println!("{}-{}, {}", chunk.offset, chunk.end(), chunk.hash);
//! }
//! # Ok::<(), buzchunk::ChunkError>(())
//! ```

use std::io::{self, ErrorKind, Read};
use std::iter::FusedIterator;

use bytes::Bytes;

use super::engine::{ChunkEngine, ChunkStats, DriverState, enter_done, enter_failed, log_done};
use crate::cdc::{Buzhash64, RollingHash};
use crate::chunk::{ChunkHash, ChunkInfo};
use crate::config::{ChunkConfig, MAX_WINDOW_SIZE};
use crate::error::ChunkError;
use crate::hash::{Sha512_256Digest, StreamDigest};

/// Configures and starts chunking runs.
///
/// `Chunker` holds only a configuration; every call to [`Chunker::chunk`]
/// starts an independent run with its own engine state.
///
/// # Example
///
/// ```
/// use buzchunk::{ChunkConfig, Chunker};
/// use std::io::Cursor;
///
/// let data = [0u8; 5];
/// let chunker = Chunker::new(ChunkConfig::default());
/// let chunks: Vec<_> = chunker.chunk(Cursor::new(&data[..])).collect::<Result<_, _>>()?;
///
/// assert_eq!(chunks.len(), 1);
/// assert_eq!((chunks[0].offset, chunks[0].length), (1, 5));
/// # Ok::<(), buzchunk::ChunkError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker with the given configuration.
    ///
    /// The configuration is validated when a run starts; an invalid one is
    /// reported as the run's error.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Creates a chunking iterator from a reader, using the default
    /// rolling hash and digest.
    pub fn chunk<R: Read>(&self, reader: R) -> ChunkIter<R> {
        self.chunk_with(reader, Buzhash64::new(), Sha512_256Digest::new())
    }

    /// Creates a chunking iterator from a reader with explicit capabilities.
    ///
    /// # Example
    ///
    /// ```
    /// use buzchunk::{Buzhash64, ChunkConfig, Chunker, Sha512_256Digest};
    ///
    /// let chunker = Chunker::new(ChunkConfig::default());
    /// let iter = chunker.chunk_with(&b"abc"[..], Buzhash64::new(), Sha512_256Digest::new());
    /// assert_eq!(iter.count(), 1);
    /// ```
    pub fn chunk_with<R, H, D>(&self, reader: R, roller: H, digest: D) -> ChunkIter<R, H, D>
    where
        R: Read,
        H: RollingHash,
        D: StreamDigest + Clone,
    {
        ChunkIter::new(reader, self.config, roller, digest)
    }

    /// Chunks an in-memory buffer.
    ///
    /// Produces exactly what [`Chunker::chunk`] produces over a reader of the
    /// same bytes, without the read loop.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] for an invalid configuration.
    /// Other errors come from the rolling hash or digest.
    ///
    /// # Example
    ///
    /// ```
    /// use buzchunk::{ChunkConfig, Chunker};
    ///
    /// let chunker = Chunker::new(ChunkConfig::default());
    /// let chunks = chunker.chunk_bytes(&b"hello world"[..])?;
    ///
    /// assert_eq!(chunks.len(), 1);
    /// assert_eq!(chunks[0].length, 11);
    /// # Ok::<(), buzchunk::ChunkError>(())
    /// ```
    pub fn chunk_bytes(&self, data: impl Into<Bytes>) -> Result<Vec<ChunkInfo>, ChunkError> {
        self.config.validate()?;
        let data = data.into();
        let mut engine = ChunkEngine::new(&self.config);
        let mut chunks = Vec::new();

        let (window, mut rest) = data.split_at(self.config.window_size().min(data.len()));
        chunks.extend(engine.seed(window)?);
        while !rest.is_empty() {
            let (used, chunk) = engine.feed(rest)?;
            chunks.extend(chunk);
            rest = &rest[used..];
        }
        chunks.extend(engine.finish());

        log_done(&engine.stats());
        Ok(chunks)
    }
}

/// An iterator that yields chunks from a reader.
///
/// Yields `Ok(ChunkInfo)` for every chunk in stream order. If the run fails,
/// the failure is yielded once as the final `Err` item and the iterator is
/// fused from then on, so the `Err` doubles as the run's error slot. Chunks
/// yielded before it remain valid.
///
/// The source is read in blocks of `read_block_size` bytes; a read that
/// returns [`ErrorKind::Interrupted`] is reissued, any other error is fatal.
pub struct ChunkIter<R, H = Buzhash64, D = Sha512_256Digest> {
    reader: R,
    config: ChunkConfig,
    engine: ChunkEngine<H, D>,
    block: Box<[u8]>,
    pos: usize,
    filled: usize,
    state: DriverState,
}

impl<R: Read, H: RollingHash, D: StreamDigest + Clone> ChunkIter<R, H, D> {
    fn new(reader: R, config: ChunkConfig, roller: H, digest: D) -> Self {
        Self {
            reader,
            engine: ChunkEngine::with_capabilities(&config, roller, digest),
            block: vec![0u8; config.read_block_size()].into_boxed_slice(),
            config,
            pos: 0,
            filled: 0,
            state: DriverState::Initializing,
        }
    }

    /// Returns the digest of every byte read from the source so far.
    ///
    /// Once the iterator has returned `None`, this is the digest of the
    /// whole stream.
    pub fn stream_hash(&self) -> ChunkHash {
        self.engine.stream_hash()
    }

    /// Returns the statistics of this run.
    pub fn stats(&self) -> ChunkStats {
        self.engine.stats()
    }

    /// Returns true once the run has completed or failed.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, DriverState::Done | DriverState::Failed)
    }

    fn fail(&mut self, err: ChunkError) -> Option<Result<ChunkInfo, ChunkError>> {
        Some(Err(enter_failed(&mut self.state, err, &self.engine.stats())))
    }

    /// Fills the initial window, seeds the engine and picks the next state.
    fn initialize(&mut self) -> Result<Option<ChunkInfo>, ChunkError> {
        self.config.validate()?;

        let w = self.config.window_size();
        let mut window = [0u8; MAX_WINDOW_SIZE];
        let n = read_full(&mut self.reader, &mut window[..w])?;

        self.state = if n < w {
            DriverState::Flushing
        } else {
            DriverState::Streaming
        };
        self.engine.seed(&window[..n])
    }
}

impl<R: Read, H: RollingHash, D: StreamDigest + Clone> Iterator for ChunkIter<R, H, D> {
    type Item = Result<ChunkInfo, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                DriverState::Initializing => match self.initialize() {
                    Ok(Some(chunk)) => return Some(Ok(chunk)),
                    Ok(None) => {}
                    Err(e) => return self.fail(e),
                },
                DriverState::Streaming => {
                    if self.pos < self.filled {
                        match self.engine.feed(&self.block[self.pos..self.filled]) {
                            Ok((used, chunk)) => {
                                self.pos += used;
                                if let Some(chunk) = chunk {
                                    return Some(Ok(chunk));
                                }
                            }
                            Err(e) => return self.fail(e),
                        }
                        continue;
                    }

                    match self.reader.read(&mut self.block) {
                        Ok(0) => self.state = DriverState::Flushing,
                        Ok(n) => {
                            self.pos = 0;
                            self.filled = n;
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => {}
                        Err(e) => return self.fail(e.into()),
                    }
                }
                DriverState::Flushing => {
                    let last = self.engine.finish();
                    enter_done(&mut self.state, &self.engine.stats());
                    if let Some(chunk) = last {
                        return Some(Ok(chunk));
                    }
                }
                DriverState::Done | DriverState::Failed => return None,
            }
        }
    }
}

impl<R: Read, H: RollingHash, D: StreamDigest + Clone> FusedIterator for ChunkIter<R, H, D> {}

/// Reads until `buf` is full or the reader reports end-of-stream.
///
/// Returns the number of bytes read; fewer than `buf.len()` means the stream
/// ended. Unlike [`Read::read_exact`], a short stream is not an error.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
