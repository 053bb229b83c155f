//! Async stream adapter for chunking.
//!
//! [`ChunkStream`] drives the same engine and state machine as
//! [`ChunkIter`](crate::ChunkIter), but pulls bytes from a
//! `futures_io::AsyncRead`. Nothing is read until the stream is polled.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use buzchunk::{chunk_async, ChunkConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> Result<(), buzchunk::ChunkError> {
//!     let stream = chunk_async(reader, ChunkConfig::default());
//!     futures_util::pin_mut!(stream);
//!
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("{}-{}, {}", chunk.offset, chunk.end(), chunk.hash);
//!     }
//!     Ok(())
//! }
//! ```

use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_core::stream::FusedStream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::cdc::{Buzhash64, RollingHash};
use crate::chunk::{ChunkHash, ChunkInfo};
use crate::chunker::{ChunkEngine, ChunkStats, DriverState, enter_done, enter_failed};
use crate::config::{ChunkConfig, MAX_WINDOW_SIZE};
use crate::error::ChunkError;
use crate::hash::{Sha512_256Digest, StreamDigest};

pin_project! {
    /// A stream that yields chunks from an async reader.
    ///
    /// Same contract as [`ChunkIter`](crate::ChunkIter): `Ok` items in
    /// stream order, at most one trailing `Err`, then `None` forever.
    pub struct ChunkStream<R, H, D> {
        #[pin]
        reader: R,
        config: ChunkConfig,
        engine: ChunkEngine<H, D>,
        window: [u8; MAX_WINDOW_SIZE],
        window_filled: usize,
        block: Box<[u8]>,
        pos: usize,
        filled: usize,
        state: DriverState,
    }
}

impl<R, H, D> ChunkStream<R, H, D>
where
    H: RollingHash,
    D: StreamDigest + Clone,
{
    /// Creates a new chunk stream with explicit capabilities.
    pub fn with_capabilities(reader: R, config: ChunkConfig, roller: H, digest: D) -> Self {
        Self {
            reader,
            engine: ChunkEngine::with_capabilities(&config, roller, digest),
            window: [0u8; MAX_WINDOW_SIZE],
            window_filled: 0,
            block: vec![0u8; config.read_block_size()].into_boxed_slice(),
            config,
            pos: 0,
            filled: 0,
            state: DriverState::Initializing,
        }
    }

    /// Returns the digest of every byte read from the source so far.
    pub fn stream_hash(&self) -> ChunkHash {
        self.engine.stream_hash()
    }

    /// Returns the statistics of this run.
    pub fn stats(&self) -> ChunkStats {
        self.engine.stats()
    }
}

impl<R, H, D> Stream for ChunkStream<R, H, D>
where
    R: AsyncRead,
    H: RollingHash,
    D: StreamDigest + Clone,
{
    type Item = Result<ChunkInfo, ChunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        macro_rules! fail {
            ($err:expr) => {{
                let err = enter_failed(this.state, $err, &this.engine.stats());
                return Poll::Ready(Some(Err(err)));
            }};
        }

        loop {
            match *this.state {
                DriverState::Initializing => {
                    if let Err(e) = this.config.validate() {
                        fail!(e);
                    }

                    // The window may take several polls to fill.
                    let w = this.config.window_size();
                    while *this.window_filled < w {
                        let buf = &mut this.window[*this.window_filled..w];
                        match this.reader.as_mut().poll_read(cx, buf) {
                            Poll::Pending => return Poll::Pending,
                            Poll::Ready(Ok(0)) => break,
                            Poll::Ready(Ok(n)) => *this.window_filled += n,
                            Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => {}
                            Poll::Ready(Err(e)) => fail!(e.into()),
                        }
                    }

                    let n = *this.window_filled;
                    *this.state = if n < w {
                        DriverState::Flushing
                    } else {
                        DriverState::Streaming
                    };
                    match this.engine.seed(&this.window[..n]) {
                        Ok(Some(chunk)) => return Poll::Ready(Some(Ok(chunk))),
                        Ok(None) => {}
                        Err(e) => fail!(e),
                    }
                }
                DriverState::Streaming => {
                    if *this.pos < *this.filled {
                        match this.engine.feed(&this.block[*this.pos..*this.filled]) {
                            Ok((used, chunk)) => {
                                *this.pos += used;
                                if let Some(chunk) = chunk {
                                    return Poll::Ready(Some(Ok(chunk)));
                                }
                            }
                            Err(e) => fail!(e),
                        }
                        continue;
                    }

                    match this.reader.as_mut().poll_read(cx, &mut this.block[..]) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Ok(0)) => *this.state = DriverState::Flushing,
                        Poll::Ready(Ok(n)) => {
                            *this.pos = 0;
                            *this.filled = n;
                        }
                        Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => {}
                        Poll::Ready(Err(e)) => fail!(e.into()),
                    }
                }
                DriverState::Flushing => {
                    let last = this.engine.finish();
                    enter_done(this.state, &this.engine.stats());
                    if let Some(chunk) = last {
                        return Poll::Ready(Some(Ok(chunk)));
                    }
                }
                DriverState::Done | DriverState::Failed => return Poll::Ready(None),
            }
        }
    }
}

impl<R, H, D> FusedStream for ChunkStream<R, H, D>
where
    R: AsyncRead,
    H: RollingHash,
    D: StreamDigest + Clone,
{
    fn is_terminated(&self) -> bool {
        matches!(self.state, DriverState::Done | DriverState::Failed)
    }
}

/// Creates a chunk stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use buzchunk::{chunk_async, ChunkConfig};
///
/// let tokio_reader = tokio::fs::File::open("file").await?;
/// let stream = chunk_async(tokio_reader.compat(), ChunkConfig::default());
/// ```
pub fn chunk_async<R: AsyncRead>(
    reader: R,
    config: ChunkConfig,
) -> ChunkStream<R, Buzhash64, Sha512_256Digest> {
    ChunkStream::with_capabilities(reader, config, Buzhash64::new(), Sha512_256Digest::new())
}
