//! Background producer with a bounded handoff queue.
//!
//! [`spawn_chunker`] runs a chunking pass on a tokio task and hands each
//! chunk to the consumer through an mpsc channel with room for exactly one
//! pending chunk, so the producer can never run more than one chunk ahead.
//! A failure is delivered separately through an [`ErrorSlot`].
//!
//! The producer stops early, with [`ChunkError::Cancelled`] in the slot,
//! when the [`CancellationToken`] fires or when the receiver is dropped.
//! Both are observed while waiting on a read and while waiting for the
//! consumer to accept a chunk.
//!
//! This module requires the `pipeline` feature to be enabled.
//!
//! # Example
//!
//! ```ignore
//! use buzchunk::{spawn_chunker, ChunkConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let file = tokio::fs::File::open("data.bin").await?;
//! let (mut chunks, errors) = spawn_chunker(file, ChunkConfig::default(), CancellationToken::new());
//!
//! while let Some(chunk) = chunks.recv().await {
//!     println!("{}-{}, {}", chunk.offset, chunk.end(), chunk.hash);
//! }
//! errors.wait().await?;
//! ```

use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::cdc::{Buzhash64, RollingHash};
use crate::chunk::ChunkInfo;
use crate::chunker::{ChunkEngine, DriverState, enter_done, enter_failed};
use crate::config::{ChunkConfig, MAX_WINDOW_SIZE};
use crate::error::ChunkError;
use crate::hash::{Sha512_256Digest, StreamDigest};

/// Number of chunks that may wait in the handoff queue.
const QUEUE_CAPACITY: usize = 1;

/// Receives the terminal error of a pipeline run, if there is one.
///
/// The slot holds at most one error. It is filled before the chunk channel
/// closes, so once the receiver has returned `None`, [`ErrorSlot::try_take`]
/// gives the final answer.
#[derive(Debug)]
pub struct ErrorSlot {
    rx: oneshot::Receiver<ChunkError>,
}

impl ErrorSlot {
    /// Takes the error without waiting.
    ///
    /// Returns `None` if the run succeeded, is still running, or the error
    /// was already taken.
    pub fn try_take(&mut self) -> Option<ChunkError> {
        self.rx.try_recv().ok()
    }

    /// Waits for the run to end and returns its outcome.
    pub async fn wait(self) -> Result<(), ChunkError> {
        match self.rx.await {
            Ok(err) => Err(err),
            Err(_) => Ok(()),
        }
    }
}

/// Spawns a chunking run over `reader` on the current tokio runtime, using
/// the default rolling hash and digest.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_chunker<R>(
    reader: R,
    config: ChunkConfig,
    cancel: CancellationToken,
) -> (mpsc::Receiver<ChunkInfo>, ErrorSlot)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    spawn_chunker_with(
        reader,
        config,
        Buzhash64::new(),
        Sha512_256Digest::new(),
        cancel,
    )
}

/// Spawns a chunking run with explicit capabilities.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_chunker_with<R, H, D>(
    reader: R,
    config: ChunkConfig,
    roller: H,
    digest: D,
    cancel: CancellationToken,
) -> (mpsc::Receiver<ChunkInfo>, ErrorSlot)
where
    R: AsyncRead + Unpin + Send + 'static,
    H: RollingHash + Send + 'static,
    D: StreamDigest + Clone + Send + 'static,
{
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let (err_tx, err_rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut producer = Producer {
            reader,
            engine: ChunkEngine::with_capabilities(&config, roller, digest),
            config,
            tx,
            cancel,
            state: DriverState::Initializing,
        };

        if let Err(err) = producer.run().await {
            let err = enter_failed(&mut producer.state, err, &producer.engine.stats());
            // A dropped slot means nobody is listening; nothing to do.
            let _ = err_tx.send(err);
        }
        // `producer.tx` drops here, after the slot is filled.
    });

    (rx, ErrorSlot { rx: err_rx })
}

struct Producer<R, H, D> {
    reader: R,
    engine: ChunkEngine<H, D>,
    config: ChunkConfig,
    tx: mpsc::Sender<ChunkInfo>,
    cancel: CancellationToken,
    state: DriverState,
}

impl<R, H, D> Producer<R, H, D>
where
    R: AsyncRead + Unpin,
    H: RollingHash,
    D: StreamDigest + Clone,
{
    async fn run(&mut self) -> Result<(), ChunkError> {
        self.config.validate()?;

        // Initializing
        let w = self.config.window_size();
        let mut window = [0u8; MAX_WINDOW_SIZE];
        let n = self.read_full(&mut window[..w]).await?;
        if let Some(chunk) = self.engine.seed(&window[..n])? {
            self.deliver(chunk).await?;
        }

        // Streaming
        if n == w {
            self.state = DriverState::Streaming;
            let mut block = vec![0u8; self.config.read_block_size()];
            loop {
                let filled = self.read(&mut block).await?;
                if filled == 0 {
                    break;
                }

                let mut pos = 0;
                while pos < filled {
                    let (used, chunk) = self.engine.feed(&block[pos..filled])?;
                    pos += used;
                    if let Some(chunk) = chunk {
                        self.deliver(chunk).await?;
                    }
                }
            }
        }

        // Flushing
        self.state = DriverState::Flushing;
        if let Some(chunk) = self.engine.finish() {
            self.deliver(chunk).await?;
        }
        enter_done(&mut self.state, &self.engine.stats());
        Ok(())
    }

    /// One read from the source, abandoned if the run is cancelled.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ChunkError> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ChunkError::Cancelled),
                res = self.reader.read(buf) => match res {
                    Ok(n) => return Ok(n),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                },
            }
        }
    }

    /// Reads until `buf` is full or the source ends.
    async fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, ChunkError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]).await? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }

    /// Hands a chunk to the consumer, waiting while the queue is full.
    async fn deliver(&mut self, chunk: ChunkInfo) -> Result<(), ChunkError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ChunkError::Cancelled),
            res = self.tx.send(chunk) => res.map_err(|_| ChunkError::Cancelled),
        }
    }
}
