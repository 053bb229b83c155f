//! buzchunk
//!
//! Streaming Content-Defined Chunking (CDC) for Rust.
//!
//! `buzchunk` splits a byte stream into variable-length chunks at positions
//! chosen by the content itself: a buzhash rolling window slides over the
//! stream and a cut is made wherever its low bits are all zero. For every
//! chunk it reports a 1-based offset, a length and a digest of the chunk's
//! bytes, so that a local edit only changes the chunks near it.
//!
//! The crate intentionally:
//! - does NOT manage files or paths
//! - does NOT persist chunks or index them by digest
//! - does NOT resume interrupted runs
//!
//! It only does one thing: **Read bytes → yield (offset, length, digest)**
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use buzchunk::{Chunker, ChunkConfig, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let file = File::open("data.bin")?;
//!     let chunker = Chunker::new(ChunkConfig::default());
//!
//!     for chunk in chunker.chunk(file) {
//!         let chunk = chunk?;
//!         println!("{}-{}, {}", chunk.offset, chunk.end(), chunk.hash);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use buzchunk::{chunk_async, ChunkConfig};
//!
//! let mut stream = chunk_async(reader, ChunkConfig::default());
//! while let Some(chunk) = stream.next().await {
//!     let chunk = chunk?;
//! }
//! ```
//!
//! # Background producer (feature = "pipeline")
//!
//! ```ignore
//! use buzchunk::{spawn_chunker, ChunkConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let (mut chunks, errors) = spawn_chunker(reader, ChunkConfig::default(), CancellationToken::new());
//! while let Some(chunk) = chunks.recv().await {
//!     // ...
//! }
//! errors.wait().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cdc;
mod chunk;
mod chunker;
mod config;
mod error;
mod hash;

#[cfg(feature = "async-io")]
mod async_stream;

#[cfg(feature = "pipeline")]
mod pipeline;

//
// Public surface
//

pub use cdc::{BoundaryDetector, Buzhash64, RollingHash};
pub use chunk::{ChunkHash, ChunkInfo};
pub use chunker::{ChunkEngine, ChunkIter, ChunkStats, Chunker};
pub use config::{
    ChunkConfig, DEFAULT_BOUNDARY_BITS, DEFAULT_READ_BLOCK_SIZE, DEFAULT_WINDOW_SIZE,
    MAX_WINDOW_SIZE,
};
pub use error::ChunkError;
#[cfg(feature = "hash-blake3")]
pub use hash::Blake3Digest;
pub use hash::{Sha512_256Digest, StreamDigest};

#[cfg(feature = "async-io")]
pub use async_stream::{ChunkStream, chunk_async};

#[cfg(feature = "pipeline")]
pub use pipeline::{ErrorSlot, spawn_chunker, spawn_chunker_with};
