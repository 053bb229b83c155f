//! Pull-based chunking over `futures_io::AsyncRead`.
//!
//! Same contract as the sync iterator, polled instead of called: a chunk is
//! only searched for while the consumer is polling, and any executor that
//! can drive a `futures_io` reader works.
//!
//! Requires the `async-io` feature.

mod stream;

pub use stream::{ChunkStream, chunk_async};
