//! Chunking engine and the synchronous driver.
//!
//! - [`ChunkEngine`] - Stateful CDC engine with `seed()`/`feed()`/`finish()` API
//! - [`Chunker`] - Configures and starts chunking runs
//! - [`ChunkIter`] - Lazy iterator driving a run over a [`std::io::Read`] source

mod engine;
mod iter;

pub use engine::{ChunkEngine, ChunkStats};
pub use iter::{ChunkIter, Chunker};

#[cfg(any(feature = "async-io", feature = "pipeline"))]
pub(crate) use engine::{DriverState, enter_done, enter_failed};
