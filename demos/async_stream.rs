//! Async streaming chunking example.
//!
//! Chunks a tokio file through the runtime-agnostic `ChunkStream`, bridged
//! with `tokio_util::compat`.
//!
//! Run with:
//!     cargo run --example async_stream --features async-io -- /path/to/file

use std::env;

use buzchunk::{ChunkConfig, chunk_async};
use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let file = tokio::fs::File::open(&path).await?;

    let config = ChunkConfig::new(16, 12)?;
    let mut stream = chunk_async(file.compat(), config);

    while let Some(chunk) = stream.next().await {
        println!("{}", chunk?);
    }

    let stats = stream.stats();
    println!("\nTotal: {} chunks, {} bytes", stats.chunks, stats.bytes);
    println!("Stream hash: {}", stream.stream_hash());

    Ok(())
}
