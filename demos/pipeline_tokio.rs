//! Background chunking with cancellation.
//!
//! The chunker runs on its own task and hands chunks over one at a time.
//! Press Ctrl-C to cancel the run.
//!
//! Run with:
//!     cargo run --example pipeline_tokio --features pipeline -- /path/to/file

use std::env;

use buzchunk::{ChunkConfig, ChunkError, spawn_chunker};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info,buzchunk=debug"))
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let file = tokio::fs::File::open(&path).await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let config = ChunkConfig::new(16, 12)?;
    let (mut chunks, errors) = spawn_chunker(file, config, cancel);

    let mut count = 0u64;
    while let Some(chunk) = chunks.recv().await {
        count += 1;
        info!(offset = chunk.offset, length = chunk.length, hash = %chunk.hash, "chunk");
    }

    match errors.wait().await {
        Ok(()) => println!("{} chunks", count),
        Err(ChunkError::Cancelled) => println!("cancelled after {} chunks", count),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
