//! File chunking example.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/file [boundary_bits]
//!
//! Set `RUST_LOG=buzchunk=debug` to see the run summary.

use std::env;
use std::fs::File;

use buzchunk::{ChunkConfig, Chunker, DEFAULT_BOUNDARY_BITS, DEFAULT_WINDOW_SIZE};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "Cargo.toml".to_string());
    let bits = match args.next() {
        Some(bits) => bits.parse()?,
        None => DEFAULT_BOUNDARY_BITS,
    };

    let file = File::open(&path)?;
    println!("Chunking file: {} ({} bytes)\n", path, file.metadata()?.len());

    let config = ChunkConfig::new(DEFAULT_WINDOW_SIZE, bits)?.with_read_block_size(64 * 1024);
    let mut iter = Chunker::new(config).chunk(file);

    for chunk in iter.by_ref() {
        println!("{}", chunk?);
    }

    let stats = iter.stats();
    println!("\nTotal: {} chunks, {} bytes", stats.chunks, stats.bytes);
    if let Some(mean) = stats.mean_chunk_len() {
        println!(
            "Mean chunk length: {:.0} bytes (expected about {})",
            mean,
            config.expected_chunk_len()
        );
    }
    println!("Stream hash: {}", iter.stream_hash());

    Ok(())
}
