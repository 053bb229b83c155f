#![no_main]

use std::io::Cursor;

use buzchunk::{ChunkConfig, Chunker, Sha512_256Digest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, u8, u16, Vec<u8>)| {
    let (window, bits, block, data) = input;

    let config = match ChunkConfig::new(window as usize % 64 + 1, bits as u32 % 16 + 1) {
        Ok(config) => config.with_read_block_size(block as usize % 4096 + 1),
        Err(_) => return,
    };
    let chunker = Chunker::new(config);

    let mut iter = chunker.chunk(Cursor::new(&data));
    let chunks: Vec<_> = iter
        .by_ref()
        .collect::<Result<_, _>>()
        .expect("in-memory reads never fail");

    // Verify: chunks are non-empty, contiguous and cover the input
    let mut next = 1u64;
    for chunk in &chunks {
        assert_eq!(chunk.offset, next);
        assert!(chunk.length >= 1);
        assert_eq!(
            chunk.hash,
            Sha512_256Digest::digest(chunk.slice(&data).unwrap())
        );
        next = chunk.next_offset();
    }
    assert_eq!(next - 1, data.len() as u64);
    assert_eq!(iter.stream_hash(), Sha512_256Digest::digest(&data));

    // Verify: the in-memory path agrees with the reader path
    assert_eq!(chunker.chunk_bytes(data.clone()).unwrap(), chunks);
});
