//! The ChunkInfo type - describes one content-defined chunk.

use std::fmt;
use std::ops::Range;

use super::ChunkHash;

/// Position, length and digest of one emitted chunk.
///
/// Offsets are 1-based: the first chunk of every stream starts at offset 1,
/// and each following chunk starts right where the previous one ended.
/// A `ChunkInfo` carries no data; consumers that need the bytes slice them
/// out of the original stream with [`ChunkInfo::byte_range`].
///
/// # Example
///
/// ```
/// use buzchunk::{ChunkHash, ChunkInfo};
///
/// let chunk = ChunkInfo {
///     offset: 1,
///     length: 5,
///     hash: ChunkHash::new([0u8; 32]),
/// };
///
/// assert_eq!(chunk.end(), 5);
/// assert_eq!(chunk.byte_range(), 0..5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkInfo {
    /// 1-based position of the chunk's first byte in the stream.
    pub offset: u64,

    /// Number of bytes in the chunk. Always at least 1.
    pub length: u64,

    /// Digest of exactly the chunk's bytes.
    pub hash: ChunkHash,
}

impl ChunkInfo {
    /// Returns the 1-based position of the chunk's last byte.
    pub fn end(&self) -> u64 {
        self.offset + self.length - 1
    }

    /// Returns the 1-based offset the next chunk will start at.
    pub fn next_offset(&self) -> u64 {
        self.offset + self.length
    }

    /// Returns the chunk's position as a 0-based, end-exclusive range.
    pub fn byte_range(&self) -> Range<u64> {
        self.offset - 1..self.offset - 1 + self.length
    }

    /// Returns the chunk's bytes from the full stream contents.
    ///
    /// Returns `None` if `stream` is too short to hold the chunk.
    pub fn slice<'a>(&self, stream: &'a [u8]) -> Option<&'a [u8]> {
        let range = self.byte_range();
        let start = usize::try_from(range.start).ok()?;
        let end = usize::try_from(range.end).ok()?;
        stream.get(start..end)
    }
}

impl fmt::Display for ChunkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}, {}", self.offset, self.end(), self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(offset: u64, length: u64) -> ChunkInfo {
        ChunkInfo {
            offset,
            length,
            hash: ChunkHash::new([0x11; 32]),
        }
    }

    #[test]
    fn test_positions() {
        let chunk = info(100, 5);
        assert_eq!(chunk.end(), 104);
        assert_eq!(chunk.next_offset(), 105);
        assert_eq!(chunk.byte_range(), 99..104);
    }

    #[test]
    fn test_single_byte() {
        let chunk = info(1, 1);
        assert_eq!(chunk.end(), 1);
        assert_eq!(chunk.byte_range(), 0..1);
    }

    #[test]
    fn test_slice() {
        let stream = b"hello world";
        assert_eq!(info(7, 5).slice(stream), Some(&b"world"[..]));
        assert_eq!(info(1, 5).slice(stream), Some(&b"hello"[..]));
        assert_eq!(info(8, 5).slice(stream), None);
    }

    #[test]
    fn test_display() {
        let s = info(1, 16).to_string();
        assert!(s.starts_with("1-16, 1111"));
    }
}
