//! Boundary predicate over the rolling-hash state.

use super::RollingHash;

/// Decides whether the current rolling state is a chunk cut point.
///
/// A cut point is declared when the low `bits` bits of the rolling state are
/// all zero. With the default 24 bits this is exactly "bytes 5, 6 and 7 of
/// the big-endian snapshot are zero", and for uniformly distributed state the
/// gap between cut points is geometric with mean `2^bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryDetector {
    mask: u64,
}

impl BoundaryDetector {
    /// Creates a detector requiring `bits` low zero bits (clamped to 1..=63).
    pub fn new(bits: u32) -> Self {
        let bits = bits.clamp(1, 63);
        Self {
            mask: (1u64 << bits) - 1,
        }
    }

    /// Returns true if `roller` currently sits on a chunk boundary.
    #[inline]
    pub fn is_boundary<H: RollingHash + ?Sized>(&self, roller: &H) -> bool {
        roller.sum64() & self.mask == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkError;

    struct Fixed(u64);

    impl RollingHash for Fixed {
        fn seed(&mut self, _window: &[u8]) -> Result<(), ChunkError> {
            Ok(())
        }
        fn roll(&mut self, _byte: u8) -> Result<(), ChunkError> {
            Ok(())
        }
        fn sum64(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_low_bytes_zero() {
        let detector = BoundaryDetector::new(24);
        assert!(detector.is_boundary(&Fixed(0xdead_beef_ff00_0000)));
        assert!(detector.is_boundary(&Fixed(0)));
        assert!(!detector.is_boundary(&Fixed(0xdead_beef_ff00_0001)));
        assert!(!detector.is_boundary(&Fixed(0x0000_0000_0080_0000)));
    }

    #[test]
    fn test_matches_snapshot_bytes() {
        let detector = BoundaryDetector::new(24);
        for value in [0u64, 1, 0xff_ffff, 0x0100_0000, 0xabcd_ef00_0000_0000, u64::MAX] {
            let s = Fixed(value).snapshot();
            let by_bytes = s[5] == 0 && s[6] == 0 && s[7] == 0;
            assert_eq!(detector.is_boundary(&Fixed(value)), by_bytes, "{:#x}", value);
        }
    }

    #[test]
    fn test_bits_clamped() {
        // 0 behaves as 1: only the lowest bit matters.
        let one = BoundaryDetector::new(0);
        assert!(one.is_boundary(&Fixed(2)));
        assert!(!one.is_boundary(&Fixed(1)));

        // 64 behaves as 63: the top bit is never tested.
        let wide = BoundaryDetector::new(64);
        assert!(wide.is_boundary(&Fixed(1 << 63)));
        assert!(!wide.is_boundary(&Fixed(1 << 62)));

        assert!(BoundaryDetector::new(8).is_boundary(&Fixed(0x100)));
    }
}
