//! Fixed-width 4 x 32-bit lane vectors.
//!
//! The blend math is written against [`F32x4`] / [`U32x4`]. With the `simd`
//! feature on x86_64 they wrap SSE2 registers; everywhere else they are plain
//! `[_; 4]` arrays and every operation is unrolled per lane. Both backings
//! perform the same IEEE single-precision operations, so results are
//! bit-identical.
//!
//! Unpacking pixels into lanes goes through a [`Shuffle`]. The vector rows
//! are dispatched once per draw: `pshufb` when the CPU reports the x86-64-v3
//! tier at runtime, the portable byte loop otherwise.

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod sse2;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) use sse2::{F32x4, Pshufb, U32x4};

#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
mod scalar;
#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
pub(crate) use scalar::{F32x4, U32x4};

/// Pixels processed per vector operation.
pub const LANES: usize = 4;

/// Width of one vector register in bytes.
pub(crate) const VECTOR_BYTES: usize = LANES * 4;

/// Round to nearest, ties to even, for `0.0 <= v < 2^23`.
///
/// Matches `cvtps2dq` under the default rounding mode.
#[inline(always)]
pub(crate) fn round_half_even(v: f32) -> f32 {
    const MAGIC: f32 = 8_388_608.0;
    (v + MAGIC) - MAGIC
}

/// Byte shuffle with `pshufb` semantics: an index with the high bit set
/// yields zero, otherwise its low four bits select a source byte.
#[inline(always)]
pub(crate) fn shuffle_bytes(bytes: &[u8; VECTOR_BYTES], pattern: &[u8; VECTOR_BYTES]) -> [u8; VECTOR_BYTES] {
    let mut out = [0u8; VECTOR_BYTES];
    for (o, &idx) in out.iter_mut().zip(pattern) {
        if idx & 0x80 == 0 {
            *o = bytes[(idx & 0x0F) as usize];
        }
    }
    out
}

/// Loads 16 bytes into lanes, rearranged per a `pshufb` pattern.
pub(crate) trait Shuffle: Copy {
    fn load_shuffled(self, bytes: &[u8; VECTOR_BYTES], pattern: &[u8; VECTOR_BYTES]) -> U32x4;
}

/// [`shuffle_bytes`] followed by a plain load.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PortableShuffle;

impl Shuffle for PortableShuffle {
    #[inline(always)]
    fn load_shuffled(self, bytes: &[u8; VECTOR_BYTES], pattern: &[u8; VECTOR_BYTES]) -> U32x4 {
        U32x4::from_le_bytes(&shuffle_bytes(bytes, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_ties_to_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(127.49), 127.0);
        assert_eq!(round_half_even(254.5), 254.0);
        assert_eq!(round_half_even(255.0), 255.0);
    }

    #[test]
    fn shuffle_zeroes_high_bit_indices() {
        let bytes: [u8; 16] = core::array::from_fn(|i| i as u8 + 1);
        let mut pattern = [0x80u8; 16];
        pattern[0] = 2;
        pattern[5] = 15;
        let out = shuffle_bytes(&bytes, &pattern);
        assert_eq!(out[0], 3);
        assert_eq!(out[5], 16);
        assert_eq!(out[1], 0);
    }

    #[test]
    fn lane_roundtrip_and_shifts() {
        let v = U32x4::from_array([0x1234_5678, 0xFF00_FF00, 1, 0]);
        assert_eq!(v.to_array(), [0x1234_5678, 0xFF00_FF00, 1, 0]);
        let hi = (v.shr(16) & U32x4::splat(0xFF)).to_array();
        assert_eq!(hi, [0x34, 0x00, 0, 0]);
        let packed = (U32x4::splat(0xAB).shl(8) | U32x4::splat(0xCD)).to_array();
        assert_eq!(packed, [0xABCD; 4]);
    }

    #[test]
    fn portable_load_matches_byte_shuffle() {
        let bytes: [u8; 16] = core::array::from_fn(|i| (i * 17) as u8);
        let pattern = [0, 1, 2, 0x80, 3, 4, 5, 0x80, 6, 7, 8, 0x80, 9, 10, 11, 0x80];
        let lanes = PortableShuffle.load_shuffled(&bytes, &pattern).to_le_bytes();
        assert_eq!(lanes, shuffle_bytes(&bytes, &pattern));
    }

    #[test]
    fn float_ops_and_rounding() {
        let a = F32x4::from_array([1.0, 2.0, 3.0, 4.0]);
        let b = F32x4::splat(2.0);
        assert_eq!((a * b).to_array(), [2.0, 4.0, 6.0, 8.0]);
        assert_eq!((a - b).max(F32x4::splat(0.0)).to_array(), [0.0, 0.0, 1.0, 2.0]);
        assert_eq!((a / b).min(F32x4::splat(1.5)).to_array(), [0.5, 1.0, 1.5, 1.5]);
        let r = F32x4::from_array([0.5, 1.5, 2.5, 254.6]).round_to_u32();
        assert_eq!(r.to_array(), [0, 2, 2, 255]);
        let f = U32x4::from_array([0, 31, 63, 255]).to_f32();
        assert_eq!(f.to_array(), [0.0, 31.0, 63.0, 255.0]);
    }
}
