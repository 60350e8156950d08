#![allow(unsafe_code)]
// Register-only intrinsics are safe to call when the target feature is
// enabled crate-wide, which makes some of these blocks redundant.
#![allow(unused_unsafe)]

use archmage::prelude::X64V3Token;
use core::arch::x86_64::*;
use core::ops::{Add, BitAnd, BitOr, Div, Mul, Sub};

use super::{Shuffle, VECTOR_BYTES};

#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub(crate) struct F32x4(__m128);

#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub(crate) struct U32x4(__m128i);

impl F32x4 {
    #[inline(always)]
    pub(crate) fn splat(v: f32) -> Self {
        Self(unsafe { _mm_set1_ps(v) })
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn from_array(a: [f32; 4]) -> Self {
        Self(unsafe { _mm_setr_ps(a[0], a[1], a[2], a[3]) })
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        // SAFETY: `out` is 16 writable bytes; unaligned store.
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    pub(crate) fn max(self, rhs: Self) -> Self {
        Self(unsafe { _mm_max_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    pub(crate) fn min(self, rhs: Self) -> Self {
        Self(unsafe { _mm_min_ps(self.0, rhs.0) })
    }

    /// Round to nearest even and convert. Lanes must be within `i32` range.
    #[inline(always)]
    pub(crate) fn round_to_u32(self) -> U32x4 {
        U32x4(unsafe { _mm_cvtps_epi32(self.0) })
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_ps(self.0, rhs.0) })
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_ps(self.0, rhs.0) })
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm_mul_ps(self.0, rhs.0) })
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(unsafe { _mm_div_ps(self.0, rhs.0) })
    }
}

impl U32x4 {
    #[inline(always)]
    pub(crate) fn splat(v: u32) -> Self {
        Self(unsafe { _mm_set1_epi32(v as i32) })
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn from_array(a: [u32; 4]) -> Self {
        Self(unsafe { _mm_setr_epi32(a[0] as i32, a[1] as i32, a[2] as i32, a[3] as i32) })
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn to_array(self) -> [u32; 4] {
        let b = self.to_le_bytes();
        core::array::from_fn(|i| u32::from_le_bytes([b[4 * i], b[4 * i + 1], b[4 * i + 2], b[4 * i + 3]]))
    }

    #[inline(always)]
    pub(crate) fn from_le_bytes(bytes: &[u8; VECTOR_BYTES]) -> Self {
        // SAFETY: `bytes` is exactly 16 readable bytes; unaligned load.
        Self(unsafe { _mm_loadu_si128(bytes.as_ptr().cast()) })
    }

    #[inline(always)]
    pub(crate) fn to_le_bytes(self) -> [u8; VECTOR_BYTES] {
        let mut out = [0u8; VECTOR_BYTES];
        // SAFETY: `out` is exactly 16 writable bytes; unaligned store.
        unsafe { _mm_storeu_si128(out.as_mut_ptr().cast(), self.0) };
        out
    }

    #[inline(always)]
    pub(crate) fn shr(self, n: u32) -> Self {
        Self(unsafe { _mm_srl_epi32(self.0, _mm_cvtsi32_si128(n as i32)) })
    }

    #[inline(always)]
    pub(crate) fn shl(self, n: u32) -> Self {
        Self(unsafe { _mm_sll_epi32(self.0, _mm_cvtsi32_si128(n as i32)) })
    }

    /// Signed conversion; lanes hold small channel values.
    #[inline(always)]
    pub(crate) fn to_f32(self) -> F32x4 {
        F32x4(unsafe { _mm_cvtepi32_ps(self.0) })
    }
}

impl BitAnd for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_si128(self.0, rhs.0) })
    }
}

impl BitOr for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_si128(self.0, rhs.0) })
    }
}

/// Hardware `pshufb`. Only constructible from a token proving the CPU has
/// the x86-64-v3 feature set, which includes SSSE3.
#[derive(Clone, Copy)]
pub(crate) struct Pshufb(#[allow(dead_code)] X64V3Token);

impl Pshufb {
    #[inline(always)]
    pub(crate) fn new(token: X64V3Token) -> Self {
        Self(token)
    }
}

impl Shuffle for Pshufb {
    #[inline(always)]
    fn load_shuffled(self, bytes: &[u8; VECTOR_BYTES], pattern: &[u8; VECTOR_BYTES]) -> U32x4 {
        // SAFETY: a `Pshufb` exists only after runtime detection of SSSE3
        // (via the token); both arrays are exactly 16 readable bytes.
        unsafe {
            let v = _mm_loadu_si128(bytes.as_ptr().cast());
            let p = _mm_loadu_si128(pattern.as_ptr().cast());
            U32x4(_mm_shuffle_epi8(v, p))
        }
    }
}
