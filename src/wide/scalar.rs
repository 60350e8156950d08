use core::ops::{Add, BitAnd, BitOr, Div, Mul, Sub};

use super::{VECTOR_BYTES, round_half_even};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct F32x4([f32; 4]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct U32x4([u32; 4]);

impl F32x4 {
    #[inline(always)]
    pub(crate) fn splat(v: f32) -> Self {
        Self([v; 4])
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn from_array(a: [f32; 4]) -> Self {
        Self(a)
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn to_array(self) -> [f32; 4] {
        self.0
    }

    #[inline(always)]
    pub(crate) fn max(self, rhs: Self) -> Self {
        self.zip(rhs, f32::max)
    }

    #[inline(always)]
    pub(crate) fn min(self, rhs: Self) -> Self {
        self.zip(rhs, f32::min)
    }

    /// Round to nearest even and convert. Lanes must be in `[0, 2^23)`.
    #[inline(always)]
    pub(crate) fn round_to_u32(self) -> U32x4 {
        U32x4(self.0.map(|v| round_half_even(v) as u32))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let (a, b) = (self.0, rhs.0);
        Self([f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])])
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl Div for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl U32x4 {
    #[inline(always)]
    pub(crate) fn splat(v: u32) -> Self {
        Self([v; 4])
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn from_array(a: [u32; 4]) -> Self {
        Self(a)
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn to_array(self) -> [u32; 4] {
        self.0
    }

    #[inline(always)]
    pub(crate) fn from_le_bytes(b: &[u8; VECTOR_BYTES]) -> Self {
        Self(core::array::from_fn(|i| {
            u32::from_le_bytes([b[4 * i], b[4 * i + 1], b[4 * i + 2], b[4 * i + 3]])
        }))
    }

    #[inline(always)]
    pub(crate) fn to_le_bytes(self) -> [u8; VECTOR_BYTES] {
        let mut out = [0u8; VECTOR_BYTES];
        for (chunk, lane) in out.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }

    #[inline(always)]
    pub(crate) fn shr(self, n: u32) -> Self {
        Self(self.0.map(|v| v >> n))
    }

    #[inline(always)]
    pub(crate) fn shl(self, n: u32) -> Self {
        Self(self.0.map(|v| v << n))
    }

    #[inline(always)]
    pub(crate) fn to_f32(self) -> F32x4 {
        F32x4(self.0.map(|v| v as i32 as f32))
    }
}

impl BitAnd for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self([
            self.0[0] & rhs.0[0],
            self.0[1] & rhs.0[1],
            self.0[2] & rhs.0[2],
            self.0[3] & rhs.0[3],
        ])
    }
}

impl BitOr for U32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self([
            self.0[0] | rhs.0[0],
            self.0[1] | rhs.0[1],
            self.0[2] | rhs.0[2],
            self.0[3] | rhs.0[3],
        ])
    }
}
