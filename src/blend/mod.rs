//! Tinted source-over compositing in normalized float space.
//!
//! One generic kernel, [`Blend::over`], serves both the single-pixel paths
//! (`f32`) and the 4-lane path ([`F32x4`]). Every pixel goes through the same
//! IEEE operations in the same order regardless of path, so a vectorized draw
//! and a scalar draw of the same input produce identical bytes.

pub(crate) mod vector;

use core::ops::{Add, Mul, Sub};

use crate::Color;
use crate::layout::LaneLayout;
use crate::wide::{F32x4, round_half_even};

const INV_255: f32 = 1.0 / 255.0;

/// Arithmetic the blend kernel needs from a scalar or a lane vector.
pub(crate) trait Lane: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> {
    fn splat(v: f32) -> Self;
    fn max(self, rhs: Self) -> Self;
    fn min(self, rhs: Self) -> Self;
    fn recip(self) -> Self;
}

impl Lane for f32 {
    #[inline(always)]
    fn splat(v: f32) -> Self {
        v
    }
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        f32::max(self, rhs)
    }
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        f32::min(self, rhs)
    }
    #[inline(always)]
    fn recip(self) -> Self {
        1.0 / self
    }
}

impl Lane for F32x4 {
    #[inline(always)]
    fn splat(v: f32) -> Self {
        F32x4::splat(v)
    }
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        F32x4::max(self, rhs)
    }
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        F32x4::min(self, rhs)
    }
    #[inline(always)]
    fn recip(self) -> Self {
        F32x4::splat(1.0) / self
    }
}

/// Per-channel values, R G B A.
pub(crate) type Channels<T> = [T; 4];

/// Tint and alpha floor prepared once per draw.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Blend<T> {
    tint: Channels<T>,
    /// Lower bound for the raw source alpha, in source units.
    alpha_floor: T,
}

impl<T: Lane> Blend<T> {
    /// `alpha_floor` is the raw minimum source alpha: the format's alpha
    /// maximum when it has no alpha channel (so it reads opaque), else 0.
    pub(crate) fn new(tint: Color, alpha_floor: f32) -> Self {
        Self {
            tint: [tint.r, tint.g, tint.b, tint.a].map(|c| T::splat(f32::from(c) * INV_255)),
            alpha_floor: T::splat(alpha_floor),
        }
    }

    /// Composite a tinted source over the destination.
    ///
    /// Inputs are raw channel values with their normalizing coefficients.
    /// Returns straight-alpha results scaled and clamped to `[0, 255]`, not
    /// yet rounded. A fully transparent result is transparent black.
    #[inline(always)]
    pub(crate) fn over(
        &self,
        src: Channels<T>,
        src_unit: &Channels<T>,
        dst: Channels<T>,
        dst_unit: &Channels<T>,
    ) -> Channels<T> {
        let zero = T::splat(0.0);
        let one = T::splat(1.0);
        let full = T::splat(255.0);

        let src_a_raw = src[3].max(self.alpha_floor);
        let sr = src[0] * src_unit[0] * self.tint[0];
        let sg = src[1] * src_unit[1] * self.tint[1];
        let sb = src[2] * src_unit[2] * self.tint[2];
        let sa = src_a_raw * src_unit[3] * self.tint[3];

        let dr = dst[0] * dst_unit[0];
        let dg = dst[1] * dst_unit[1];
        let db = dst[2] * dst_unit[2];
        let da = dst[3] * dst_unit[3];

        let inv_sa = one - sa;
        let dst_weight = da * inv_sa;
        let out_a = sa + dst_weight;
        let inv_out_a = out_a.max(T::splat(f32::MIN_POSITIVE)).recip();

        let channel = |s: T, d: T| (s * sa + d * dst_weight) * inv_out_a;
        let clamp = |v: T| (v * full).max(zero).min(full);
        [
            clamp(channel(sr, dr)),
            clamp(channel(sg, dg)),
            clamp(channel(sb, db)),
            clamp(out_a),
        ]
    }
}

/// Raw alpha value that makes a source in this layout read opaque when the
/// format has no alpha channel.
pub(crate) fn alpha_floor(layout: &LaneLayout) -> f32 {
    if layout.masks[3] == 0 {
        // The alpha coefficient maps 255 to 1.0 for alpha-less layouts.
        255.0
    } else {
        0.0
    }
}

#[inline(always)]
fn to_u8(v: f32) -> u8 {
    round_half_even(v) as u8
}

impl Blend<f32> {
    /// Blend two RGBA8 colors.
    #[inline]
    pub(crate) fn colors(&self, src: Color, dst: Color) -> Color {
        let unit = [INV_255; 4];
        let to_f = |c: Color| [c.r, c.g, c.b, c.a].map(f32::from);
        let [r, g, b, a] = self.over(to_f(src), &unit, to_f(dst), &unit);
        Color::new(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    /// Blend one packed source pixel described by `layout` over one RGBA8
    /// destination pixel in place.
    #[inline]
    pub(crate) fn pixel(&self, layout: &LaneLayout, src: &[u8], dst: &mut [u8]) {
        let rgba = LaneLayout::rgba8();
        let s = layout.unpack_one(src).map(|v| v as f32);
        let d = rgba.unpack_one(dst).map(|v| v as f32);
        let out = self.over(s, &layout.to_unit, d, &rgba.to_unit);
        dst[..4].copy_from_slice(&out.map(to_u8));
    }
}

/// Blend packed RGBA8 `src` over `dst` with `tint`.
///
/// Pixels are `r | g << 8 | b << 16 | a << 24`. `alpha_floor` is the minimum
/// source alpha (255 treats the source as opaque). The result uses the same
/// arithmetic as every bulk draw path.
pub fn blend_pixel(src: u32, dst: u32, tint: Color, alpha_floor: u8) -> u32 {
    let blend = Blend::<f32>::new(tint, f32::from(alpha_floor));
    let mut out = dst.to_le_bytes();
    blend.pixel(LaneLayout::rgba8(), &src.to_le_bytes(), &mut out);
    u32::from_le_bytes(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(255, 255, 255, 255);

    fn pack(c: Color) -> u32 {
        u32::from_le_bytes([c.r, c.g, c.b, c.a])
    }

    #[test]
    fn opaque_source_replaces_destination() {
        let src = pack(Color::new(10, 200, 30, 255));
        let dst = pack(Color::new(99, 99, 99, 255));
        assert_eq!(blend_pixel(src, dst, WHITE, 0), src);
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let dst = pack(Color::new(12, 34, 56, 255));
        assert_eq!(blend_pixel(pack(Color::new(255, 0, 0, 0)), dst, WHITE, 0), dst);
    }

    #[test]
    fn half_alpha_over_opaque() {
        let out = blend_pixel(
            pack(Color::new(255, 0, 0, 128)),
            pack(Color::new(0, 0, 255, 255)),
            WHITE,
            0,
        );
        let [r, g, b, a] = out.to_le_bytes();
        assert!((r as i32 - 128).abs() <= 1, "r={r}");
        assert_eq!(g, 0);
        assert!((b as i32 - 127).abs() <= 1, "b={b}");
        assert_eq!(a, 255);
    }

    #[test]
    fn both_transparent_is_transparent_black() {
        let out = blend_pixel(
            pack(Color::new(200, 100, 50, 0)),
            pack(Color::new(10, 20, 30, 0)),
            WHITE,
            0,
        );
        assert_eq!(out, 0);
    }

    #[test]
    fn alpha_floor_forces_opaque() {
        let src = pack(Color::new(40, 50, 60, 0));
        let out = blend_pixel(src, pack(Color::new(1, 2, 3, 255)), WHITE, 255);
        assert_eq!(out, pack(Color::new(40, 50, 60, 255)));
    }

    #[test]
    fn tint_modulates_source() {
        let out = blend_pixel(
            pack(Color::new(255, 255, 255, 255)),
            pack(Color::new(0, 0, 0, 255)),
            Color::new(255, 0, 128, 255),
            0,
        );
        assert_eq!(out.to_le_bytes(), [255, 0, 128, 255]);
    }

    #[test]
    fn color_and_packed_entry_points_agree() {
        let blend = Blend::<f32>::new(Color::new(200, 180, 160, 140), 0.0);
        let src = Color::new(90, 80, 70, 60);
        let dst = Color::new(15, 25, 35, 45);
        let via_color = blend.colors(src, dst);
        let via_packed = blend_pixel(pack(src), pack(dst), Color::new(200, 180, 160, 140), 0);
        assert_eq!(pack(via_color), via_packed);
    }
}
