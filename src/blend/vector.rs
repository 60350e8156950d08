//! Four-pixels-at-a-time blend onto RGBA8 rows.

use super::{Blend, alpha_floor};
use crate::Color;
use crate::layout::LaneLayout;
use crate::wide::{F32x4, LANES, Shuffle, U32x4, VECTOR_BYTES};

/// A [`Blend`] widened to lanes, with the source and destination layouts
/// broadcast once per draw.
pub(crate) struct LaneKernel {
    blend: Blend<F32x4>,
    scalar: Blend<f32>,
    src: &'static LaneLayout,
    src_unit: [F32x4; 4],
    dst_unit: [F32x4; 4],
}

impl LaneKernel {
    pub(crate) fn new(tint: Color, src: &'static LaneLayout) -> Self {
        let floor = alpha_floor(src);
        Self {
            blend: Blend::new(tint, floor),
            scalar: Blend::new(tint, floor),
            src,
            src_unit: src.to_unit.map(F32x4::splat),
            dst_unit: LaneLayout::rgba8().to_unit.map(F32x4::splat),
        }
    }

    /// Blend one row: `src` holds `n` packed source pixels, `dst` holds `n`
    /// RGBA8 pixels. Whole groups of [`LANES`] go through the vector kernel;
    /// the tail goes one pixel at a time through the same math.
    #[inline(always)]
    pub(crate) fn blend_row<S: Shuffle>(&self, shuffle: S, src: &[u8], dst: &mut [u8]) {
        let sbpp = self.src.bytes_per_pixel;
        let mut src_groups = src.chunks_exact(LANES * sbpp);
        let mut dst_groups = dst.chunks_exact_mut(VECTOR_BYTES);
        for (s, d) in (&mut src_groups).zip(&mut dst_groups) {
            self.blend_group(shuffle, s, d);
        }
        let tail_src = src_groups.remainder();
        let tail_dst = dst_groups.into_remainder();
        for (s, d) in tail_src.chunks_exact(sbpp).zip(tail_dst.chunks_exact_mut(4)) {
            self.scalar.pixel(self.src, s, d);
        }
    }

    #[inline(always)]
    fn blend_group<S: Shuffle>(&self, shuffle: S, src: &[u8], dst: &mut [u8]) {
        // Only the group's own bytes are copied in; nothing past the row is read.
        let mut src_bytes = [0u8; VECTOR_BYTES];
        src_bytes[..src.len()].copy_from_slice(src);
        let mut dst_bytes = [0u8; VECTOR_BYTES];
        dst_bytes.copy_from_slice(dst);

        let s = self.src.unpack_lanes(shuffle, &src_bytes).map(U32x4::to_f32);
        let d = LaneLayout::rgba8().unpack_lanes(shuffle, &dst_bytes).map(U32x4::to_f32);
        let [r, g, b, a] = self.blend.over(s, &self.src_unit, d, &self.dst_unit);

        let packed = r.round_to_u32()
            | g.round_to_u32().shl(8)
            | b.round_to_u32().shl(16)
            | a.round_to_u32().shl(24);
        dst.copy_from_slice(&packed.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;
    use crate::wide::PortableShuffle;

    fn pseudo_random(len: usize, seed: u32) -> alloc::vec::Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn groups_match_single_pixel_math() {
        let tint = Color::new(230, 190, 255, 200);
        for format in [
            PixelFormat::R8G8B8A8,
            PixelFormat::R8G8B8,
            PixelFormat::R5G6B5,
            PixelFormat::R5G5B5A1,
            PixelFormat::R4G4B4A4,
        ] {
            let layout = format.lane_layout().unwrap();
            let scalar = Blend::<f32>::new(tint, alpha_floor(layout));
            let kernel = LaneKernel::new(tint, layout);
            let n = 11;
            let src = pseudo_random(n * layout.bytes_per_pixel, 7);
            let dst = pseudo_random(n * 4, 99);

            let mut vectored = dst.clone();
            kernel.blend_row(PortableShuffle, &src, &mut vectored);

            let mut single = dst.clone();
            for (s, d) in src
                .chunks_exact(layout.bytes_per_pixel)
                .zip(single.chunks_exact_mut(4))
            {
                scalar.pixel(layout, s, d);
            }
            assert_eq!(vectored, single, "{format:?}");
        }
    }
}
