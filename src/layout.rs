//! Per-format lane descriptors for the vectorized decode.
//!
//! A [`LaneLayout`] turns up to [`LANES`] packed source pixels into one
//! 32-bit word per pixel (byte shuffle), then extracts each channel with a
//! shift and mask and normalizes it with a per-channel coefficient.

use crate::pixel::PixelFormat;
use crate::wide::{LANES, Shuffle, U32x4, VECTOR_BYTES};

const INV_255: f32 = 1.0 / 255.0;
const INV_63: f32 = 1.0 / 63.0;
const INV_31: f32 = 1.0 / 31.0;
const INV_15: f32 = 1.0 / 15.0;

/// Static description of how a packed format decodes into RGBA lanes.
///
/// Arrays are indexed R, G, B, A. Channel `c` of a pixel word `w` is `((w >> shifts[c]) & masks[c]) as f32 * to_unit[c]`,
/// which lands in `[0, 1]`. A zero mask means the channel is absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneLayout {
    /// Packed size of one pixel.
    pub bytes_per_pixel: usize,
    /// `pshufb`-style pattern placing pixel `i` in 32-bit lane `i`.
    pub shuffle: [u8; VECTOR_BYTES],
    pub masks: [u32; 4],
    pub shifts: [u32; 4],
    /// Normalizing coefficient per channel (`1 / max`).
    pub to_unit: [f32; 4],
}

const fn shuffle_for(bytes_per_pixel: usize) -> [u8; VECTOR_BYTES] {
    let mut out = [0x80u8; VECTOR_BYTES];
    let mut lane = 0;
    while lane < LANES {
        let mut b = 0;
        while b < bytes_per_pixel {
            out[lane * 4 + b] = (lane * bytes_per_pixel + b) as u8;
            b += 1;
        }
        // 16-bit words are duplicated into the upper half; masks ignore it.
        if bytes_per_pixel == 2 {
            out[lane * 4 + 2] = (lane * 2) as u8;
            out[lane * 4 + 3] = (lane * 2 + 1) as u8;
        }
        lane += 1;
    }
    out
}

static RGBA8: LaneLayout = LaneLayout {
    bytes_per_pixel: 4,
    shuffle: shuffle_for(4),
    masks: [0xFF; 4],
    shifts: [0, 8, 16, 24],
    to_unit: [INV_255; 4],
};

static RGB8: LaneLayout = LaneLayout {
    bytes_per_pixel: 3,
    shuffle: shuffle_for(3),
    masks: [0xFF, 0xFF, 0xFF, 0],
    shifts: [0, 8, 16, 0],
    to_unit: [INV_255; 4],
};

static R5G6B5: LaneLayout = LaneLayout {
    bytes_per_pixel: 2,
    shuffle: shuffle_for(2),
    masks: [0x1F, 0x3F, 0x1F, 0],
    shifts: [11, 5, 0, 0],
    to_unit: [INV_31, INV_63, INV_31, INV_255],
};

static R5G5B5A1: LaneLayout = LaneLayout {
    bytes_per_pixel: 2,
    shuffle: shuffle_for(2),
    masks: [0x1F, 0x1F, 0x1F, 0x1],
    shifts: [11, 6, 1, 0],
    to_unit: [INV_31, INV_31, INV_31, 1.0],
};

static R4G4B4A4: LaneLayout = LaneLayout {
    bytes_per_pixel: 2,
    shuffle: shuffle_for(2),
    masks: [0xF; 4],
    shifts: [12, 8, 4, 0],
    to_unit: [INV_15; 4],
};

impl LaneLayout {
    /// Layout of the RGBA8 destination of a vectorized draw.
    pub fn rgba8() -> &'static LaneLayout {
        &RGBA8
    }

    /// Raw channel values of `LANES` packed pixels, one lane per pixel.
    ///
    /// `bytes` must hold the pixels packed at the front; trailing bytes are
    /// never selected by the shuffle.
    #[inline(always)]
    pub(crate) fn unpack_lanes<S: Shuffle>(&self, shuffle: S, bytes: &[u8; VECTOR_BYTES]) -> [U32x4; 4] {
        let words = shuffle.load_shuffled(bytes, &self.shuffle);
        core::array::from_fn(|c| words.shr(self.shifts[c]) & U32x4::splat(self.masks[c]))
    }

    /// Raw channel values of a single packed pixel.
    ///
    /// Produces the same integers as [`unpack_lanes`](Self::unpack_lanes)
    /// does for the corresponding lane.
    #[inline(always)]
    pub(crate) fn unpack_one(&self, pixel: &[u8]) -> [u32; 4] {
        let mut word = [0u8; 4];
        word[..self.bytes_per_pixel].copy_from_slice(&pixel[..self.bytes_per_pixel]);
        let word = u32::from_le_bytes(word);
        core::array::from_fn(|c| (word >> self.shifts[c]) & self.masks[c])
    }
}

impl PixelFormat {
    /// Lane descriptor for formats the vectorized draw can read.
    ///
    /// `None` for every other format; those draw through the scalar paths.
    pub fn lane_layout(&self) -> Option<&'static LaneLayout> {
        match self {
            Self::R8G8B8A8 => Some(&RGBA8),
            Self::R8G8B8 => Some(&RGB8),
            Self::R5G6B5 => Some(&R5G6B5),
            Self::R5G5B5A1 => Some(&R5G5B5A1),
            Self::R4G4B4A4 => Some(&R4G4B4A4),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wide::PortableShuffle;

    #[test]
    fn shuffles_place_one_pixel_per_lane() {
        assert_eq!(RGBA8.shuffle, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        assert_eq!(
            RGB8.shuffle,
            [0, 1, 2, 0x80, 3, 4, 5, 0x80, 6, 7, 8, 0x80, 9, 10, 11, 0x80]
        );
        assert_eq!(R5G6B5.shuffle, [0, 1, 0, 1, 2, 3, 2, 3, 4, 5, 4, 5, 6, 7, 6, 7]);
    }

    #[test]
    fn rgb565_unpacks_little_endian_words() {
        // pure red: 0b11111_000000_00000
        let px = 0xF800u16.to_le_bytes();
        assert_eq!(R5G6B5.unpack_one(&px), [31, 0, 0, 0]);
        let px = 0x07E0u16.to_le_bytes();
        assert_eq!(R5G6B5.unpack_one(&px), [0, 63, 0, 0]);
    }

    #[test]
    fn lane_and_single_unpack_agree() {
        for format in [
            PixelFormat::R8G8B8A8,
            PixelFormat::R8G8B8,
            PixelFormat::R5G6B5,
            PixelFormat::R5G5B5A1,
            PixelFormat::R4G4B4A4,
        ] {
            let layout = format.lane_layout().unwrap();
            let mut bytes = [0u8; VECTOR_BYTES];
            let packed = LANES * layout.bytes_per_pixel;
            for (i, b) in bytes[..packed].iter_mut().enumerate() {
                *b = (i as u8).wrapping_mul(37).wrapping_add(11);
            }
            let lanes = layout.unpack_lanes(PortableShuffle, &bytes);
            for px in 0..LANES {
                let bpp = layout.bytes_per_pixel;
                let one = layout.unpack_one(&bytes[px * bpp..(px + 1) * bpp]);
                for c in 0..4 {
                    assert_eq!(lanes[c].to_array()[px], one[c], "{format:?} px {px} ch {c}");
                }
            }
        }
    }

    #[test]
    fn float_formats_have_no_layout() {
        assert!(PixelFormat::R32G32B32A32.lane_layout().is_none());
        assert!(PixelFormat::Grayscale.lane_layout().is_none());
        assert!(PixelFormat::Dxt1Rgb.lane_layout().is_none());
    }
}
