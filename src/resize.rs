use alloc::vec::Vec;

use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::Limits;

/// The part of a scaled image a resampler has to produce.
///
/// The full result would be `scaled_width` x `scaled_height`; only the
/// `width` x `height` window at (`x`, `y`) of it is built. A draw onto a
/// small bitmap through a huge destination rectangle therefore allocates
/// no more than the visible pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleWindow {
    pub scaled_width: u64,
    pub scaled_height: u64,
    pub x: u64,
    pub y: u64,
    pub width: u32,
    pub height: u32,
}

impl ScaleWindow {
    /// The whole `width` x `height` result.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            scaled_width: u64::from(width),
            scaled_height: u64::from(height),
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Scales a bitmap, keeping its pixel format.
///
/// A draw whose source and destination rectangles differ in size resamples
/// the clipped source through this seam before blending. The returned
/// bitmap is `window.width` x `window.height`.
pub trait Resampler {
    fn resize(
        &self,
        source: &Bitmap,
        window: ScaleWindow,
        limits: &Limits,
    ) -> Result<Bitmap, BitmapError>;
}

/// Nearest-neighbor scaling by whole-pixel byte copies.
///
/// Works for every uncompressed format since no channel is decoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

/// Source index of scaled coordinate `at`, clamped to the last source pixel.
fn nearest(at: u64, source_len: u32, scaled_len: u64) -> usize {
    let i = u128::from(at) * u128::from(source_len) / u128::from(scaled_len.max(1));
    i.min(u128::from(source_len.saturating_sub(1))) as usize
}

impl Resampler for NearestNeighbor {
    fn resize(
        &self,
        source: &Bitmap,
        window: ScaleWindow,
        limits: &Limits,
    ) -> Result<Bitmap, BitmapError> {
        let format = source.format();
        if format.is_compressed() {
            return Err(BitmapError::UnsupportedFormat(format));
        }
        let (width, height) = (window.width, window.height);
        let size = format
            .data_size(width, height)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        limits.check_allocation(width, height, size)?;
        if source.is_empty() || size == 0 {
            return Bitmap::new(width, height, format);
        }

        let bpp = format.bytes_per_pixel();
        let columns: Vec<usize> = (0..u64::from(width))
            .map(|i| nearest(window.x + i, source.width(), window.scaled_width))
            .collect();

        let mut data = Vec::with_capacity(size);
        for j in 0..u64::from(height) {
            let sy = nearest(window.y + j, source.height(), window.scaled_height);
            let row = source.span(0, sy, source.width() as usize);
            for &sx in &columns {
                data.extend_from_slice(&row[sx * bpp..(sx + 1) * bpp]);
            }
        }
        Bitmap::from_vec(data, width, height, format)
    }
}
