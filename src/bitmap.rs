use alloc::vec;
use alloc::vec::Vec;

use crate::access::{read_color, write_color};
use crate::error::BitmapError;
use crate::pixel::PixelFormat;
use crate::{Color, Limits};

/// An owned image buffer: dimensions, format and tightly packed pixel rows.
///
/// Only the base mipmap level is addressed by drawing and filling; the
/// mipmap count is carried so callers can be warned when it is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    mipmaps: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zeroed `width` x `height` bitmap.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, BitmapError> {
        let size = format
            .data_size(width, height)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            mipmaps: 1,
            format,
            data: vec![0u8; size],
        })
    }

    /// Wrap existing pixel data.
    ///
    /// `data` must hold at least one full base level; extra bytes (further
    /// mipmap levels) are kept as-is.
    pub fn from_vec(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, BitmapError> {
        let needed = format
            .data_size(width, height)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        if data.len() < needed {
            return Err(BitmapError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mipmaps: 1,
            format,
            data,
        })
    }

    /// Record the number of mipmap levels stored after the base level.
    pub fn with_mipmaps(mut self, mipmaps: u32) -> Self {
        self.mipmaps = mipmaps.max(1);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mipmaps(&self) -> u32 {
        self.mipmaps
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row stride in bytes of the base level.
    pub fn stride(&self) -> usize {
        self.format.stride(self.width)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// True for zero-sized bitmaps, which every operation ignores.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Color of the pixel at (`x`, `y`), or `None` if out of bounds or compressed.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height || self.format.is_compressed() {
            return None;
        }
        Some(read_color(self.span(x as usize, y as usize, 1), self.format))
    }

    /// Overwrite one pixel. Out-of-bounds writes and compressed bitmaps are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height || self.format.is_compressed() {
            return;
        }
        let format = self.format;
        write_color(self.span_mut(x as usize, y as usize, 1), format, color);
    }

    /// Copy out the `width` x `height` region at (`x`, `y`) as a new bitmap.
    pub fn sub_image(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        limits: &Limits,
    ) -> Result<Bitmap, BitmapError> {
        if self.format.is_compressed() {
            return Err(BitmapError::UnsupportedFormat(self.format));
        }
        let fits = |start: u32, len: u32, bound: u32| start.checked_add(len).is_some_and(|end| end <= bound);
        if !fits(x, width, self.width) || !fits(y, height, self.height) {
            return Err(BitmapError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                bounds_width: self.width,
                bounds_height: self.height,
            });
        }
        let size = self
            .format
            .data_size(width, height)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        limits.check_allocation(width, height, size)?;

        let mut data = Vec::with_capacity(size);
        for row in 0..height as usize {
            data.extend_from_slice(self.span(x as usize, y as usize + row, width as usize));
        }
        Bitmap::from_vec(data, width, height, self.format)
    }

    /// Bytes of `len` pixels starting at (`x`, `y`) in the base level.
    #[inline]
    pub(crate) fn span(&self, x: usize, y: usize, len: usize) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        let start = y * self.stride() + x * bpp;
        debug_assert!(x + len <= self.width as usize && y < self.height as usize);
        &self.data[start..start + len * bpp]
    }

    #[inline]
    pub(crate) fn span_mut(&mut self, x: usize, y: usize, len: usize) -> &mut [u8] {
        let bpp = self.format.bytes_per_pixel();
        let start = y * self.stride() + x * bpp;
        debug_assert!(x + len <= self.width as usize && y < self.height as usize);
        &mut self.data[start..start + len * bpp]
    }
}

#[cfg(feature = "imgref")]
impl Bitmap {
    /// Borrow an RGBA8 bitmap's base level as an [`imgref::ImgRef`].
    pub fn as_imgref(&self) -> Result<imgref::ImgRef<'_, rgb::RGBA8>, BitmapError> {
        use rgb::AsPixels as _;
        if self.format != PixelFormat::R8G8B8A8 {
            return Err(BitmapError::FormatMismatch {
                expected: PixelFormat::R8G8B8A8,
                actual: self.format,
            });
        }
        let len = self.stride() * self.height as usize;
        Ok(imgref::ImgRef::new(
            self.data[..len].as_pixels(),
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Copy an RGBA8 image into a new bitmap.
    pub fn from_imgref(img: imgref::ImgRef<'_, rgb::RGBA8>) -> Result<Self, BitmapError> {
        let (w, h) = (img.width(), img.height());
        let (width, height) = match (u32::try_from(w), u32::try_from(h)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                return Err(BitmapError::DimensionsTooLarge {
                    width: u32::MAX,
                    height: u32::MAX,
                });
            }
        };
        let mut data = Vec::with_capacity(w * h * 4);
        for row in img.rows() {
            for px in row {
                data.extend_from_slice(&[px.r, px.g, px.b, px.a]);
            }
        }
        Bitmap::from_vec(data, width, height, PixelFormat::R8G8B8A8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zeroed_and_sized() {
        let bmp = Bitmap::new(3, 2, PixelFormat::R5G6B5).unwrap();
        assert_eq!(bmp.data().len(), 12);
        assert_eq!(bmp.stride(), 6);
        assert!(bmp.data().iter().all(|&b| b == 0));
        assert_eq!(bmp.mipmaps(), 1);
    }

    #[test]
    fn from_vec_rejects_short_buffers() {
        let err = Bitmap::from_vec(vec![0; 11], 3, 1, PixelFormat::R8G8B8A8).unwrap_err();
        assert!(matches!(err, BitmapError::BufferTooSmall { needed: 12, actual: 11 }));
    }

    #[test]
    fn pixel_access_and_bounds() {
        let mut bmp = Bitmap::new(2, 2, PixelFormat::R8G8B8).unwrap();
        bmp.set_pixel(1, 1, Color::new(1, 2, 3, 4));
        bmp.set_pixel(5, 0, Color::new(9, 9, 9, 9));
        assert_eq!(bmp.get_pixel(1, 1), Some(Color::new(1, 2, 3, 255)));
        assert_eq!(bmp.get_pixel(2, 0), None);
        assert_eq!(&bmp.data()[9..12], &[1, 2, 3]);
    }

    #[test]
    fn sub_image_copies_rows() {
        let data: Vec<u8> = (0..16).collect();
        let bmp = Bitmap::from_vec(data, 4, 4, PixelFormat::Grayscale).unwrap();
        let sub = bmp.sub_image(1, 2, 2, 2, &Limits::default()).unwrap();
        assert_eq!(sub.data(), &[9, 10, 13, 14]);
        assert!(bmp.sub_image(3, 0, 2, 1, &Limits::default()).is_err());
    }

    #[test]
    fn sub_image_respects_limits() {
        let bmp = Bitmap::new(8, 8, PixelFormat::R8G8B8A8).unwrap();
        let limits = Limits {
            max_memory_bytes: Some(64),
            ..Default::default()
        };
        assert!(bmp.sub_image(0, 0, 4, 4, &limits).is_ok());
        assert!(matches!(
            bmp.sub_image(0, 0, 5, 4, &limits),
            Err(BitmapError::LimitExceeded(_))
        ));
    }

    #[test]
    fn compressed_bitmaps_have_no_pixels() {
        let bmp = Bitmap::new(4, 4, PixelFormat::Dxt1Rgb).unwrap();
        assert_eq!(bmp.data().len(), 8);
        assert_eq!(bmp.get_pixel(0, 0), None);
    }

    #[cfg(feature = "imgref")]
    #[test]
    fn imgref_roundtrip() {
        let data: Vec<u8> = (0..24).collect();
        let bmp = Bitmap::from_vec(data, 3, 2, PixelFormat::R8G8B8A8).unwrap();
        let img = bmp.as_imgref().unwrap();
        assert_eq!(img.width(), 3);
        assert_eq!(img.buf()[4], rgb::RGBA8::new(16, 17, 18, 19));
        let copy = Bitmap::from_imgref(img).unwrap();
        assert_eq!(copy, bmp);
    }
}
