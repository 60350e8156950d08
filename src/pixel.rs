/// Pixel storage format of a [`Bitmap`](crate::Bitmap).
///
/// Uncompressed packed formats are stored row-major with no row padding.
/// 16-bit packed formats are little-endian `u16` words; float formats are
/// little-endian `f32` per channel.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single channel, 8-bit grayscale.
    Grayscale,
    /// Two channels, 8-bit gray + 8-bit alpha.
    GrayAlpha,
    /// 16-bit packed, 5-6-5 RGB (no alpha).
    R5G6B5,
    /// 3 channels, 8-bit RGB.
    R8G8B8,
    /// 16-bit packed, 5-5-5 RGB with 1-bit alpha.
    R5G5B5A1,
    /// 16-bit packed, 4-4-4-4 RGBA.
    R4G4B4A4,
    /// 4 channels, 8-bit RGBA.
    R8G8B8A8,
    /// Single channel, 32-bit float.
    R32,
    /// 3 channels, 32-bit float RGB.
    R32G32B32,
    /// 4 channels, 32-bit float RGBA.
    R32G32B32A32,
    /// DXT1 block compression, RGB.
    Dxt1Rgb,
    /// DXT1 block compression, RGBA (1-bit alpha).
    Dxt1Rgba,
    /// DXT3 block compression, RGBA.
    Dxt3Rgba,
    /// DXT5 block compression, RGBA.
    Dxt5Rgba,
    /// ETC1 block compression, RGB.
    Etc1Rgb,
    /// ETC2 block compression, RGB.
    Etc2Rgb,
    /// ETC2 + EAC block compression, RGBA.
    Etc2EacRgba,
    /// PVRTC compression, RGB.
    PvrtRgb,
    /// PVRTC compression, RGBA.
    PvrtRgba,
    /// ASTC 4x4 block compression, RGBA.
    Astc4x4Rgba,
    /// ASTC 8x8 block compression, RGBA.
    Astc8x8Rgba,
}

impl PixelFormat {
    /// Bits per pixel. Compressed formats report their average rate.
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            Self::Grayscale => 8,
            Self::GrayAlpha | Self::R5G6B5 | Self::R5G5B5A1 | Self::R4G4B4A4 => 16,
            Self::R8G8B8 => 24,
            Self::R8G8B8A8 | Self::R32 => 32,
            Self::R32G32B32 => 96,
            Self::R32G32B32A32 => 128,
            Self::Dxt1Rgb
            | Self::Dxt1Rgba
            | Self::Etc1Rgb
            | Self::Etc2Rgb
            | Self::PvrtRgb
            | Self::PvrtRgba => 4,
            Self::Dxt3Rgba | Self::Dxt5Rgba | Self::Etc2EacRgba | Self::Astc4x4Rgba => 8,
            Self::Astc8x8Rgba => 2,
        }
    }

    /// Bytes per pixel for uncompressed formats, 0 for block-compressed ones.
    pub fn bytes_per_pixel(&self) -> usize {
        if self.is_compressed() {
            0
        } else {
            self.bits_per_pixel() as usize / 8
        }
    }

    /// Whether this is a block-compressed format.
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Self::Dxt1Rgb
                | Self::Dxt1Rgba
                | Self::Dxt3Rgba
                | Self::Dxt5Rgba
                | Self::Etc1Rgb
                | Self::Etc2Rgb
                | Self::Etc2EacRgba
                | Self::PvrtRgb
                | Self::PvrtRgba
                | Self::Astc4x4Rgba
                | Self::Astc8x8Rgba
        )
    }

    /// Whether pixels in this format carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        !matches!(
            self,
            Self::Grayscale
                | Self::R5G6B5
                | Self::R8G8B8
                | Self::R32
                | Self::R32G32B32
                | Self::Dxt1Rgb
                | Self::Etc1Rgb
                | Self::Etc2Rgb
                | Self::PvrtRgb
        )
    }

    /// Bytes in one scanline of `width` pixels (uncompressed formats).
    pub fn stride(&self, width: u32) -> usize {
        width as usize * self.bytes_per_pixel()
    }

    /// Size in bytes of one `width` x `height` image level.
    ///
    /// Block-compressed sizes are rounded up to whole blocks. Returns `None`
    /// on overflow.
    pub fn data_size(&self, width: u32, height: u32) -> Option<usize> {
        let (w, h) = (width as usize, height as usize);
        if !self.is_compressed() {
            return w.checked_mul(h)?.checked_mul(self.bytes_per_pixel());
        }
        let block = if matches!(self, Self::Astc8x8Rgba) { 8 } else { 4 };
        let blocks_x = w.div_ceil(block);
        let blocks_y = h.div_ceil(block);
        let block_bytes = block * block * self.bits_per_pixel() as usize / 8;
        blocks_x.checked_mul(blocks_y)?.checked_mul(block_bytes)
    }
}
