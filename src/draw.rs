//! Blend driver: clipping, optional scaling, path selection and the
//! per-scanline loops.

use crate::access::{read_color, write_color};
use crate::bitmap::Bitmap;
use crate::blend::vector::LaneKernel;
use crate::blend::{Blend, alpha_floor};
use crate::compositor::{Compositor, ExecutionMode};
use crate::error::BitmapError;
use crate::layout::LaneLayout;
use crate::pixel::PixelFormat;
use crate::rect::{BlitRegion, PixelRect, Rect, clip_destination};
use crate::resize::ScaleWindow;
use crate::wide::{PortableShuffle, Shuffle};
use crate::Color;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use crate::wide::Pshufb;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use archmage::incant;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
use archmage::prelude::*;

const OPAQUE_WHITE: Color = Color::new(255, 255, 255, 255);

/// Per-pixel strategy of a blended draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    /// Decode and encode each pixel through [`read_color`] / [`write_color`].
    ScalarGeneric,
    /// Both bitmaps R8G8B8A8; blend packed pixels directly.
    ScalarFlattened,
    /// R8G8B8A8 destination and a source with a [`LaneLayout`]; four pixels
    /// per step.
    Vectorized,
}

impl DrawMode {
    /// Path used for a draw from `source` onto `dest` formats.
    pub fn select(source: PixelFormat, dest: PixelFormat, mode: ExecutionMode) -> Self {
        if dest != PixelFormat::R8G8B8A8 {
            return Self::ScalarGeneric;
        }
        match mode {
            ExecutionMode::Auto if source.lane_layout().is_some() => Self::Vectorized,
            _ if source == PixelFormat::R8G8B8A8 => Self::ScalarFlattened,
            _ => Self::ScalarGeneric,
        }
    }
}

pub(crate) fn draw_blended(
    config: &Compositor<'_>,
    dest: &mut Bitmap,
    source: &Bitmap,
    source_rect: Rect,
    dest_rect: Rect,
    tint: Color,
) {
    if dest.is_empty() || source.is_empty() {
        return;
    }
    if dest.mipmaps() > 1 {
        log::warn!(
            "drawing onto base level only, {} mipmap levels left stale",
            dest.mipmaps() - 1
        );
    }
    if dest.format().is_compressed() || source.format().is_compressed() {
        log::warn!(
            "blended draw does not support compressed formats ({:?} onto {:?}), skipped",
            source.format(),
            dest.format()
        );
        return;
    }

    let src = PixelRect::from(source_rect).clip_to(source.width(), source.height());
    if src.is_empty() {
        return;
    }
    let dst = PixelRect::from(dest_rect);

    let scaled;
    let (source, src, dst) = if src.w != dst.w || src.h != dst.h {
        // Only the part of the scaled image that lands on `dest` is built.
        let visible = dst.clip_to(dest.width(), dest.height());
        if dst.is_empty() || visible.is_empty() {
            return;
        }
        match scale_source(config, source, src, dst, visible) {
            Ok(bitmap) => {
                scaled = bitmap;
                (&scaled, PixelRect::bounds(scaled.width(), scaled.height()), visible)
            }
            Err(e) => {
                log::warn!("scaled draw skipped: {e}");
                return;
            }
        }
    } else {
        (source, src, dst)
    };

    let Some(region) = clip_destination(src, dst, dest.width(), dest.height()) else {
        return;
    };
    blit(dest, source, &region, tint, config.execution_mode());
}

/// Cut the clipped source out and resample it to `dst`, materializing only
/// the `visible` part (already clipped to the destination bitmap).
fn scale_source(
    config: &Compositor<'_>,
    source: &Bitmap,
    src: PixelRect,
    dst: PixelRect,
    visible: PixelRect,
) -> Result<Bitmap, BitmapError> {
    // `dst` is non-empty and within the coordinate limit; `visible` lies
    // inside both `dst` and a u32-sized bitmap.
    let window = ScaleWindow {
        scaled_width: dst.w as u64,
        scaled_height: dst.h as u64,
        x: (visible.x - dst.x) as u64,
        y: (visible.y - dst.y) as u64,
        width: visible.w as u32,
        height: visible.h as u32,
    };
    log::trace!(
        "scaling {}x{} source to {}x{}, window {}x{} at ({}, {})",
        src.w,
        src.h,
        window.scaled_width,
        window.scaled_height,
        window.width,
        window.height,
        window.x,
        window.y
    );
    let limits = config.limits();
    if src == PixelRect::bounds(source.width(), source.height()) {
        return config.resampler().resize(source, window, limits);
    }
    // Clipped to the source bitmap, so these fit in u32.
    let sub = source.sub_image(src.x as u32, src.y as u32, src.w as u32, src.h as u32, limits)?;
    config.resampler().resize(&sub, window, limits)
}

fn blit(dest: &mut Bitmap, source: &Bitmap, region: &BlitRegion, tint: Color, mode: ExecutionMode) {
    if tint == OPAQUE_WHITE && !source.format().has_alpha() {
        copy_or_convert(dest, source, region);
        return;
    }

    let draw_mode = DrawMode::select(source.format(), dest.format(), mode);
    log::debug!(
        "{draw_mode:?} draw {:?} -> {:?}, {}x{}",
        source.format(),
        dest.format(),
        region.width,
        region.height
    );
    match (draw_mode, source.format().lane_layout()) {
        (DrawMode::Vectorized, Some(layout)) => {
            let kernel = LaneKernel::new(tint, layout);
            vector_rows(&kernel, dest, source, region);
        }
        (DrawMode::ScalarFlattened, _) => {
            let rgba = LaneLayout::rgba8();
            let blend = Blend::<f32>::new(tint, alpha_floor(rgba));
            for row in 0..region.height {
                let (s, d) = spans(dest, source, region, row);
                for (sp, dp) in s.chunks_exact(4).zip(d.chunks_exact_mut(4)) {
                    blend.pixel(rgba, sp, dp);
                }
            }
        }
        _ => blend_generic(dest, source, region, tint),
    }
}

/// Vectorized rows, with the byte shuffle picked once per draw.
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
fn vector_rows(kernel: &LaneKernel, dest: &mut Bitmap, source: &Bitmap, region: &BlitRegion) {
    incant!(vector_rows_impl(kernel, dest, source, region), [v3, scalar]);
}

#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
fn vector_rows(kernel: &LaneKernel, dest: &mut Bitmap, source: &Bitmap, region: &BlitRegion) {
    rows_with(PortableShuffle, kernel, dest, source, region);
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[arcane]
fn vector_rows_impl_v3(
    t: X64V3Token,
    kernel: &LaneKernel,
    dest: &mut Bitmap,
    source: &Bitmap,
    region: &BlitRegion,
) {
    rows_with(Pshufb::new(t), kernel, dest, source, region);
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
fn vector_rows_impl_scalar(
    _token: ScalarToken,
    kernel: &LaneKernel,
    dest: &mut Bitmap,
    source: &Bitmap,
    region: &BlitRegion,
) {
    rows_with(PortableShuffle, kernel, dest, source, region);
}

#[inline(always)]
fn rows_with<S: Shuffle>(
    shuffle: S,
    kernel: &LaneKernel,
    dest: &mut Bitmap,
    source: &Bitmap,
    region: &BlitRegion,
) {
    for row in 0..region.height {
        let (s, d) = spans(dest, source, region, row);
        kernel.blend_row(shuffle, s, d);
    }
}

/// Source and destination bytes of one clipped scanline.
#[inline]
fn spans<'d, 's>(
    dest: &'d mut Bitmap,
    source: &'s Bitmap,
    region: &BlitRegion,
    row: usize,
) -> (&'s [u8], &'d mut [u8]) {
    (
        source.span(region.src_x, region.src_y + row, region.width),
        dest.span_mut(region.dst_x, region.dst_y + row, region.width),
    )
}

fn blend_generic(dest: &mut Bitmap, source: &Bitmap, region: &BlitRegion, tint: Color) {
    let (sf, df) = (source.format(), dest.format());
    let floor = if sf.has_alpha() { 0.0 } else { 255.0 };
    let blend = Blend::<f32>::new(tint, floor);
    for row in 0..region.height {
        let (s, d) = spans(dest, source, region, row);
        for (sp, dp) in s
            .chunks_exact(sf.bytes_per_pixel())
            .zip(d.chunks_exact_mut(df.bytes_per_pixel()))
        {
            let out = blend.colors(read_color(sp, sf), read_color(dp, df));
            write_color(dp, df, out);
        }
    }
}

/// Opaque source with an identity tint: pixels are copied, not blended.
fn copy_or_convert(dest: &mut Bitmap, source: &Bitmap, region: &BlitRegion) {
    let (sf, df) = (source.format(), dest.format());
    if sf == df {
        log::trace!("raw row copy {sf:?}");
        for row in 0..region.height {
            let (s, d) = spans(dest, source, region, row);
            d.copy_from_slice(s);
        }
        return;
    }

    log::trace!("converting rows {sf:?} -> {df:?}");
    for row in 0..region.height {
        let (s, d) = spans(dest, source, region, row);
        if convert_row_simd(sf, df, s, d) {
            continue;
        }
        for (sp, dp) in s
            .chunks_exact(sf.bytes_per_pixel())
            .zip(d.chunks_exact_mut(df.bytes_per_pixel()))
        {
            write_color(dp, df, read_color(sp, sf));
        }
    }
}

/// Expand 8-bit RGB or gray rows to RGBA8 with `garb`'s SIMD converters.
#[cfg(feature = "simd")]
fn convert_row_simd(sf: PixelFormat, df: PixelFormat, src: &[u8], dst: &mut [u8]) -> bool {
    match (sf, df) {
        (PixelFormat::R8G8B8, PixelFormat::R8G8B8A8) => garb::bytes::rgb_to_rgba(src, dst).is_ok(),
        (PixelFormat::Grayscale, PixelFormat::R8G8B8A8) => {
            garb::bytes::gray_to_rgba(src, dst).is_ok()
        }
        _ => false,
    }
}

#[cfg(not(feature = "simd"))]
fn convert_row_simd(_sf: PixelFormat, _df: PixelFormat, _src: &[u8], _dst: &mut [u8]) -> bool {
    false
}
