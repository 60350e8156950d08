use crate::access::write_color;
use crate::bitmap::Bitmap;
use crate::compositor::{Compositor, FillStrategy};
use crate::error::BitmapError;
use crate::pixel::PixelFormat;
use crate::rect::{PixelRect, Rect, rect_intersection};
use crate::wide::VECTOR_BYTES;
use crate::Color;

pub(crate) fn fill_rect(config: &Compositor<'_>, dest: &mut Bitmap, rect: Rect, color: Color) {
    if dest.is_empty() {
        return;
    }
    if dest.format().is_compressed() {
        log::warn!("fill does not support compressed format {:?}, skipped", dest.format());
        return;
    }
    let bounds = Rect::new(0.0, 0.0, dest.width() as f32, dest.height() as f32);
    let area = PixelRect::from(rect_intersection(bounds, rect)).clip_to(dest.width(), dest.height());
    if area.is_empty() {
        return;
    }
    match config.fill_strategy() {
        FillStrategy::Broadcast => broadcast(dest, area, color),
        FillStrategy::Blit => fill_via_blit(config, dest, area, color),
    }
}

/// Store the encoded color as whole 16-byte patterns, then single pixels
/// for the rest of each row.
fn broadcast(dest: &mut Bitmap, area: PixelRect, color: Color) {
    let format = dest.format();
    let bpp = format.bytes_per_pixel();
    let mut pixel = [0u8; VECTOR_BYTES];
    write_color(&mut pixel[..bpp], format, color);
    let pixel = &pixel[..bpp];

    let chunk = (VECTOR_BYTES / bpp) * bpp;
    let mut pattern = [0u8; VECTOR_BYTES];
    for px in pattern[..chunk].chunks_exact_mut(bpp) {
        px.copy_from_slice(pixel);
    }
    let pattern = &pattern[..chunk];

    let (x, w) = (area.x as usize, area.w as usize);
    for y in area.y as usize..(area.y + area.h) as usize {
        let mut groups = dest.span_mut(x, y, w).chunks_exact_mut(chunk);
        for group in &mut groups {
            group.copy_from_slice(pattern);
        }
        for px in groups.into_remainder().chunks_exact_mut(bpp) {
            px.copy_from_slice(pixel);
        }
    }
}

/// Draw a one-row solid swatch onto each scanline through the blend driver.
///
/// The swatch is `area.w` pixels and checked against the compositor's
/// [`Limits`](crate::Limits); a rejected swatch skips the fill.
fn fill_via_blit(config: &Compositor<'_>, dest: &mut Bitmap, area: PixelRect, color: Color) {
    // Clipped to the destination bitmap, so the width fits in u32.
    let swatch = match generate_solid_bitmap(config, area.w as u32, 1, color) {
        Ok(swatch) => swatch,
        Err(e) => {
            log::warn!("fill skipped: {e}");
            return;
        }
    };
    let row = Rect::new(0.0, 0.0, area.w as f32, 1.0);
    for y in area.y..area.y + area.h {
        config.draw_blended(
            dest,
            &swatch,
            row,
            Rect::new(area.x as f32, y as f32, area.w as f32, 1.0),
            Color::new(255, 255, 255, 255),
        );
    }
}

pub(crate) fn generate_solid_bitmap(
    config: &Compositor<'_>,
    width: u32,
    height: u32,
    color: Color,
) -> Result<Bitmap, BitmapError> {
    let format = PixelFormat::R8G8B8A8;
    let size = format
        .data_size(width, height)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    config.limits().check_allocation(width, height, size)?;
    let mut bitmap = Bitmap::new(width, height, format)?;
    if !bitmap.is_empty() {
        broadcast(&mut bitmap, PixelRect::bounds(width, height), color);
    }
    Ok(bitmap)
}
