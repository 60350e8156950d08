//! Per-pixel color access for every uncompressed format.
//!
//! Narrow channels are expanded to 8 bits with rounding (`v * 255 / max`)
//! and quantized back the same way, so a channel written then read returns
//! the nearest representable value. Gray formats store BT.601 luminance.

use crate::Color;
use crate::pixel::PixelFormat;
use crate::wide::round_half_even;

#[inline]
fn expand(v: u32, max: u32) -> u8 {
    ((v * 255 + max / 2) / max) as u8
}

#[inline]
fn quantize(v: u8, max: u32) -> u32 {
    (u32::from(v) * max + 127) / 255
}

#[inline]
fn luminance(c: Color) -> u8 {
    let (r, g, b) = (u32::from(c.r), u32::from(c.g), u32::from(c.b));
    ((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8
}

#[inline]
fn read_f32(bytes: &[u8], idx: usize) -> u8 {
    let o = idx * 4;
    let v = f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
    // NaN fails both comparisons and clamps to 0.
    let v = if v > 0.0 { v.min(1.0) } else { 0.0 };
    round_half_even(v * 255.0) as u8
}

#[inline]
fn write_f32(bytes: &mut [u8], idx: usize, v: u8) {
    bytes[idx * 4..idx * 4 + 4].copy_from_slice(&(f32::from(v) / 255.0).to_le_bytes());
}

/// Decode one pixel of `format` from `pixel` (at least `bytes_per_pixel` long).
///
/// Formats without alpha read as opaque. Block-compressed formats have no
/// per-pixel representation and read as transparent black.
pub fn read_color(pixel: &[u8], format: PixelFormat) -> Color {
    match format {
        PixelFormat::Grayscale => Color::new(pixel[0], pixel[0], pixel[0], 255),
        PixelFormat::GrayAlpha => Color::new(pixel[0], pixel[0], pixel[0], pixel[1]),
        PixelFormat::R5G6B5 => {
            let w = u32::from(u16::from_le_bytes([pixel[0], pixel[1]]));
            Color::new(
                expand((w >> 11) & 0x1F, 31),
                expand((w >> 5) & 0x3F, 63),
                expand(w & 0x1F, 31),
                255,
            )
        }
        PixelFormat::R5G5B5A1 => {
            let w = u32::from(u16::from_le_bytes([pixel[0], pixel[1]]));
            Color::new(
                expand((w >> 11) & 0x1F, 31),
                expand((w >> 6) & 0x1F, 31),
                expand((w >> 1) & 0x1F, 31),
                if w & 1 == 1 { 255 } else { 0 },
            )
        }
        PixelFormat::R4G4B4A4 => {
            let w = u32::from(u16::from_le_bytes([pixel[0], pixel[1]]));
            Color::new(
                expand((w >> 12) & 0xF, 15),
                expand((w >> 8) & 0xF, 15),
                expand((w >> 4) & 0xF, 15),
                expand(w & 0xF, 15),
            )
        }
        PixelFormat::R8G8B8 => Color::new(pixel[0], pixel[1], pixel[2], 255),
        PixelFormat::R8G8B8A8 => Color::new(pixel[0], pixel[1], pixel[2], pixel[3]),
        PixelFormat::R32 => {
            let v = read_f32(pixel, 0);
            Color::new(v, v, v, 255)
        }
        PixelFormat::R32G32B32 => {
            Color::new(read_f32(pixel, 0), read_f32(pixel, 1), read_f32(pixel, 2), 255)
        }
        PixelFormat::R32G32B32A32 => Color::new(
            read_f32(pixel, 0),
            read_f32(pixel, 1),
            read_f32(pixel, 2),
            read_f32(pixel, 3),
        ),
        _ => Color::new(0, 0, 0, 0),
    }
}

/// Encode `color` as one pixel of `format` into `pixel`.
///
/// Channels missing from the format are dropped; gray formats take the
/// luminance of the RGB channels. Block-compressed formats are left
/// untouched.
pub fn write_color(pixel: &mut [u8], format: PixelFormat, color: Color) {
    match format {
        PixelFormat::Grayscale => pixel[0] = luminance(color),
        PixelFormat::GrayAlpha => {
            pixel[0] = luminance(color);
            pixel[1] = color.a;
        }
        PixelFormat::R5G6B5 => {
            let w = (quantize(color.r, 31) << 11) | (quantize(color.g, 63) << 5) | quantize(color.b, 31);
            pixel[..2].copy_from_slice(&(w as u16).to_le_bytes());
        }
        PixelFormat::R5G5B5A1 => {
            let w = (quantize(color.r, 31) << 11)
                | (quantize(color.g, 31) << 6)
                | (quantize(color.b, 31) << 1)
                | quantize(color.a, 1);
            pixel[..2].copy_from_slice(&(w as u16).to_le_bytes());
        }
        PixelFormat::R4G4B4A4 => {
            let w = (quantize(color.r, 15) << 12)
                | (quantize(color.g, 15) << 8)
                | (quantize(color.b, 15) << 4)
                | quantize(color.a, 15);
            pixel[..2].copy_from_slice(&(w as u16).to_le_bytes());
        }
        PixelFormat::R8G8B8 => pixel[..3].copy_from_slice(&[color.r, color.g, color.b]),
        PixelFormat::R8G8B8A8 => pixel[..4].copy_from_slice(&[color.r, color.g, color.b, color.a]),
        PixelFormat::R32 => write_f32(pixel, 0, luminance(color)),
        PixelFormat::R32G32B32 => {
            write_f32(pixel, 0, color.r);
            write_f32(pixel, 1, color.g);
            write_f32(pixel, 2, color.b);
        }
        PixelFormat::R32G32B32A32 => {
            write_f32(pixel, 0, color.r);
            write_f32(pixel, 1, color.g);
            write_f32(pixel, 2, color.b);
            write_f32(pixel, 3, color.a);
        }
        _ => {}
    }
}
