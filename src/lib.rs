//! # zenblit
//!
//! Alpha-blended drawing, solid fills and clears for packed-pixel bitmaps,
//! independent of the pixel format.
//!
//! ## Drawing
//!
//! [`draw_blended`] composites a rectangle of one bitmap onto another with
//! straight-alpha "over", modulated by a tint color. Rectangles are clipped
//! to both bitmaps; a source rectangle whose size differs from the
//! destination rectangle is scaled through a [`Resampler`] first.
//!
//! When the destination is R8G8B8A8 and the source is one of R8G8B8A8,
//! R8G8B8, R5G6B5, R5G5B5A1 or R4G4B4A4, rows are blended [`LANES`] pixels at
//! a time. Every other pair goes through per-pixel [`read_color`] /
//! [`write_color`]. All paths share one blend kernel, so the vectorized and
//! scalar results of a row are byte-identical.
//!
//! ## Filling
//!
//! [`fill_rect`], [`fill_rect_xywh`] and [`clear`] overwrite pixels with a
//! color encoded once in the destination's format.
//!
//! ## Features
//!
//! - `std`: link the standard library (otherwise `no_std` + `alloc`).
//! - `simd`: SSE2 lanes on x86_64 with `pshufb` picked at runtime through
//!   `archmage`, and `garb` row converters.
//! - `imgref`: [`imgref`] views of R8G8B8A8 bitmaps.
//!
//! ## Non-Goals
//!
//! - Decoding or encoding block-compressed formats; they are skipped.
//! - Premultiplied alpha, blend modes other than "over", color management.
//! - Resampling quality; the default [`NearestNeighbor`] copies whole pixels.
//!
//! ## Usage
//!
//! ```
//! use zenblit::{Bitmap, Color, PixelFormat, Rect};
//!
//! let mut canvas = Bitmap::new(4, 4, PixelFormat::R8G8B8A8)?;
//! zenblit::clear(&mut canvas, Color::new(0, 0, 0, 255));
//!
//! let sprite = zenblit::generate_solid_bitmap(2, 2, Color::new(255, 0, 0, 128))?;
//! zenblit::draw_blended(
//!     &mut canvas,
//!     &sprite,
//!     Rect::new(0.0, 0.0, 2.0, 2.0),
//!     Rect::new(1.0, 1.0, 2.0, 2.0),
//!     Color::new(255, 255, 255, 255),
//! );
//! assert_eq!(canvas.get_pixel(1, 1), Some(Color::new(128, 0, 0, 255)));
//! # Ok::<(), zenblit::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(feature = "simd"), forbid(unsafe_code))]
#![cfg_attr(feature = "simd", deny(unsafe_code))]

extern crate alloc;

mod access;
mod bitmap;
mod blend;
mod compositor;
mod draw;
mod error;
mod fill;
mod layout;
mod limits;
mod pixel;
mod rect;
mod resize;
mod wide;

/// 8-bit straight-alpha RGBA color.
pub type Color = rgb::RGBA8;

pub use access::{read_color, write_color};
pub use bitmap::Bitmap;
pub use blend::blend_pixel;
pub use compositor::{
    Compositor, ExecutionMode, FillStrategy, clear, draw_blended, fill_rect, fill_rect_xywh,
    generate_solid_bitmap,
};
pub use draw::DrawMode;
pub use error::BitmapError;
pub use layout::LaneLayout;
pub use limits::Limits;
pub use pixel::PixelFormat;
pub use rect::{Rect, rect_intersection};
pub use resize::{NearestNeighbor, Resampler, ScaleWindow};
pub use wide::LANES;
