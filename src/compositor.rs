use crate::bitmap::Bitmap;
use crate::error::BitmapError;
use crate::rect::Rect;
use crate::resize::{NearestNeighbor, Resampler};
use crate::{Color, Limits, draw, fill};

/// Whether bulk draws may use the 4-lane kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Pick the fastest path for each format pair.
    #[default]
    Auto,
    /// Never use the vectorized path.
    Scalar,
}

/// How [`Compositor::fill_rect`] writes pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillStrategy {
    /// Encode once, store whole 16-byte patterns per scanline.
    #[default]
    Broadcast,
    /// Draw a one-row solid bitmap onto each scanline. The row is an
    /// allocation subject to [`Limits`].
    Blit,
}

/// Draw and fill configuration.
///
/// ```
/// use zenblit::{Bitmap, Color, Compositor, ExecutionMode, PixelFormat, Rect};
///
/// let mut dest = Bitmap::new(8, 8, PixelFormat::R8G8B8A8)?;
/// let source = Compositor::default().generate_solid_bitmap(2, 2, Color::new(255, 0, 0, 128))?;
///
/// Compositor::default()
///     .with_execution_mode(ExecutionMode::Scalar)
///     .draw_blended(
///         &mut dest,
///         &source,
///         Rect::new(0.0, 0.0, 2.0, 2.0),
///         Rect::new(1.0, 1.0, 4.0, 4.0),
///         Color::new(255, 255, 255, 255),
///     );
/// # Ok::<(), zenblit::BitmapError>(())
/// ```
#[derive(Clone)]
pub struct Compositor<'r> {
    limits: Limits,
    mode: ExecutionMode,
    fill: FillStrategy,
    resampler: &'r dyn Resampler,
}

impl Default for Compositor<'static> {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            mode: ExecutionMode::default(),
            fill: FillStrategy::default(),
            resampler: &NearestNeighbor,
        }
    }
}

impl core::fmt::Debug for Compositor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compositor")
            .field("limits", &self.limits)
            .field("mode", &self.mode)
            .field("fill", &self.fill)
            .finish_non_exhaustive()
    }
}

impl<'r> Compositor<'r> {
    /// Bound the transient and generated allocations.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fill_strategy(mut self, fill: FillStrategy) -> Self {
        self.fill = fill;
        self
    }

    /// Replace the resampler used for scaled draws.
    pub fn with_resampler<'a>(self, resampler: &'a dyn Resampler) -> Compositor<'a> {
        Compositor {
            limits: self.limits,
            mode: self.mode,
            fill: self.fill,
            resampler,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn fill_strategy(&self) -> FillStrategy {
        self.fill
    }

    pub(crate) fn resampler(&self) -> &'r dyn Resampler {
        self.resampler
    }

    /// Composite `source_rect` of `source` onto `dest_rect` of `dest` with
    /// straight-alpha "over", modulating the source by `tint`.
    ///
    /// Rectangles are clipped to both bitmaps. A size mismatch between the
    /// clipped source and `dest_rect` scales the source first. Never fails:
    /// degenerate input is skipped, with a `log` warning where it is
    /// unexpected (compressed formats, mipmaps, limit overruns).
    pub fn draw_blended(
        &self,
        dest: &mut Bitmap,
        source: &Bitmap,
        source_rect: Rect,
        dest_rect: Rect,
        tint: Color,
    ) {
        draw::draw_blended(self, dest, source, source_rect, dest_rect, tint);
    }

    /// Allocate a `width` x `height` R8G8B8A8 bitmap filled with `color`.
    pub fn generate_solid_bitmap(
        &self,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<Bitmap, BitmapError> {
        fill::generate_solid_bitmap(self, width, height, color)
    }

    /// Overwrite the part of `rect` inside `dest` with `color`. No blending.
    pub fn fill_rect(&self, dest: &mut Bitmap, rect: Rect, color: Color) {
        fill::fill_rect(self, dest, rect, color);
    }

    /// [`fill_rect`](Self::fill_rect) with integer coordinates.
    pub fn fill_rect_xywh(&self, dest: &mut Bitmap, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.fill_rect(dest, Rect::new(x as f32, y as f32, w as f32, h as f32), color);
    }

    /// Fill the whole base level of `dest` with `color`.
    pub fn clear(&self, dest: &mut Bitmap, color: Color) {
        self.fill_rect(
            dest,
            Rect::new(0.0, 0.0, dest.width() as f32, dest.height() as f32),
            color,
        );
    }
}

/// [`Compositor::draw_blended`] with the default configuration.
pub fn draw_blended(dest: &mut Bitmap, source: &Bitmap, source_rect: Rect, dest_rect: Rect, tint: Color) {
    Compositor::default().draw_blended(dest, source, source_rect, dest_rect, tint);
}

/// [`Compositor::generate_solid_bitmap`] with the default configuration.
pub fn generate_solid_bitmap(width: u32, height: u32, color: Color) -> Result<Bitmap, BitmapError> {
    Compositor::default().generate_solid_bitmap(width, height, color)
}

/// [`Compositor::fill_rect`] with the default configuration.
pub fn fill_rect(dest: &mut Bitmap, rect: Rect, color: Color) {
    Compositor::default().fill_rect(dest, rect, color);
}

/// [`Compositor::fill_rect_xywh`] with the default configuration.
pub fn fill_rect_xywh(dest: &mut Bitmap, x: i32, y: i32, w: i32, h: i32, color: Color) {
    Compositor::default().fill_rect_xywh(dest, x, y, w, h, color);
}

/// [`Compositor::clear`] with the default configuration.
pub fn clear(dest: &mut Bitmap, color: Color) {
    Compositor::default().clear(dest, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let limits = Limits {
            max_pixels: Some(4),
            ..Default::default()
        };
        let c = Compositor::default()
            .with_limits(limits)
            .with_execution_mode(ExecutionMode::Scalar)
            .with_fill_strategy(FillStrategy::Blit);
        assert_eq!(c.limits().max_pixels, Some(4));
        assert_eq!(c.execution_mode(), ExecutionMode::Scalar);
        assert_eq!(c.fill_strategy(), FillStrategy::Blit);
    }

    #[test]
    fn solid_bitmap_respects_limits() {
        let c = Compositor::default().with_limits(Limits {
            max_memory_bytes: Some(16),
            ..Default::default()
        });
        assert!(c.generate_solid_bitmap(2, 2, Color::new(1, 2, 3, 4)).is_ok());
        assert!(c.generate_solid_bitmap(3, 2, Color::new(1, 2, 3, 4)).is_err());
    }
}
