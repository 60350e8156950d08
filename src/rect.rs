/// Axis-aligned rectangle in pixel units.
///
/// Coordinates are `f32` to match callers working in float space; they are
/// truncated toward zero when a draw or fill resolves pixel positions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Overlap of two rectangles.
///
/// Disjoint rectangles yield an all-zero rect. Rectangles that only share an
/// edge overlap with zero width or height.
pub fn rect_intersection(a: Rect, b: Rect) -> Rect {
    let overlaps = a.x <= b.x + b.width
        && a.x + a.width >= b.x
        && a.y <= b.y + b.height
        && a.y + a.height >= b.y;
    if !overlaps {
        return Rect::default();
    }
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    Rect::new(
        x,
        y,
        (a.x + a.width).min(b.x + b.width) - x,
        (a.y + a.height).min(b.y + b.height) - y,
    )
}

// Keeps every intermediate sum of clipped coordinates far from i64 overflow.
const COORD_LIMIT: i64 = 1 << 40;

/// Integer rectangle after truncating a [`Rect`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

fn truncate(v: f32) -> i64 {
    // `as` saturates and maps NaN to 0.
    (v as i64).clamp(-COORD_LIMIT, COORD_LIMIT)
}

impl From<Rect> for PixelRect {
    fn from(r: Rect) -> Self {
        Self {
            x: truncate(r.x),
            y: truncate(r.y),
            w: truncate(r.width),
            h: truncate(r.height),
        }
    }
}

impl PixelRect {
    pub(crate) fn bounds(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            w: i64::from(width),
            h: i64::from(height),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Clip to `0..width` x `0..height`, shrinking the size by whatever
    /// falls off either edge.
    pub(crate) fn clip_to(mut self, width: u32, height: u32) -> Self {
        if self.x < 0 {
            self.w += self.x;
            self.x = 0;
        }
        if self.y < 0 {
            self.h += self.y;
            self.y = 0;
        }
        self.w = self.w.min(i64::from(width) - self.x);
        self.h = self.h.min(i64::from(height) - self.y);
        self
    }
}

/// Resolved copy region, guaranteed in bounds for both bitmaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BlitRegion {
    pub src_x: usize,
    pub src_y: usize,
    pub dst_x: usize,
    pub dst_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Place `src` (already clipped to its bitmap) at the origin of `dst` and
/// clip against the destination bounds.
///
/// Pixels falling off the left or top edge advance the source origin by the
/// same amount, so the visible part lines up with where it would have been
/// drawn. Returns `None` when nothing remains.
pub(crate) fn clip_destination(
    src: PixelRect,
    dst: PixelRect,
    dest_width: u32,
    dest_height: u32,
) -> Option<BlitRegion> {
    let (mut sx, mut sy) = (src.x, src.y);
    let (mut w, mut h) = (src.w, src.h);
    let (mut dx, mut dy) = (dst.x, dst.y);
    if dx < 0 {
        sx -= dx;
        w += dx;
        dx = 0;
    }
    if dy < 0 {
        sy -= dy;
        h += dy;
        dy = 0;
    }
    w = w.min(i64::from(dest_width) - dx);
    h = h.min(i64::from(dest_height) - dy);
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(BlitRegion {
        src_x: sx as usize,
        src_y: sy as usize,
        dst_x: dx as usize,
        dst_y: dy as usize,
        width: w as usize,
        height: h as usize,
    })
}
