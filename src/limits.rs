use crate::error::BitmapError;

/// Resource limits for the allocations the crate makes itself.
///
/// Covers [`generate_solid_bitmap`](crate::generate_solid_bitmap), sub-image
/// extraction and the transient resized source of a scaled draw.
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for a single bitmap buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject a `width` x `height` buffer of `bytes` the crate is about to
    /// allocate (a generated, cut-out or resampled bitmap).
    pub(crate) fn check_allocation(&self, width: u32, height: u32, bytes: usize) -> Result<(), BitmapError> {
        let exceeds = |what: &str, value: u64, max: Option<u64>| match max {
            Some(max) if value > max => Err(BitmapError::LimitExceeded(alloc::format!(
                "{width}x{height} bitmap: {what} {value} over limit {max}"
            ))),
            _ => Ok(()),
        };
        exceeds("width", u64::from(width), self.max_width)?;
        exceeds("height", u64::from(height), self.max_height)?;
        exceeds("pixel count", u64::from(width) * u64::from(height), self.max_pixels)?;
        exceeds("buffer size", bytes as u64, self.max_memory_bytes)
    }
}
