//! Packed pixel channel helpers
//!
//! Pixels are 0xAARRGGBB words; the alpha byte is never read.

use crate::types::{NormalizationParams, CHANNELS};

#[inline(always)]
#[must_use]
pub fn unpack(pixel: u32) -> [u8; CHANNELS] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

#[inline(always)]
#[must_use]
pub fn normalize_channels(pixel: u32, params: &NormalizationParams) -> [f32; CHANNELS] {
    unpack(pixel).map(|channel| params.apply(channel))
}

/// Truncate toward zero; out-of-range values saturate at the `i32` bounds
#[inline(always)]
#[must_use]
pub fn truncate(value: f32) -> i32 {
    value as i32
}

/// Repack signed channels as `r << 16 | g << 8 | b`
///
/// The OR is done on the signed values, so a negative channel fills every
/// bit above its own position.
#[inline(always)]
#[must_use]
pub fn repack([r, g, b]: [i32; CHANNELS]) -> u32 {
    ((r << 16) | (g << 8) | b) as u32
}
