//! Truncating packed-word normalization
//!
//! Each channel is normalized, truncated toward zero and written back into
//! its original bit position. With the default parameters every channel in
//! `1..=254` collapses to 0; only 0 and 255 survive as -1 and 1.

use super::channel::{normalize_channels, repack, truncate};
use super::{check_destination, check_source};
use crate::error::PreprocessError;
use crate::types::{Dimensions, NormalizationParams, OutputFormat};

#[inline(always)]
#[must_use]
pub fn normalize_pixel(pixel: u32, params: &NormalizationParams) -> u32 {
    repack(normalize_channels(pixel, params).map(truncate))
}

/// Normalize `dims` pixels of `source` into `destination`, row-major
///
/// Elements past `dims.pixel_count()` are left untouched.
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or either buffer is
/// too small. Nothing is written in that case.
pub fn normalize_packed(
    source: &[u32],
    dims: Dimensions,
    params: &NormalizationParams,
    destination: &mut [u32],
) -> Result<(), PreprocessError> {
    let count = check_source(source, dims)?;
    check_destination(destination.len(), count, dims)?;

    for (out, &pixel) in destination[..count].iter_mut().zip(&source[..count]) {
        *out = normalize_pixel(pixel, params);
    }

    Ok(())
}

/// Same as [`normalize_packed`], writing each word in native byte order
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or either buffer is
/// too small. Nothing is written in that case.
pub fn normalize_packed_bytes(
    source: &[u32],
    dims: Dimensions,
    params: &NormalizationParams,
    destination: &mut [u8],
) -> Result<(), PreprocessError> {
    let count = check_source(source, dims)?;
    let required = OutputFormat::Packed.required_bytes(dims)?;
    check_destination(destination.len(), required, dims)?;

    for (out, &pixel) in destination[..required]
        .chunks_exact_mut(size_of::<u32>())
        .zip(&source[..count])
    {
        out.copy_from_slice(&normalize_pixel(pixel, params).to_ne_bytes());
    }

    Ok(())
}
