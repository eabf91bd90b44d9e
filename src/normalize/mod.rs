//! Pixel normalization
//!
//! Every operation reads a row-major buffer of packed 0xAARRGGBB pixels,
//! maps each color channel through `(value - mean) / std`, and writes the
//! result into a caller-owned buffer. Buffers are validated up front so a
//! rejected call never leaves a partially written destination.

mod channel;
mod packed;
mod tensor;

pub use channel::{normalize_channels, repack, truncate, unpack};
pub use packed::{normalize_packed, normalize_packed_bytes, normalize_pixel};
pub use tensor::{normalize_tensor, normalize_tensor_bytes, normalized_tensor};

use crate::error::PreprocessError;
use crate::types::{Dimensions, NormalizationParams, OutputFormat, MODEL_INPUT};

/// Normalize a model-sized image into packed words with the default parameters
///
/// A missing source or destination makes this a no-op that reports success.
///
/// # Errors
///
/// Returns an error if either buffer holds fewer than 128x128 elements
pub fn normalize(source: Option<&[u32]>, destination: Option<&mut [u32]>) -> Result<(), PreprocessError> {
    let (Some(source), Some(destination)) = (source, destination) else {
        return Ok(());
    };

    normalize_packed(source, MODEL_INPUT, &NormalizationParams::default(), destination)
}

/// Normalize into a raw byte buffer in the requested output format
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or either buffer is too small
pub fn normalize_into_bytes(
    source: &[u32],
    dims: Dimensions,
    params: &NormalizationParams,
    format: OutputFormat,
    destination: &mut [u8],
) -> Result<(), PreprocessError> {
    match format {
        OutputFormat::Packed => normalize_packed_bytes(source, dims, params, destination),
        OutputFormat::Tensor(layout) => normalize_tensor_bytes(source, dims, params, layout, destination),
    }
}

/// Returns the number of source pixels the transform will read
pub(crate) fn check_source(source: &[u32], dims: Dimensions) -> Result<usize, PreprocessError> {
    dims.validate()?;

    let required = (dims.width as usize)
        .checked_mul(dims.height as usize)
        .ok_or(PreprocessError::SizeOverflow { dimensions: dims })?;

    if source.len() < required {
        return Err(PreprocessError::SourceTooSmall {
            dimensions: dims,
            required,
            actual: source.len(),
        });
    }

    Ok(required)
}

#[inline]
pub(crate) fn check_destination(actual: usize, required: usize, dims: Dimensions) -> Result<(), PreprocessError> {
    if actual < required {
        return Err(PreprocessError::DestinationTooSmall {
            dimensions: dims,
            required,
            actual,
        });
    }
    Ok(())
}
