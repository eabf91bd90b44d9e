//! Float tensor normalization
//!
//! Keeps the full normalized value of every channel, laid out the way the
//! model input expects it.

use super::channel::normalize_channels;
use super::{check_destination, check_source};
use crate::error::PreprocessError;
use crate::types::{Dimensions, NormalizationParams, OutputFormat, TensorLayout, CHANNELS};

#[inline(always)]
fn tensor_index(layout: TensorLayout, pixel_count: usize, pixel: usize, channel: usize) -> usize {
    match layout {
        TensorLayout::Hwc => pixel * CHANNELS + channel,
        TensorLayout::Chw => channel * pixel_count + pixel,
    }
}

fn tensor_len(dims: Dimensions, count: usize) -> Result<usize, PreprocessError> {
    count
        .checked_mul(CHANNELS)
        .ok_or(PreprocessError::SizeOverflow { dimensions: dims })
}

/// Normalize `dims` pixels of `source` into a `W*H*3` float tensor
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or either buffer is
/// too small. Nothing is written in that case.
pub fn normalize_tensor(
    source: &[u32],
    dims: Dimensions,
    params: &NormalizationParams,
    layout: TensorLayout,
    destination: &mut [f32],
) -> Result<(), PreprocessError> {
    let count = check_source(source, dims)?;
    let required = tensor_len(dims, count)?;
    check_destination(destination.len(), required, dims)?;

    match layout {
        TensorLayout::Hwc => {
            for (out, &pixel) in destination[..required]
                .chunks_exact_mut(CHANNELS)
                .zip(&source[..count])
            {
                out.copy_from_slice(&normalize_channels(pixel, params));
            }
        }
        TensorLayout::Chw => {
            for (i, &pixel) in source[..count].iter().enumerate() {
                for (c, value) in normalize_channels(pixel, params).into_iter().enumerate() {
                    destination[tensor_index(layout, count, i, c)] = value;
                }
            }
        }
    }

    Ok(())
}

/// Same as [`normalize_tensor`], writing native-endian `f32` bytes
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or either buffer is
/// too small. Nothing is written in that case.
pub fn normalize_tensor_bytes(
    source: &[u32],
    dims: Dimensions,
    params: &NormalizationParams,
    layout: TensorLayout,
    destination: &mut [u8],
) -> Result<(), PreprocessError> {
    let count = check_source(source, dims)?;
    let required = OutputFormat::Tensor(layout).required_bytes(dims)?;
    check_destination(destination.len(), required, dims)?;

    const WIDTH: usize = size_of::<f32>();
    for (i, &pixel) in source[..count].iter().enumerate() {
        for (c, value) in normalize_channels(pixel, params).into_iter().enumerate() {
            let offset = tensor_index(layout, count, i, c) * WIDTH;
            destination[offset..offset + WIDTH].copy_from_slice(&value.to_ne_bytes());
        }
    }

    Ok(())
}

/// Allocate and fill a tensor for `dims` pixels of `source`
///
/// # Errors
///
/// Returns an error if the dimensions are invalid or `source` is too small
pub fn normalized_tensor(
    source: &[u32],
    dims: Dimensions,
    params: &NormalizationParams,
    layout: TensorLayout,
) -> Result<Vec<f32>, PreprocessError> {
    let count = check_source(source, dims)?;
    let mut tensor = vec![0.0_f32; tensor_len(dims, count)?];
    normalize_tensor(source, dims, params, layout, &mut tensor)?;
    Ok(tensor)
}
