use crate::types::Dimensions;
use std::path::PathBuf;
use thiserror::Error;

/// Contract violations detected before the normalizer writes anything
#[derive(Debug, Error, PartialEq)]
pub enum PreprocessError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Invalid normalization parameters: mean={mean}, std={std}")]
    InvalidParams { mean: f32, std: f32 },

    #[error("Source holds {actual} pixels, {dimensions} needs {required}")]
    SourceTooSmall {
        dimensions: Dimensions,
        required: usize,
        actual: usize,
    },

    #[error("Destination holds {actual} elements, {dimensions} needs {required}")]
    DestinationTooSmall {
        dimensions: Dimensions,
        required: usize,
        actual: usize,
    },

    #[error("Buffer size for {dimensions} overflows")]
    SizeOverflow { dimensions: Dimensions },
}

/// Error type that records which stage of per-file processing failed
#[derive(Debug, Error)]
pub enum ProcessError {
    /// File could not be opened or decoded as an image
    #[error("{0:#}")]
    LoadFailed(anyhow::Error),

    /// Image decoded, but the normalizer rejected it
    #[error("Normalization failed for {path}: {source}")]
    NormalizeFailed {
        path: PathBuf,
        #[source]
        source: PreprocessError,
    },

    /// Output produced but could not be written
    #[error("{0:#}")]
    WriteFailed(anyhow::Error),
}
