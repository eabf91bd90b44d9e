//! Domain-specific types for bitmap preprocessing

use crate::error::PreprocessError;
use std::fmt;
use std::str::FromStr;

/// Mean subtracted from every 8-bit channel before scaling
pub const IMAGE_MEAN: f32 = 127.5;

/// Scale each channel is divided by after centering
pub const IMAGE_STD: f32 = 127.5;

/// Input size expected by the classification model
pub const MODEL_INPUT: Dimensions = Dimensions::new(128, 128);

/// Number of color channels consumed from each packed pixel
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build dimensions from signed sizes as reported by the JVM
    ///
    /// # Errors
    ///
    /// Returns an error if either size is negative or zero
    pub fn from_signed(width: i32, height: i32) -> Result<Self, PreprocessError> {
        let invalid = || PreprocessError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        };
        let dims = Self::new(
            u32::try_from(width).map_err(|_| invalid())?,
            u32::try_from(height).map_err(|_| invalid())?,
        );
        dims.validate()?;
        Ok(dims)
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    #[inline]
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if !self.is_valid() {
            return Err(PreprocessError::InvalidDimensions {
                width: i64::from(self.width),
                height: i64::from(self.height),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{width}x{height}", width = self.width, height = self.height)
    }
}

/// Affine normalization applied to every channel: `(value - mean) / std`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationParams {
    pub mean: f32,
    pub std: f32,
}

impl NormalizationParams {
    /// # Errors
    ///
    /// Returns an error if `mean` is not finite or `std` is zero or not finite
    pub fn new(mean: f32, std: f32) -> Result<Self, PreprocessError> {
        if !mean.is_finite() || !std.is_finite() || std == 0.0 {
            return Err(PreprocessError::InvalidParams { mean, std });
        }
        Ok(Self { mean, std })
    }

    #[inline(always)]
    #[must_use]
    // Hot path: called three times per pixel
    pub fn apply(&self, channel: u8) -> f32 {
        (f32::from(channel) - self.mean) / self.std
    }
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self {
            mean: IMAGE_MEAN,
            std: IMAGE_STD,
        }
    }
}

impl fmt::Display for NormalizationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mean={mean}, std={std}", mean = self.mean, std = self.std)
    }
}

/// Memory layout of a float tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TensorLayout {
    /// r, g, b per pixel (height x width x channels)
    #[default]
    Hwc,
    /// one full plane per channel (channels x height x width)
    Chw,
}

impl FromStr for TensorLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hwc" | "interleaved" => Ok(Self::Hwc),
            "chw" | "planar" => Ok(Self::Chw),
            other => Err(format!("Unknown tensor layout: {other} (expected hwc or chw)")),
        }
    }
}

impl fmt::Display for TensorLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hwc => write!(f, "HWC"),
            Self::Chw => write!(f, "CHW"),
        }
    }
}

/// What the normalizer writes into the destination buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One truncated, repacked 32-bit word per pixel
    Packed,
    /// Three `f32` values per pixel
    Tensor(TensorLayout),
}

impl OutputFormat {
    #[inline]
    #[must_use]
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Packed => size_of::<u32>(),
            Self::Tensor(_) => CHANNELS * size_of::<f32>(),
        }
    }

    /// Number of destination bytes needed for an image of `dims`
    ///
    /// # Errors
    ///
    /// Returns an error if the size does not fit in `usize`
    pub fn required_bytes(&self, dims: Dimensions) -> Result<usize, PreprocessError> {
        dims.pixel_count()
            .checked_mul(self.bytes_per_pixel())
            .ok_or(PreprocessError::SizeOverflow { dimensions: dims })
    }

    #[must_use]
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Packed => "packed",
            Self::Tensor(TensorLayout::Hwc) => "hwc",
            Self::Tensor(TensorLayout::Chw) => "chw",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packed => write!(f, "packed u32"),
            Self::Tensor(layout) => write!(f, "f32 tensor ({layout})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    #[test]
    fn test_model_input_pixel_count() {
        assert_eq!(MODEL_INPUT.pixel_count(), 128 * 128);
        assert_eq!(MODEL_INPUT.to_string(), "128x128");
    }

    #[test]
    fn test_from_signed_rejects_negative_and_zero() {
        assert_matches!(
            Dimensions::from_signed(-1, 128),
            Err(PreprocessError::InvalidDimensions { width: -1, height: 128 })
        );
        assert_matches!(
            Dimensions::from_signed(128, 0),
            Err(PreprocessError::InvalidDimensions { .. })
        );
        assert_eq!(Dimensions::from_signed(64, 32).unwrap(), Dimensions::new(64, 32));
    }

    #[test]
    fn test_default_params_map_extremes_to_unit_range() {
        let params = NormalizationParams::default();
        assert_relative_eq!(params.apply(0), -1.0);
        assert_relative_eq!(params.apply(255), 1.0);
        assert!(params.apply(127).abs() < 0.01);
    }

    #[test]
    fn test_params_reject_zero_std() {
        assert_matches!(
            NormalizationParams::new(127.5, 0.0),
            Err(PreprocessError::InvalidParams { .. })
        );
        assert_matches!(
            NormalizationParams::new(f32::NAN, 1.0),
            Err(PreprocessError::InvalidParams { .. })
        );
    }

    #[test]
    fn test_required_bytes() {
        assert_eq!(OutputFormat::Packed.required_bytes(MODEL_INPUT).unwrap(), 128 * 128 * 4);
        assert_eq!(
            OutputFormat::Tensor(TensorLayout::Hwc).required_bytes(MODEL_INPUT).unwrap(),
            128 * 128 * 3 * 4
        );
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("CHW".parse::<TensorLayout>().unwrap(), TensorLayout::Chw);
        assert_eq!("interleaved".parse::<TensorLayout>().unwrap(), TensorLayout::Hwc);
        assert!("nhwc".parse::<TensorLayout>().is_err());
    }
}
