//! Host-side image sources
//!
//! The normalizer only understands packed 0xAARRGGBB words, the layout
//! `Bitmap.getPixels` produces on the device. These helpers turn decoded
//! `image` buffers into that layout at the model input size.

use crate::error::PreprocessError;
use crate::normalize::normalize_into_bytes;
use crate::types::{Dimensions, NormalizationParams, OutputFormat};
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};
use std::path::Path;

/// Owned row-major buffer of packed pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    pub dimensions: Dimensions,
    pub pixels: Vec<u32>,
}

impl PackedImage {
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid or `pixels` is too short
    pub fn new(dimensions: Dimensions, pixels: Vec<u32>) -> Result<Self, PreprocessError> {
        crate::normalize::check_source(&pixels, dimensions)?;
        Ok(Self { dimensions, pixels })
    }

    /// Run the normalizer into a freshly allocated buffer of `format`
    ///
    /// # Errors
    ///
    /// Returns an error if the output size overflows
    pub fn normalized_bytes(
        &self,
        params: &NormalizationParams,
        format: OutputFormat,
    ) -> Result<Vec<u8>, PreprocessError> {
        let mut output = vec![0u8; format.required_bytes(self.dimensions)?];
        normalize_into_bytes(&self.pixels, self.dimensions, params, format, &mut output)?;
        Ok(output)
    }
}

#[inline(always)]
fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from(a) << 24 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
}

#[must_use]
pub fn pack_rgb(image: &RgbImage) -> Vec<u32> {
    image
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            pack(r, g, b, 0xFF)
        })
        .collect()
}

#[must_use]
pub fn pack_rgba(image: &RgbaImage) -> Vec<u32> {
    image
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            pack(r, g, b, a)
        })
        .collect()
}

/// Resize `image` to `target` (bilinear, aspect ratio not kept) and pack it
///
/// # Errors
///
/// Returns an error if `target` has a zero dimension
pub fn prepare(image: &DynamicImage, target: Dimensions) -> Result<PackedImage, PreprocessError> {
    target.validate()?;

    let rgba = if image.dimensions() == (target.width, target.height) {
        image.to_rgba8()
    } else {
        image
            .resize_exact(target.width, target.height, FilterType::Triangle)
            .to_rgba8()
    };

    Ok(PackedImage {
        dimensions: target,
        pixels: pack_rgba(&rgba),
    })
}

/// Decode an image file and prepare it for the model input
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded, or if `target`
/// is invalid
pub fn load(path: &Path, target: Dimensions) -> Result<PackedImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image: {}", path.display()))?;

    let (width, height) = image.dimensions();
    log::debug!(
        "Decoded {} ({width}x{height}, {:?}), resizing to {target}",
        path.display(),
        image.color()
    );

    prepare(&image, target).with_context(|| format!("Failed to prepare image: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{Rgb, Rgba};

    #[test]
    fn test_pack_rgb_sets_opaque_alpha() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        image.put_pixel(1, 0, Rgb([0xFF, 0x00, 0x80]));

        assert_eq!(pack_rgb(&image), vec![0xFF12_3456, 0xFFFF_0080]);
    }

    #[test]
    fn test_pack_rgba_row_major() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(1, 0, Rgba([1, 2, 3, 4]));
        image.put_pixel(0, 1, Rgba([5, 6, 7, 8]));

        let packed = pack_rgba(&image);
        assert_eq!(packed[1], 0x0401_0203);
        assert_eq!(packed[2], 0x0805_0607);
        assert_eq!(packed[3], 0);
    }

    #[test]
    fn test_prepare_resizes_to_target() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 200, Rgb([255, 255, 255])));

        let packed = prepare(&image, Dimensions::new(128, 128)).unwrap();

        assert_eq!(packed.dimensions, Dimensions::new(128, 128));
        assert_eq!(packed.pixels.len(), 128 * 128);
        assert!(packed.pixels.iter().all(|&p| p == 0xFFFF_FFFF));
    }

    #[test]
    fn test_prepare_keeps_matching_size() {
        let mut image = RgbImage::new(4, 4);
        image.put_pixel(3, 3, Rgb([9, 8, 7]));

        let packed = prepare(&DynamicImage::ImageRgb8(image), Dimensions::new(4, 4)).unwrap();

        assert_eq!(packed.pixels[15], 0xFF09_0807);
    }

    #[test]
    fn test_prepare_rejects_zero_target() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert_matches!(
            prepare(&image, Dimensions::new(0, 4)),
            Err(PreprocessError::InvalidDimensions { .. })
        );
    }

    #[test]
    fn test_packed_image_new_checks_length() {
        assert_matches!(
            PackedImage::new(Dimensions::new(2, 2), vec![0; 3]),
            Err(PreprocessError::SourceTooSmall { required: 4, actual: 3, .. })
        );
    }

    #[test]
    fn test_normalized_bytes_sizes() {
        let packed = PackedImage::new(Dimensions::new(2, 2), vec![0xFFFF_FFFF; 4]).unwrap();
        let params = NormalizationParams::default();

        let words = packed.normalized_bytes(&params, OutputFormat::Packed).unwrap();
        assert_eq!(words.len(), 16);
        assert_eq!(&words[..4], &0x0001_0101_u32.to_ne_bytes());

        let floats = packed
            .normalized_bytes(&params, OutputFormat::Tensor(crate::types::TensorLayout::Chw))
            .unwrap();
        assert_eq!(floats.len(), 48);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("does-not-exist.png"), Dimensions::new(8, 8));
        assert!(result.is_err());
    }
}
