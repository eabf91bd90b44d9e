use crate::source::PackedImage;
use crate::types::{Dimensions, NormalizationParams, OutputFormat};

#[derive(Debug, Clone, PartialEq)]
pub enum OutputStats {
    Packed { nonzero: usize, total: usize },
    Tensor { min: f32, max: f32, mean: f32 },
}

impl OutputStats {
    #[must_use]
    pub fn from_bytes(format: OutputFormat, bytes: &[u8]) -> Self {
        match format {
            OutputFormat::Packed => {
                let words = bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]));
                let (nonzero, total) = words.fold((0, 0), |(nonzero, total), word| {
                    (nonzero + usize::from(word != 0), total + 1)
                });
                Self::Packed { nonzero, total }
            }
            OutputFormat::Tensor(_) => {
                let (min, max, sum, count) = bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                    .fold(
                        (f32::INFINITY, f32::NEG_INFINITY, 0.0_f64, 0usize),
                        |(min, max, sum, count), v| (min.min(v), max.max(v), sum + f64::from(v), count + 1),
                    );
                let mean = if count > 0 { (sum / count as f64) as f32 } else { 0.0 };
                Self::Tensor { min, max, mean }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dimensions: Dimensions,
    pub format: OutputFormat,
    pub params: NormalizationParams,
    pub byte_len: usize,
    pub stats: OutputStats,
}

impl Summary {
    #[must_use]
    pub fn new(image: &PackedImage, format: OutputFormat, params: NormalizationParams, output: &[u8]) -> Self {
        Self {
            dimensions: image.dimensions,
            format,
            params,
            byte_len: output.len(),
            stats: OutputStats::from_bytes(format, output),
        }
    }
}

pub fn print_summary(summary: &Summary) {
    println!("{:20}: {}", "Dimensions", summary.dimensions);
    println!("{:20}: {}", "Format", summary.format);
    println!("{:20}: {}", "Normalization", summary.params);
    println!("{:20}: {}", "Buffer Size", summary.byte_len);

    match summary.stats {
        OutputStats::Packed { nonzero, total } => {
            println!("{:20}: {nonzero}/{total}", "Non-zero Words");
        }
        OutputStats::Tensor { min, max, mean } => {
            println!("{:20}: [{min:.4}, {max:.4}]", "Value Range");
            println!("{:20}: {mean:.4}", "Mean Value");
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TensorLayout;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    #[test]
    fn test_packed_stats_count_nonzero_words() {
        let bytes: Vec<u8> = [0u32, 0x0001_0101, 0, 0xFFFF_FFFF]
            .iter()
            .flat_map(|w| w.to_ne_bytes())
            .collect();

        assert_eq!(
            OutputStats::from_bytes(OutputFormat::Packed, &bytes),
            OutputStats::Packed { nonzero: 2, total: 4 }
        );
    }

    #[test]
    fn test_tensor_stats() {
        let bytes: Vec<u8> = [-1.0_f32, 0.5, 1.0, -0.5]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();

        let stats = OutputStats::from_bytes(OutputFormat::Tensor(TensorLayout::Hwc), &bytes);
        assert_matches!(stats, OutputStats::Tensor { min, max, mean } => {
            assert_relative_eq!(min, -1.0);
            assert_relative_eq!(max, 1.0);
            assert_relative_eq!(mean, 0.0);
        });
    }

    #[test]
    fn test_summary_from_image() {
        let image = PackedImage::new(Dimensions::new(2, 1), vec![0xFFFF_FFFF, 0xFF80_8080]).unwrap();
        let params = NormalizationParams::default();
        let output = image.normalized_bytes(&params, OutputFormat::Packed).unwrap();

        let summary = Summary::new(&image, OutputFormat::Packed, params, &output);

        assert_eq!(summary.byte_len, 8);
        assert_eq!(summary.stats, OutputStats::Packed { nonzero: 1, total: 2 });
    }
}
