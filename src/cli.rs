use crate::error::PreprocessError;
use crate::types::{Dimensions, NormalizationParams, OutputFormat, TensorLayout, IMAGE_MEAN, IMAGE_STD};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// Truncated channels repacked into one 32-bit word per pixel
    Packed,
    /// Three 32-bit floats per pixel
    Tensor,
}

/// Normalize images the way the on-device classifier preprocessing does
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image file(s) to preprocess
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Model input width in pixels
    #[arg(short = 'W', long, default_value_t = 128)]
    pub width: u32,

    /// Model input height in pixels
    #[arg(short = 'H', long, default_value_t = 128)]
    pub height: u32,

    /// Output buffer format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Packed)]
    pub format: FormatArg,

    /// Tensor layout (hwc or chw), ignored for packed output
    #[arg(long, default_value = "hwc")]
    pub layout: TensorLayout,

    /// Value subtracted from every channel
    #[arg(long, default_value_t = IMAGE_MEAN)]
    pub mean: f32,

    /// Value every centered channel is divided by
    #[arg(long, default_value_t = IMAGE_STD)]
    pub std: f32,

    /// Directory to write raw output buffers into
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print a summary of each output buffer
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the native greeting and exit
    #[arg(long)]
    pub greet: bool,
}

impl Args {
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        match self.format {
            FormatArg::Packed => OutputFormat::Packed,
            FormatArg::Tensor => OutputFormat::Tensor(self.layout),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `--mean`/`--std` are not usable
    pub fn params(&self) -> Result<NormalizationParams, PreprocessError> {
        NormalizationParams::new(self.mean, self.std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults_match_model_input() {
        let args = Args::try_parse_from(["pixprep", "cat.png"]).unwrap();

        assert_eq!(args.dimensions(), crate::types::MODEL_INPUT);
        assert_eq!(args.output_format(), OutputFormat::Packed);
        assert_eq!(args.params().unwrap(), NormalizationParams::default());
        assert!(!args.verbose && !args.greet);
    }

    #[test]
    fn test_tensor_layout_flag() {
        let args = Args::try_parse_from(["pixprep", "-f", "tensor", "--layout", "chw", "a.png"]).unwrap();
        assert_eq!(args.output_format(), OutputFormat::Tensor(TensorLayout::Chw));

        assert!(Args::try_parse_from(["pixprep", "--layout", "nchw", "a.png"]).is_err());
    }

    #[test]
    fn test_zero_std_rejected() {
        let args = Args::try_parse_from(["pixprep", "--std", "0", "a.png"]).unwrap();
        assert_matches!(args.params(), Err(PreprocessError::InvalidParams { .. }));
    }
}
