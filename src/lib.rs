pub mod cli;
pub mod error;
pub mod greeting;
pub mod jni_bridge;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod source;
pub mod types;

// Re-export commonly used items
pub use error::{PreprocessError, ProcessError};
pub use greeting::greet;
pub use normalize::normalize;
pub use types::{Dimensions, NormalizationParams, OutputFormat, TensorLayout, MODEL_INPUT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
