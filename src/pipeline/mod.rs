pub mod context;
pub mod decode;
pub mod domain;
pub mod orchestration;

pub use decode::{ClassEncoding, EncodingKind, MaskDecoder};
pub use domain::{AnalysisResult, Batch, Histogram, Percentage, PixelGrid};
pub use orchestration::{BatchAnalyzer, BatchAnalyzerBuilder, MaskAnalyzer};
