pub mod batch_analyzer;
pub mod mask_analyzer;
pub mod service;

pub use batch_analyzer::{BatchAnalyzer, BatchAnalyzerBuilder};
pub use mask_analyzer::MaskAnalyzer;
pub use service::analyzer_service::AnalyzerService;
