pub mod mask_context;
pub mod metrics;
pub mod state;

pub use mask_context::MaskContext;
pub use metrics::MaskMetrics;
