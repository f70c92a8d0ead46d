pub mod analysis_result;
pub mod histogram;
pub mod percentages;
pub mod pixel_grid;

pub use analysis_result::{AnalysisResult, Batch};
pub use histogram::{Histogram, HistogramBuilder};
pub use percentages::{Percentage, PercentageComputer};
pub use pixel_grid::PixelGrid;
