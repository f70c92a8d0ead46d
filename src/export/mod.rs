pub mod chart;
pub mod csv;
pub mod summary;

pub use chart::{ChartPoint, chart_series, chart_series_json};
pub use csv::{CSV_FILENAME, CSV_MIME_TYPE, CsvExporter};
pub use summary::{ClassSummary, SUMMARY_FILENAME, SummaryStatistics};
