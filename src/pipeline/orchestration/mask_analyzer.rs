use crate::classes::ClassRegistry;
use crate::common::MaskInput;
use crate::error::DecodeError;
use crate::pipeline::context::MaskContext;
use crate::pipeline::decode::MaskDecoder;
use crate::pipeline::domain::{AnalysisResult, HistogramBuilder, PercentageComputer};
use std::sync::Arc;
use tracing::debug;

/// Runs decode -> histogram -> percentages for one mask.
///
/// Pure with respect to the pixel content: analyzing the same bytes twice
/// yields the same [`AnalysisResult`].
pub struct MaskAnalyzer {
    registry: Arc<ClassRegistry>,
    decoder: MaskDecoder,
    histogram_builder: HistogramBuilder,
}

impl MaskAnalyzer {
    pub fn new(registry: Arc<ClassRegistry>, decoder: MaskDecoder) -> Self {
        let histogram_builder = HistogramBuilder::new(registry.class_count());
        Self {
            registry,
            decoder,
            histogram_builder,
        }
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn analyze(&self, input: MaskInput) -> Result<AnalysisResult, DecodeError> {
        let context = MaskContext::new(input);

        let grid = self.decoder.decode(context.input())?;
        let decoded = context.into_decoded(grid);

        let histogram = self.histogram_builder.build(decoded.grid());
        let counted = decoded.into_counted(histogram);

        let percentages = PercentageComputer::new(&self.registry).compute(counted.histogram());
        let measured = counted.into_measured(percentages);

        let metrics = measured.metrics();
        let micros = |stage: Option<std::time::Duration>| stage.map_or(0, |d| d.as_micros());
        debug!(
            "Analyzed {} in {}us (decode {}us, histogram {}us, percentages {}us; {} pixels dropped as out of range)",
            measured.filename(),
            measured.elapsed().as_micros(),
            micros(metrics.decode_duration()),
            micros(metrics.histogram_duration()),
            micros(metrics.percentage_duration()),
            measured.histogram().dropped()
        );

        Ok(measured.into_result())
    }
}
