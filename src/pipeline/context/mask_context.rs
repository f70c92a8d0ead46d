use crate::common::MaskInput;
use crate::pipeline::context::metrics::MaskMetrics;
use crate::pipeline::context::state::{
    CountedState, DecodedState, LoadedState, MeasuredState, ProcessingState,
};
use crate::pipeline::domain::{AnalysisResult, Histogram, Percentage, PixelGrid};
use std::time::{Duration, Instant};

// MaskContext with compile-time stage tracking via the state parameter
pub struct MaskContext<S> {
    input: MaskInput,
    metrics: MaskMetrics,
    processing_start: Instant,
    stage_start: Instant,
    state: S,
}

impl<S: ProcessingState> MaskContext<S> {
    pub fn input(&self) -> &MaskInput {
        &self.input
    }

    pub fn filename(&self) -> &str {
        self.input.filename()
    }

    pub fn metrics(&self) -> &MaskMetrics {
        &self.metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }

    pub fn stage(&self) -> &'static str {
        S::state_name()
    }

    fn advance<T>(self, state: T) -> MaskContext<T> {
        MaskContext {
            input: self.input,
            metrics: self.metrics,
            processing_start: self.processing_start,
            stage_start: Instant::now(),
            state,
        }
    }
}

impl MaskContext<LoadedState> {
    pub fn new(input: MaskInput) -> Self {
        let now = Instant::now();
        Self {
            input,
            metrics: MaskMetrics::new(),
            processing_start: now,
            stage_start: now,
            state: LoadedState,
        }
    }

    pub fn into_decoded(mut self, grid: PixelGrid) -> MaskContext<DecodedState> {
        self.metrics.record_decode_duration(self.stage_start.elapsed());
        self.advance(DecodedState { grid })
    }
}

impl MaskContext<DecodedState> {
    pub fn grid(&self) -> &PixelGrid {
        &self.state.grid
    }

    /// The pixel grid is released here; only its histogram moves on.
    pub fn into_counted(mut self, histogram: Histogram) -> MaskContext<CountedState> {
        self.metrics.record_histogram_duration(self.stage_start.elapsed());
        let total_pixels = self.state.grid.pixel_count();
        self.advance(CountedState {
            histogram,
            total_pixels,
        })
    }
}

impl MaskContext<CountedState> {
    pub fn histogram(&self) -> &Histogram {
        &self.state.histogram
    }

    pub fn total_pixels(&self) -> u64 {
        self.state.total_pixels
    }

    pub fn into_measured(mut self, percentages: Vec<Percentage>) -> MaskContext<MeasuredState> {
        self.metrics
            .record_percentage_duration(self.stage_start.elapsed());
        let CountedState {
            histogram,
            total_pixels,
        } = self.state;
        MaskContext {
            input: self.input,
            metrics: self.metrics,
            processing_start: self.processing_start,
            stage_start: Instant::now(),
            state: MeasuredState {
                histogram,
                total_pixels,
                percentages,
            },
        }
    }
}

impl MaskContext<MeasuredState> {
    pub fn histogram(&self) -> &Histogram {
        &self.state.histogram
    }

    pub fn percentages(&self) -> &[Percentage] {
        &self.state.percentages
    }

    pub fn into_result(self) -> AnalysisResult {
        AnalysisResult::new(
            self.input.filename(),
            self.state.percentages,
            self.state.total_pixels,
        )
    }
}
