use crate::pipeline::domain::{Histogram, Percentage, PixelGrid};

// Markers to track how far a mask has travelled through the pipeline
pub struct LoadedState;
pub struct DecodedState {
    pub(super) grid: PixelGrid,
}
pub struct CountedState {
    pub(super) histogram: Histogram,
    pub(super) total_pixels: u64,
}
pub struct MeasuredState {
    pub(super) histogram: Histogram,
    pub(super) total_pixels: u64,
    pub(super) percentages: Vec<Percentage>,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for LoadedState {
    fn state_name() -> &'static str {
        "Loaded"
    }
}

impl ProcessingState for DecodedState {
    fn state_name() -> &'static str {
        "Decoded"
    }
}

impl ProcessingState for CountedState {
    fn state_name() -> &'static str {
        "Counted"
    }
}

impl ProcessingState for MeasuredState {
    fn state_name() -> &'static str {
        "Measured"
    }
}
