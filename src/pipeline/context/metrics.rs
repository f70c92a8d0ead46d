use std::time::Duration;

/// Timings collected while one mask is analyzed
#[derive(Debug, Clone, Default)]
pub struct MaskMetrics {
    decode_duration: Option<Duration>,
    histogram_duration: Option<Duration>,
    percentage_duration: Option<Duration>,
}

impl MaskMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_decode_duration(&mut self, duration: Duration) {
        self.decode_duration = Some(duration);
    }

    pub fn record_histogram_duration(&mut self, duration: Duration) {
        self.histogram_duration = Some(duration);
    }

    pub fn record_percentage_duration(&mut self, duration: Duration) {
        self.percentage_duration = Some(duration);
    }

    pub fn decode_duration(&self) -> Option<Duration> {
        self.decode_duration
    }

    pub fn histogram_duration(&self) -> Option<Duration> {
        self.histogram_duration
    }

    pub fn percentage_duration(&self) -> Option<Duration> {
        self.percentage_duration
    }
}
