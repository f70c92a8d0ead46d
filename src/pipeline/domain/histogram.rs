use super::pixel_grid::PixelGrid;
use crate::classes::ClassId;

/// Pixel counts per class value `0..=N`.
///
/// Values above `N` are not counted in any bucket; they only show up in
/// [`Histogram::dropped`] so that `total() + dropped() == pixel_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
    dropped: u64,
}

impl Histogram {
    pub fn from_counts(counts: Vec<u64>, dropped: u64) -> Self {
        Self { counts, dropped }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn count(&self, class: ClassId) -> u64 {
        self.counts.get(class as usize).copied().unwrap_or(0)
    }

    /// Number of class ids covered, not counting the unclassified bucket.
    pub fn class_count(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

pub struct HistogramBuilder {
    class_count: usize,
}

impl HistogramBuilder {
    pub fn new(class_count: usize) -> Self {
        Self { class_count }
    }

    pub fn build(&self, grid: &PixelGrid) -> Histogram {
        let mut counts = vec![0u64; self.class_count + 1];
        let mut dropped = 0u64;

        for &value in grid.values() {
            match counts.get_mut(value as usize) {
                Some(bucket) => *bucket += 1,
                None => dropped += 1,
            }
        }

        Histogram { counts, dropped }
    }
}
