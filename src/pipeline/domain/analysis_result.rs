use super::percentages::Percentage;
use crate::classes::ClassId;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Class percentages of a single mask file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    filename: String,
    percentages: Vec<Percentage>,
    total_pixels: u64,
}

impl AnalysisResult {
    pub fn new(filename: impl Into<String>, percentages: Vec<Percentage>, total_pixels: u64) -> Self {
        Self {
            filename: filename.into(),
            percentages,
            total_pixels,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Percentages in registry order, one per class.
    pub fn percentages(&self) -> &[Percentage] {
        &self.percentages
    }

    pub fn percentage(&self, class: ClassId) -> Percentage {
        if class == 0 {
            return None;
        }
        self.percentages.get(class as usize - 1).copied().flatten()
    }

    pub fn total_pixels(&self) -> u64 {
        self.total_pixels
    }

    pub fn is_undefined(&self) -> bool {
        self.percentages.iter().all(Option::is_none)
    }

    /// Filename with the mask suffix removed, e.g. `slide_01_mask.png` -> `slide_01`.
    pub fn slide_name(&self, mask_suffix: &str) -> &str {
        self.filename
            .strip_suffix(mask_suffix)
            .unwrap_or(&self.filename)
    }
}

/// Results of one upload, in upload order.
#[derive(Debug, Clone)]
pub struct Batch {
    id: Uuid,
    results: Vec<AnalysisResult>,
    completed_at: DateTime<Utc>,
}

impl Batch {
    pub fn new(results: Vec<AnalysisResult>) -> Self {
        Self::with_id(Uuid::new_v4(), results)
    }

    pub fn with_id(id: Uuid, results: Vec<AnalysisResult>) -> Self {
        Self {
            id,
            results,
            completed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
