use super::csv::{format_percentage, join_row};
use crate::classes::ClassRegistry;
use crate::pipeline::domain::Batch;
use crate::pipeline::domain::percentages::round2;

pub const SUMMARY_FILENAME: &str = "summary_statistics.csv";

/// Aggregate of one class column across a batch. Files whose percentage is
/// undefined are left out; every field is `None` when nothing is left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ClassSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(variance.sqrt())
        } else {
            None
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            mean: Some(mean),
            std,
            min: Some(min),
            max: Some(max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    classes: Vec<(String, ClassSummary)>,
}

impl SummaryStatistics {
    pub fn from_batch(registry: &ClassRegistry, batch: &Batch) -> Self {
        let classes = registry
            .classes()
            .iter()
            .enumerate()
            .map(|(i, class)| {
                let values: Vec<f64> = batch
                    .results()
                    .iter()
                    .filter_map(|r| r.percentages().get(i).copied().flatten())
                    .collect();
                (class.name.clone(), ClassSummary::from_values(&values))
            })
            .collect();
        Self { classes }
    }

    pub fn classes(&self) -> &[(String, ClassSummary)] {
        &self.classes
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassSummary> {
        self.classes
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, summary)| summary)
    }

    /// Header `,<class names>` followed by `mean`, `std`, `min` and `max` rows.
    pub fn to_csv(&self) -> String {
        let mut header = vec![String::new()];
        header.extend(self.classes.iter().map(|(name, _)| name.clone()));

        let stat_row = |label: &str, pick: fn(&ClassSummary) -> Option<f64>| {
            let mut row = vec![label.to_string()];
            row.extend(
                self.classes
                    .iter()
                    .map(|(_, summary)| format_percentage(pick(summary).map(round2))),
            );
            join_row(&row)
        };

        [
            join_row(&header),
            stat_row("mean", |s| s.mean),
            stat_row("std", |s| s.std),
            stat_row("min", |s| s.min),
            stat_row("max", |s| s.max),
        ]
        .join("\n")
    }
}
