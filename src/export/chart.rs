use crate::classes::ClassRegistry;
use crate::pipeline::domain::{Batch, Percentage};
use indexmap::IndexMap;
use serde::Serialize;

/// One x-axis point of the trend chart: a file and its class percentages.
///
/// Serializes flat, e.g. `{"name": "a.png", "Normal Tissue": 66.67, ...}`;
/// undefined percentages become `null` so the chart shows a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    #[serde(flatten)]
    pub values: IndexMap<String, Percentage>,
}

impl ChartPoint {
    pub fn value(&self, class_name: &str) -> Percentage {
        self.values.get(class_name).copied().flatten()
    }
}

pub fn chart_series(registry: &ClassRegistry, batch: &Batch) -> Vec<ChartPoint> {
    batch
        .results()
        .iter()
        .map(|result| {
            let values = registry
                .classes()
                .iter()
                .enumerate()
                .map(|(i, class)| {
                    (
                        class.name.clone(),
                        result.percentages().get(i).copied().flatten(),
                    )
                })
                .collect();
            ChartPoint {
                name: result.filename().to_string(),
                values,
            }
        })
        .collect()
}

pub fn chart_series_json(
    registry: &ClassRegistry,
    batch: &Batch,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&chart_series(registry, batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::AnalysisResult;
    use serde_json::{Value, json};

    fn batch() -> Batch {
        Batch::new(vec![
            AnalysisResult::new(
                "a_mask.png",
                vec![
                    Some(66.67),
                    Some(33.33),
                    Some(0.0),
                    Some(0.0),
                    Some(0.0),
                    Some(33.33),
                ],
                4,
            ),
            AnalysisResult::new("empty_mask.png", vec![None; 6], 9),
        ])
    }

    #[test]
    fn one_point_per_result_keyed_by_class_name() {
        let registry = ClassRegistry::grandqc();
        let series = chart_series(&registry, &batch());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "a_mask.png");
        assert_eq!(series[0].value("Normal Tissue"), Some(66.67));
        assert_eq!(series[0].value("Out of Focus"), Some(33.33));

        let keys: Vec<&str> = series[0].values.keys().map(String::as_str).collect();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(keys, names);
    }

    #[test]
    fn serializes_flat_with_null_for_undefined() {
        let registry = ClassRegistry::grandqc();
        let json: Value = serde_json::from_str(&chart_series_json(&registry, &batch()).unwrap()).unwrap();

        assert_eq!(json[0]["name"], json!("a_mask.png"));
        assert_eq!(json[0]["Tissue Fold"], json!(33.33));
        assert_eq!(json[0]["Pen Marking"], json!(0.0));
        assert_eq!(json[1]["Normal Tissue"], Value::Null);
        assert_eq!(json[1].as_object().unwrap().len(), 7);
    }
}
