use crate::classes::ClassRegistry;
use crate::pipeline::domain::{Batch, Percentage};

pub const CSV_FILENAME: &str = "artifact_analysis.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Renders a batch as `Filename,<class names>,Total Pixels` rows.
pub struct CsvExporter<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> CsvExporter<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.registry.class_count() + 2);
        header.push("Filename".to_string());
        header.extend(self.registry.names().map(String::from));
        header.push("Total Pixels".to_string());
        header
    }

    pub fn render(&self, batch: &Batch) -> String {
        let mut rows = Vec::with_capacity(batch.len() + 1);
        rows.push(join_row(&self.header()));

        for result in batch.results() {
            let mut row = Vec::with_capacity(self.registry.class_count() + 2);
            row.push(result.filename().to_string());
            row.extend(
                (0..self.registry.class_count())
                    .map(|i| format_percentage(result.percentages().get(i).copied().flatten())),
            );
            row.push(result.total_pixels().to_string());
            rows.push(join_row(&row));
        }

        rows.join("\n")
    }
}

/// Undefined percentages become an empty cell, never `0.00`.
pub fn format_percentage(value: Percentage) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => String::new(),
    }
}

pub(crate) fn join_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
