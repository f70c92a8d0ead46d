use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    Settings(String),
    #[error("Class Registry Error: {0}")]
    Registry(#[from] RegistryError),
    #[error("{0}")]
    Batch(#[from] BatchProcessingError),
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize chart series: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No mask files found in the given inputs")]
    NoInputs,
}

// Raised when the bytes of one input are not a decodable raster image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to decode {filename}: {reason}")]
pub struct DecodeError {
    pub filename: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}

// Per-file failure inside a batch
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read {filename}: {source}")]
    Load {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Analysis of {filename} timed out")]
    TimedOut { filename: String },
    #[error("Analysis worker for {filename} failed: {reason}")]
    Worker { filename: String, reason: String },
}

impl AnalysisError {
    pub fn filename(&self) -> &str {
        match self {
            AnalysisError::Load { filename, .. } => filename,
            AnalysisError::Decode(e) => &e.filename,
            AnalysisError::TimedOut { filename } => filename,
            AnalysisError::Worker { filename, .. } => filename,
        }
    }
}

/// One failed input of a batch, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub index: usize,
    pub filename: String,
    pub reason: String,
}

/// The whole batch was rejected because at least one input failed.
///
/// The displayed message stays generic; the individual failures are available
/// through [`BatchProcessingError::failures`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error processing files. Please make sure they are valid image files.")]
pub struct BatchProcessingError {
    failures: Vec<FileFailure>,
}

impl BatchProcessingError {
    pub fn new(failures: Vec<FileFailure>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("The class table is empty")]
    Empty,
    #[error("Class ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },
    #[error("Duplicate class name: {0}")]
    DuplicateName(String),
    #[error("Class {0} has an empty name")]
    EmptyName(u32),
    #[error("Excluded class {0} is not registered")]
    UnknownExcludedClass(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_error_message_is_generic() {
        let error = BatchProcessingError::new(vec![FileFailure {
            index: 1,
            filename: "broken.png".to_string(),
            reason: "bad header".to_string(),
        }]);
        let message = error.to_string();
        assert!(!message.contains("broken.png"));
        assert_eq!(error.failures()[0].filename, "broken.png");
    }

    #[test]
    fn analysis_error_reports_filename() {
        let error = AnalysisError::from(DecodeError::new("a.png", "truncated"));
        assert_eq!(error.filename(), "a.png");
        assert_eq!(error.to_string(), "Failed to decode a.png: truncated");
    }
}
