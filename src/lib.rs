pub mod classes;
pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod session;

pub use classes::{ClassDefinition, ClassId, ClassRegistry};
pub use common::{MaskFile, MaskInput, MaskSource};
pub use crate::config::Settings;
pub use error::{AnalysisError, AppError, BatchProcessingError, DecodeError, RegistryError};
pub use pipeline::{AnalysisResult, Batch, BatchAnalyzer, Percentage};
pub use session::{Session, SessionState, UploadOutcome};
