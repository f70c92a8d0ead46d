pub mod registry;

pub use registry::{ClassDefinition, ClassId, ClassRegistry};
