pub mod discovery;
pub mod mask;

pub use mask::{MaskFile, MaskInput, MaskSource};
