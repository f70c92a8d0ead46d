use crate::error::AnalysisError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Raw bytes of one uploaded mask image together with its filename.
#[derive(Debug, Clone)]
pub struct MaskInput {
    filename: String,
    bytes: Arc<[u8]>,
}

impl MaskInput {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Anything that can hand the analyzer a filename and the encoded image.
#[async_trait]
pub trait MaskSource: Send + Sync {
    fn filename(&self) -> &str;
    async fn load(&self) -> Result<MaskInput, AnalysisError>;
}

#[async_trait]
impl MaskSource for MaskInput {
    fn filename(&self) -> &str {
        &self.filename
    }

    async fn load(&self) -> Result<MaskInput, AnalysisError> {
        Ok(self.clone())
    }
}

/// A mask stored on disk, read when the batch runs.
#[derive(Debug, Clone)]
pub struct MaskFile {
    path: PathBuf,
    filename: String,
}

impl MaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, filename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MaskSource for MaskFile {
    fn filename(&self) -> &str {
        &self.filename
    }

    async fn load(&self) -> Result<MaskInput, AnalysisError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| AnalysisError::Load {
                filename: self.filename.clone(),
                source,
            })?;
        Ok(MaskInput::new(self.filename.clone(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloning_input_shares_byte_buffer() {
        let input = MaskInput::new("a_mask.png", vec![1u8, 2, 3]);
        let copy = input.clone();
        assert!(Arc::ptr_eq(&input.bytes, &copy.bytes));
    }

    #[test]
    fn mask_file_uses_file_name() {
        let file = MaskFile::new("/data/masks/slide_01_mask.png");
        assert_eq!(MaskSource::filename(&file), "slide_01_mask.png");
    }

    #[tokio::test]
    async fn loading_missing_file_fails_with_filename() {
        let file = MaskFile::new(std::env::temp_dir().join(format!(
            "maskstat-missing-{}.png",
            uuid::Uuid::new_v4()
        )));
        let error = file.load().await.unwrap_err();
        assert!(matches!(error, AnalysisError::Load { .. }));
        assert!(error.filename().starts_with("maskstat-missing-"));
    }

    #[tokio::test]
    async fn loading_file_reads_bytes() {
        let path = std::env::temp_dir().join(format!("maskstat-{}.bin", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, [7u8, 8, 9]).await.unwrap();

        let input = MaskFile::new(&path).load().await.unwrap();
        assert_eq!(input.bytes(), &[7, 8, 9]);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
