use super::encoding::{ChannelEncoding, ClassEncoding};
use crate::common::MaskInput;
use crate::error::DecodeError;
use crate::pipeline::domain::PixelGrid;
use std::sync::Arc;
use tracing::debug;

/// Decodes mask images into per-pixel class values.
#[derive(Clone)]
pub struct MaskDecoder {
    encoding: Arc<dyn ClassEncoding>,
}

impl MaskDecoder {
    pub fn new(encoding: Box<dyn ClassEncoding>) -> Self {
        Self {
            encoding: Arc::from(encoding),
        }
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn decode(&self, input: &MaskInput) -> Result<PixelGrid, DecodeError> {
        let image = image::load_from_memory(input.bytes())
            .map_err(|e| DecodeError::new(input.filename(), e.to_string()))?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        debug!(
            "Decoded {} ({}x{}, {} encoding)",
            input.filename(),
            width,
            height,
            self.encoding.name()
        );

        let values = rgba
            .pixels()
            .map(|pixel| self.encoding.class_value(pixel))
            .collect();

        PixelGrid::new(width, height, values).ok_or_else(|| {
            DecodeError::new(input.filename(), "pixel buffer does not match dimensions")
        })
    }
}

impl Default for MaskDecoder {
    fn default() -> Self {
        Self::new(Box::new(ChannelEncoding::red()))
    }
}
