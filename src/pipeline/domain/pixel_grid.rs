/// Per-pixel raw class values of one decoded mask, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    values: Vec<u32>,
}

impl PixelGrid {
    /// Returns `None` when `values` does not cover exactly `width * height` cells.
    pub fn new(width: u32, height: u32, values: Vec<u32>) -> Option<Self> {
        if values.len() as u64 != width as u64 * height as u64 {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        self.values.len() as u64
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }
}
