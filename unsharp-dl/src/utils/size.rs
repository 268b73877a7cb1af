use crate::common::*;

/// The height and width of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub height: usize,
    pub width: usize,
}

impl PixelSize {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub fn try_new(height: usize, width: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "height and width must be positive, but get {}x{}",
            height,
            width
        );
        Ok(Self { height, width })
    }

    pub fn hw(&self) -> [usize; 2] {
        [self.height, self.width]
    }

    /// Check if this size is at least as large as `other` on both axes.
    pub fn covers(&self, other: &PixelSize) -> bool {
        self.height >= other.height && self.width >= other.width
    }
}

impl Default for PixelSize {
    fn default() -> Self {
        Self::new(256, 256)
    }
}
