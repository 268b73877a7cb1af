//! Generator configuration format.

use crate::{common::*, degradation::DegradationInit, utils::PixelSize};

/// The generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Folders scanned for source images.
    pub image_dirs: Vec<PathBuf>,
    /// The number of images per batch.
    pub batch_size: NonZeroUsize,
    /// The output image size.
    #[serde(default)]
    pub target_size: PixelSize,
    /// The random seed. The generator is seeded from system entropy if not set.
    #[serde(default)]
    pub seed: Option<u64>,
    /// If set, the maximum number of unusable images tolerated per sample.
    #[serde(default)]
    pub max_resample_attempts: Option<NonZeroUsize>,
    /// Degradation options.
    #[serde(default)]
    pub degradation: DegradationInit,
}

impl GeneratorConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}
