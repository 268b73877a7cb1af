//! Decoding image files into pixel arrays.

use crate::common::*;

/// Decodes image files into arrays of samples within `[0, 1]`.
///
/// Color images are `(height, width, channel)` arrays. Decoders may return
/// arrays of other dimensions, for example for grayscale images, which the
/// sampler rejects.
pub trait ImageDecoder
where
    Self: Debug + Send + Sync,
{
    fn decode(&self, path: &Path) -> Result<ArrayD<f32>>;
}

/// The decoder backed by the image crate.
///
/// Grayscale images are decoded to 2-D arrays and the alpha channel of
/// color images is dropped.
#[derive(Debug, Clone, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<ArrayD<f32>> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode image file '{}'", path.display()))?;

        let array = if image.color().has_color() {
            let rgb = image.into_rgb32f();
            let (width, height) = rgb.dimensions();
            Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())?
                .into_dyn()
        } else {
            let luma = image.into_luma8();
            let (width, height) = luma.dimensions();
            Array2::from_shape_vec((height as usize, width as usize), luma.into_raw())?
                .mapv(|value| value as f32 / 255.0)
                .into_dyn()
        };

        Ok(array)
    }
}
