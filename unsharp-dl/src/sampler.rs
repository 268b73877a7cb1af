//! Per-image loading with shape validation and random cropping.

use crate::{
    catalog::Catalog,
    common::*,
    decoder::ImageDecoder,
    error::GeneratorError,
    processor::{RandomScaleCrop, RandomScaleCropInit, NUM_CHANNELS},
    utils::PixelSize,
};

/// Loads source images and cuts them into target-sized crops.
///
/// Images that fail to decode, are not 3-channel color images, or are
/// smaller than the target size are replaced by random catalog entries.
#[derive(Debug, Clone)]
pub struct Sampler {
    crop: RandomScaleCrop,
    max_attempts: Option<NonZeroUsize>,
}

impl Sampler {
    /// Create a sampler.
    ///
    /// * `target_size` - The output image size.
    /// * `max_attempts` - If set, the maximum number of unusable images tolerated
    ///   per sample. The sample fails on the next unusable image. Otherwise it
    ///   retries forever.
    pub fn new(target_size: PixelSize, max_attempts: Option<NonZeroUsize>) -> Result<Self> {
        let crop = RandomScaleCropInit { target_size }.build()?;
        Ok(Self { crop, max_attempts })
    }

    pub fn target_size(&self) -> PixelSize {
        self.crop.target_size()
    }

    /// Load the image at `path`, or a random replacement if it is unusable,
    /// and crop it to the target size.
    pub fn sample<R>(
        &self,
        rng: &mut R,
        catalog: &Catalog,
        decoder: &dyn ImageDecoder,
        path: &Path,
    ) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        let image = self.load_usable(rng, catalog, decoder, path)?;
        self.crop.forward(rng, &image)
    }

    fn load_usable<R>(
        &self,
        rng: &mut R,
        catalog: &Catalog,
        decoder: &dyn ImageDecoder,
        path: &Path,
    ) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        let mut path = path.to_owned();
        let mut num_failures = 0;

        loop {
            let result = decoder
                .decode(&path)
                .and_then(|image| self.validate(image));

            let err = match result {
                Ok(image) => return Ok(image),
                Err(err) => err,
            };
            num_failures += 1;

            if let Some(max_attempts) = self.max_attempts {
                if num_failures > max_attempts.get() {
                    return Err(GeneratorError::DataUnavailable {
                        reason: format!(
                            "no usable image found after {} attempts, last error: {:#}",
                            num_failures, err
                        ),
                    }
                    .into());
                }
            }

            let replacement = catalog.choose(rng);
            warn!(
                "unable to use image '{}': {:#}, replacing with '{}'",
                path.display(),
                err,
                replacement.display()
            );
            path = replacement.to_owned();
        }
    }

    fn validate(&self, image: ArrayD<f32>) -> Result<Array3<f32>> {
        ensure!(
            image.ndim() == 3,
            "expect a 3-dimensional image, but get shape {:?}",
            image.shape()
        );
        let image = image.into_dimensionality::<Ix3>()?;
        let (height, width, channels) = image.dim();
        ensure!(
            channels == NUM_CHANNELS,
            "expect {} channels, but get {}",
            NUM_CHANNELS,
            channels
        );

        let target_size = self.target_size();
        ensure!(
            PixelSize::new(height, width).covers(&target_size),
            "image size {}x{} is smaller than the target size {}x{}",
            height,
            width,
            target_size.height,
            target_size.width
        );

        Ok(image)
    }
}
