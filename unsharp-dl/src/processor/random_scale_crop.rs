//! The random rescale-then-crop sampling.

use super::{check_rgb, clip_unit, resize::resize};
use crate::{common::*, utils::PixelSize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomScaleCropInit {
    /// The output image size.
    pub target_size: PixelSize,
}

impl RandomScaleCropInit {
    pub fn build(self) -> Result<RandomScaleCrop> {
        let Self { target_size } = self;
        let PixelSize { height, width } = target_size;
        ensure!(
            height > 0 && width > 0,
            "target size must be positive, but get {}x{}",
            height,
            width
        );
        Ok(RandomScaleCrop { target_size })
    }
}

/// Shrinks an image by a random factor and crops a random window of the
/// target size out of it.
#[derive(Debug, Clone)]
pub struct RandomScaleCrop {
    target_size: PixelSize,
}

impl RandomScaleCrop {
    pub fn target_size(&self) -> PixelSize {
        self.target_size
    }

    /// The smallest uniform scaling factor that makes the image cover the target size.
    pub fn min_scale(&self, size: &PixelSize) -> f64 {
        let PixelSize { height, width } = self.target_size;
        (height as f64 / size.height as f64).max(width as f64 / size.width as f64)
    }

    /// Draw a scaling factor within `[min_scale, 1.0]`.
    ///
    /// Images smaller than the target size always get the minimum scale.
    pub fn sample_scale<R>(&self, rng: &mut R, size: &PixelSize) -> f64
    where
        R: Rng + ?Sized,
    {
        let min_scale = self.min_scale(size);
        if min_scale < 1.0 {
            rng.gen_range(min_scale..=1.0)
        } else {
            min_scale
        }
    }

    pub fn forward<R>(&self, rng: &mut R, image: &Array3<f32>) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        check_rgb(image)?;
        let (orig_h, orig_w, _) = image.dim();
        let PixelSize {
            height: target_h,
            width: target_w,
        } = self.target_size;

        let scale = self.sample_scale(rng, &PixelSize::new(orig_h, orig_w));

        // rounding of the minimum scale must not make the crop window miss
        let resized_size = PixelSize::new(
            ((orig_h as f64 * scale) as usize).max(target_h),
            ((orig_w as f64 * scale) as usize).max(target_w),
        );
        let resized = resize(image, resized_size);

        let left = rng.gen_range(0..=(resized_size.width - target_w));
        let top = rng.gen_range(0..=(resized_size.height - target_h));
        let cropped = resized
            .slice(s![top..(top + target_h), left..(left + target_w), ..])
            .to_owned();

        Ok(clip_unit(cropped))
    }
}
