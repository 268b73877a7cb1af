//! The spatially correlated additive noise.

use super::{border::BorderMode, check_rgb, gaussian_blur::gaussian_filter};
use crate::{
    common::*,
    utils::{check_range, sample_range},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GaussianNoiseInit {
    /// The range of the noise standard deviation.
    pub scale: (R64, R64),
    /// The range of the smoothing kernel standard deviation in pixels.
    pub sigma: (R64, R64),
}

impl GaussianNoiseInit {
    pub fn build(self) -> Result<GaussianNoise> {
        let Self { scale, sigma } = self;
        let scale = check_range("scale", scale)?;
        let sigma = check_range("sigma", sigma)?;
        Ok(GaussianNoise { scale, sigma })
    }
}

impl Default for GaussianNoiseInit {
    fn default() -> Self {
        Self {
            scale: (r64(0.05), r64(0.15)),
            sigma: (r64(0.1), r64(1.2)),
        }
    }
}

/// Adds smoothed normal noise and clips the result to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    scale: (f64, f64),
    sigma: (f64, f64),
}

impl GaussianNoise {
    pub fn forward<R>(&self, rng: &mut R, image: &Array3<f32>) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        check_rgb(image)?;

        let scale = sample_range(rng, self.scale) as f32;
        let noise = Array3::from_shape_fn(image.raw_dim(), |_| {
            rng.sample::<f32, _>(StandardNormal) * scale
        });
        let sigma = sample_range(rng, self.sigma);
        let noise = gaussian_filter(&noise, sigma, sigma, BorderMode::Nearest);

        let output = Zip::from(image)
            .and(&noise)
            .map_collect(|&value, &noise| (value + noise).clamp(0.0, 1.0));
        Ok(output)
    }
}
