//! The soft elliptical mask that blends the sharp image back in.

use super::{check_rgb, resize::resize, NUM_CHANNELS};
use crate::{
    common::*,
    utils::{check_range, sample_range, PixelSize},
};

const MASK_TEMPLATE: [[f32; 9]; 10] = [
    [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0],
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VignetteMaskInit {
    /// The range of the maximum per-cell noise added to the mask template.
    pub jitter: (R64, R64),
}

impl VignetteMaskInit {
    pub fn build(self) -> Result<VignetteMask> {
        let Self { jitter } = self;
        let jitter = check_range("jitter", jitter)?;
        Ok(VignetteMask { jitter })
    }
}

impl Default for VignetteMaskInit {
    fn default() -> Self {
        Self {
            jitter: (r64(0.15), r64(0.65)),
        }
    }
}

/// Composites a degraded image over its sharp source through a jittered
/// elliptical mask. The degraded image shows where the mask is one.
#[derive(Debug, Clone)]
pub struct VignetteMask {
    jitter: (f64, f64),
}

impl VignetteMask {
    pub fn forward<R>(
        &self,
        rng: &mut R,
        degraded: &Array3<f32>,
        sharp: &Array3<f32>,
    ) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        check_rgb(degraded)?;
        ensure!(
            degraded.dim() == sharp.dim(),
            "image shapes do not match, {:?} vs {:?}",
            degraded.dim(),
            sharp.dim()
        );
        let (height, width, _) = degraded.dim();

        let mask = self.sample_mask(rng, PixelSize::new(height, width));
        let output = Zip::from(&mask)
            .and(degraded)
            .and(sharp)
            .map_collect(|&mask, &degraded, &sharp| {
                (mask * degraded + (1.0 - mask) * sharp).clamp(0.0, 1.0)
            });

        Ok(output)
    }

    /// Draw a jittered mask and resize it to the image size.
    pub fn sample_mask<R>(&self, rng: &mut R, size: PixelSize) -> Array3<f32>
    where
        R: Rng + ?Sized,
    {
        let jitter = sample_range(rng, self.jitter) as f32;
        let rows = MASK_TEMPLATE.len();
        let cols = MASK_TEMPLATE[0].len();

        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            (MASK_TEMPLATE[row][col] + rng.gen::<f32>() * jitter).clamp(0.0, 1.0)
        });
        let template =
            Array3::from_shape_fn((rows, cols, NUM_CHANNELS), |(row, col, _)| cells[[row, col]]);

        resize(&template, size).mapv(|value| value.clamp(0.0, 1.0))
    }
}
