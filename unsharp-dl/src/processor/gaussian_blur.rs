//! The random Gaussian blur.

use super::{border::BorderMode, check_rgb, clip_unit};
use crate::{
    common::*,
    utils::{check_range, sample_range},
};

/// Kernels are truncated at this many standard deviations.
const TRUNCATE: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GaussianBlurInit {
    /// The range of the standard deviation in pixels.
    pub sigma: (R64, R64),
}

impl GaussianBlurInit {
    pub fn build(self) -> Result<GaussianBlur> {
        let Self { sigma } = self;
        let sigma = check_range("sigma", sigma)?;
        Ok(GaussianBlur { sigma })
    }
}

impl Default for GaussianBlurInit {
    fn default() -> Self {
        Self {
            sigma: (r64(0.5), r64(5.0)),
        }
    }
}

/// Isotropic Gaussian blur with a randomly drawn standard deviation.
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    sigma: (f64, f64),
}

impl GaussianBlur {
    pub fn forward<R>(&self, rng: &mut R, image: &Array3<f32>) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        check_rgb(image)?;
        let sigma = sample_range(rng, self.sigma);
        let blurred = gaussian_filter(image, sigma, sigma, BorderMode::Nearest);
        Ok(clip_unit(blurred))
    }
}

/// Smooth each channel of an image with a separable Gaussian kernel.
///
/// The standard deviations are given per axis. Samples beyond the border
/// are filled according to `border`.
pub fn gaussian_filter(
    image: &Array3<f32>,
    sigma_h: f64,
    sigma_w: f64,
    border: BorderMode,
) -> Array3<f32> {
    let image = correlate_axis(image, Axis(0), &gaussian_kernel(sigma_h), border);
    correlate_axis(&image, Axis(1), &gaussian_kernel(sigma_w), border)
}

/// Normalized 1-D Gaussian weights of radius `round(4 * sigma)`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|offset| (-0.5 * (offset as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|weight| (weight / sum) as f32).collect()
}

fn correlate_axis(
    image: &Array3<f32>,
    axis: Axis,
    kernel: &[f32],
    border: BorderMode,
) -> Array3<f32> {
    if kernel.len() == 1 {
        return image.mapv(|value| value * kernel[0]);
    }

    let len = image.len_of(axis);
    let radius = (kernel.len() / 2) as isize;
    let mut output = Array3::zeros(image.raw_dim());

    for (tap, &weight) in kernel.iter().enumerate() {
        let offset = tap as isize - radius;
        let indexes: Vec<_> = (0..len)
            .map(|index| border.index(index as isize + offset, len))
            .collect();
        output.scaled_add(weight, &image.select(axis, &indexes));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gaussian_kernel_is_normalized() {
        for &sigma in &[0.1, 0.5, 1.2, 5.0] {
            let kernel = gaussian_kernel(sigma);
            assert_eq!(kernel.len() % 2, 1);
            assert_abs_diff_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        }
        assert_eq!(gaussian_kernel(5.0).len(), 41);
        assert_eq!(gaussian_kernel(0.1), vec![1.0]);
    }

    #[test]
    fn gaussian_filter_keeps_constant_image() {
        let image = Array3::from_elem((12, 9, 3), 0.25f32);
        let blurred = gaussian_filter(&image, 3.0, 3.0, BorderMode::Nearest);
        blurred
            .iter()
            .for_each(|&value| assert_abs_diff_eq!(value, 0.25, epsilon = 1e-5));
    }

    #[test]
    fn gaussian_filter_does_not_mix_channels() {
        let mut image = Array3::zeros((16, 16, 3));
        image.slice_mut(s![.., .., 1]).fill(1.0f32);
        let blurred = gaussian_filter(&image, 2.0, 2.0, BorderMode::Mirror);
        assert_abs_diff_eq!(blurred.slice(s![.., .., 0]).sum(), 0.0);
        assert_abs_diff_eq!(blurred.slice(s![.., .., 2]).sum(), 0.0);
        assert_abs_diff_eq!(blurred[[8, 8, 1]], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn gaussian_blur_spreads_impulse() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let blur = GaussianBlurInit::default().build()?;
        let mut image = Array3::zeros((21, 21, 3));
        image[[10, 10, 0]] = 1.0f32;
        let blurred = blur.forward(&mut rng, &image)?;
        assert!(blurred[[10, 10, 0]] < 1.0);
        assert!(blurred[[10, 11, 0]] > 0.0);
        assert!(blurred.iter().all(|&value| (0.0..=1.0).contains(&value)));
        Ok(())
    }

    #[test]
    fn gaussian_filter_border_modes() {
        // a ramp 0, 1, 2, 3 along the rows
        let image = Array3::from_shape_fn((4, 1, 1), |(row, _, _)| row as f32);
        let kernel = gaussian_kernel(1.0);
        let radius = kernel.len() / 2;
        let at_top = |border: BorderMode| -> f32 {
            kernel
                .iter()
                .enumerate()
                .map(|(tap, &weight)| {
                    let row = border.index(tap as isize - radius as isize, 4);
                    weight * row as f32
                })
                .sum()
        };

        for &border in &[BorderMode::Nearest, BorderMode::Mirror] {
            let blurred = gaussian_filter(&image, 1.0, 0.0, border);
            assert_abs_diff_eq!(blurred[[0, 0, 0]], at_top(border), epsilon = 1e-5);
        }
        let nearest = gaussian_filter(&image, 1.0, 0.0, BorderMode::Nearest);
        let mirror = gaussian_filter(&image, 1.0, 0.0, BorderMode::Mirror);
        assert!(mirror[[0, 0, 0]] > nearest[[0, 0, 0]]);
    }

    #[test]
    fn gaussian_blur_keeps_saturated_image_in_range() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let blur = GaussianBlurInit::default().build()?;
        let image = Array3::from_elem((24, 24, 3), 1.0f32);
        for _ in 0..8 {
            let blurred = blur.forward(&mut rng, &image)?;
            assert!(blurred.iter().all(|&value| (0.0..=1.0).contains(&value)));
        }
        Ok(())
    }

    #[test]
    fn gaussian_blur_rejects_inverted_range() {
        let init = GaussianBlurInit {
            sigma: (r64(2.0), r64(1.0)),
        };
        assert!(init.build().is_err());
    }
}
