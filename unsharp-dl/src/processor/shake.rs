//! The random directional motion blur.

use super::{border::symmetric_index, check_rgb, clip_unit, NUM_CHANNELS};
use crate::{
    common::*,
    utils::{check_range, sample_range},
};
use image::{ImageBuffer, Luma};
use imageproc::geometric_transformations::{rotate, Interpolation};

/// The side length of the motion kernel.
pub const SHAKE_KERNEL_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShakeInit {
    /// The range of the motion length in pixels.
    pub length: (R64, R64),
}

impl ShakeInit {
    pub fn build(self) -> Result<Shake> {
        let Self { length } = self;
        let length = check_range("length", length)?;
        Ok(Shake { length })
    }
}

impl Default for ShakeInit {
    fn default() -> Self {
        Self {
            length: (r64(2.5), r64(9.0)),
        }
    }
}

/// Linear motion blur with random length and orientation.
#[derive(Debug, Clone)]
pub struct Shake {
    length: (f64, f64),
}

impl Shake {
    pub fn forward<R>(&self, rng: &mut R, image: &Array3<f32>) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        check_rgb(image)?;
        let length = sample_range(rng, self.length);
        let angle = rng.gen_range(0.0..360.0);
        let kernel = shake_kernel(length, angle);
        Ok(clip_unit(convolve(image, &kernel)))
    }
}

/// Build the `9x9x3` motion kernel of the given length, rotated
/// counter-clockwise by `angle_degrees`.
///
/// The kernel sums to one over all of its elements.
pub fn shake_kernel(length: f64, angle_degrees: f64) -> Array3<f32> {
    let center = SHAKE_KERNEL_SIZE / 2;

    // one sample of zero padding keeps the outermost taps within the
    // bilinear support of the rotation
    let padded_size = (SHAKE_KERNEL_SIZE + 2) as u32;
    let pivot_index = center as u32 + 1;
    let line: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(padded_size, padded_size, |x, y| {
            let offset = (y as i64 - pivot_index as i64).unsigned_abs() as usize;
            let weight = if x == pivot_index && offset <= center {
                line_weight(length, offset)
            } else {
                0.0
            };
            Luma([weight])
        });
    let pivot = pivot_index as f32;

    // positive angles rotate clockwise in imageproc
    let rotated = rotate(
        &line,
        (pivot, pivot),
        -(angle_degrees.to_radians() as f32),
        Interpolation::Bilinear,
        Luma([0.0]),
    );
    let rotated = Array2::from_shape_fn((SHAKE_KERNEL_SIZE, SHAKE_KERNEL_SIZE), |(row, col)| {
        rotated.get_pixel(col as u32 + 1, row as u32 + 1)[0]
    });
    let sum = rotated.sum() * NUM_CHANNELS as f32;

    Array3::from_shape_fn(
        (SHAKE_KERNEL_SIZE, SHAKE_KERNEL_SIZE, NUM_CHANNELS),
        |(row, col, _)| rotated[[row, col]] / sum,
    )
}

/// The weight of the line tap `offset` samples away from the kernel center.
fn line_weight(length: f64, offset: usize) -> f32 {
    if offset == 0 {
        return 1.0;
    }
    ((length - 2.0 * offset as f64 + 1.0) / 2.0).clamp(0.0, 1.0) as f32
}

/// Convolve an image with a 3-D kernel over rows, columns and channels.
///
/// Samples beyond the border on every axis are reflected about the edge,
/// including the channel axis.
pub fn convolve(image: &Array3<f32>, kernel: &Array3<f32>) -> Array3<f32> {
    let (height, width, channels) = image.dim();
    let (kernel_h, kernel_w, kernel_c) = kernel.dim();
    let origin = [
        (kernel_h / 2) as isize,
        (kernel_w / 2) as isize,
        (kernel_c / 2) as isize,
    ];

    let shifted_indexes = |len: usize, shift: isize| -> Vec<usize> {
        (0..len)
            .map(|index| symmetric_index(index as isize + shift, len))
            .collect()
    };

    let mut output = Array3::zeros(image.raw_dim());

    for (ky, kx) in iproduct!(0..kernel_h, 0..kernel_w) {
        let weights = kernel.slice(s![ky, kx, ..]);
        if weights.iter().all(|&weight| weight == 0.0) {
            continue;
        }

        // convolution flips the kernel
        let rows = shifted_indexes(height, origin[0] - ky as isize);
        let cols = shifted_indexes(width, origin[1] - kx as isize);
        let shifted = image.select(Axis(0), &rows).select(Axis(1), &cols);

        for (kc, &weight) in weights.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let chans = shifted_indexes(channels, origin[2] - kc as isize);
            output.scaled_add(weight, &shifted.select(Axis(2), &chans));
        }
    }

    output
}
