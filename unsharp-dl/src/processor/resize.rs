//! Bilinear image resizing.

use super::{
    border::{mirror_index, BorderMode},
    gaussian_blur::gaussian_filter,
};
use crate::{common::*, utils::PixelSize};

/// Resize an image to the exact size with bilinear interpolation.
///
/// Sample positions are aligned on pixel centers and positions beyond the
/// border are mirrored back into the image. Downscaled axes are smoothed
/// beforehand to suppress aliasing, mirroring at the border as well.
pub fn resize(image: &Array3<f32>, size: PixelSize) -> Array3<f32> {
    let (in_h, in_w, channels) = image.dim();
    let PixelSize {
        height: out_h,
        width: out_w,
    } = size;

    let scale_h = in_h as f64 / out_h as f64;
    let scale_w = in_w as f64 / out_w as f64;

    let smoothed;
    let image = if scale_h > 1.0 || scale_w > 1.0 {
        let sigma_h = ((scale_h - 1.0) / 2.0).max(0.0);
        let sigma_w = ((scale_w - 1.0) / 2.0).max(0.0);
        smoothed = gaussian_filter(image, sigma_h, sigma_w, BorderMode::Mirror);
        &smoothed
    } else {
        image
    };

    let row_taps = interpolation_taps(in_h, out_h);
    let col_taps = interpolation_taps(in_w, out_w);

    Array3::from_shape_fn((out_h, out_w, channels), |(row, col, channel)| {
        let (top, bottom, frac_y) = row_taps[row];
        let (left, right, frac_x) = col_taps[col];
        let upper = image[[top, left, channel]] * (1.0 - frac_x) + image[[top, right, channel]] * frac_x;
        let lower = image[[bottom, left, channel]] * (1.0 - frac_x)
            + image[[bottom, right, channel]] * frac_x;
        upper * (1.0 - frac_y) + lower * frac_y
    })
}

/// Compute the pair of source indexes and the interpolation weight
/// of the second index for every output position.
fn interpolation_taps(in_len: usize, out_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = in_len as f64 / out_len as f64;

    (0..out_len)
        .map(|index| {
            let position = (index as f64 + 0.5) * scale - 0.5;
            let lower = position.floor();
            let frac = (position - lower) as f32;
            let lower = lower as isize;
            (
                mirror_index(lower, in_len),
                mirror_index(lower + 1, in_len),
                frac,
            )
        })
        .collect()
}
