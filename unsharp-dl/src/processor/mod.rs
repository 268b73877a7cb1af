//! Image preprocessing building blocks.
//!
//! Images are `(height, width, channel)` arrays of `f32` samples within `[0, 1]`.

pub mod border;
pub mod gaussian_blur;
pub mod gaussian_noise;
pub mod random_scale_crop;
pub mod resize;
pub mod shake;
pub mod vignette_mask;

pub use border::BorderMode;
pub use gaussian_blur::*;
pub use gaussian_noise::*;
pub use random_scale_crop::*;
pub use resize::*;
pub use shake::*;
pub use vignette_mask::*;

use crate::common::*;

/// The number of color channels every processor works on.
pub const NUM_CHANNELS: usize = 3;

pub(crate) fn check_rgb(image: &Array3<f32>) -> Result<()> {
    let (_height, _width, channels) = image.dim();
    ensure!(
        channels == NUM_CHANNELS,
        "channel size must be {}, but get {}",
        NUM_CHANNELS,
        channels
    );
    Ok(())
}

/// Clip samples into `[0, 1]`, removing rounding error left by weighted sums.
pub(crate) fn clip_unit(image: Array3<f32>) -> Array3<f32> {
    image.mapv_into(|value| value.clamp(0.0, 1.0))
}
