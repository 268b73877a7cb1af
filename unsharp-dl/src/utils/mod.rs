//! Utility types shared by the preprocessors.

mod ratio;
mod size;

pub use ratio::*;
pub use size::*;

use crate::common::*;

/// Check that a `(min, max)` pair is finite, non-negative and ordered,
/// and convert it to raw floats.
pub(crate) fn check_range(name: &str, range: (R64, R64)) -> Result<(f64, f64)> {
    let (lo, up) = range;
    ensure!(lo >= 0.0, "{} min must be non-negative", name);
    ensure!(up >= 0.0, "{} max must be non-negative", name);
    ensure!(lo <= up, "{} min must not exceed {} max", name, name);
    Ok((lo.raw(), up.raw()))
}

/// Draw a value uniformly from the inclusive range `[min, max]`.
pub(crate) fn sample_range<R>(rng: &mut R, (lo, up): (f64, f64)) -> f64
where
    R: Rng + ?Sized,
{
    if lo < up {
        rng.gen_range(lo..=up)
    } else {
        lo
    }
}
