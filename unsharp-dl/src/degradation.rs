//! The composed degradation pipeline.

use crate::{
    common::*,
    processor::{
        GaussianBlur, GaussianBlurInit, GaussianNoise, GaussianNoiseInit, Shake, ShakeInit,
        VignetteMask, VignetteMaskInit,
    },
    utils::Ratio,
};

/// The blur-class effects applied first in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegradationKind {
    Blur,
    Shake,
    BlurAndShake,
}

impl DegradationKind {
    pub const ALL: [Self; 3] = [Self::Blur, Self::Shake, Self::BlurAndShake];

    /// Pick one of the kinds uniformly.
    pub fn choose<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn has_blur(&self) -> bool {
        matches!(self, Self::Blur | Self::BlurAndShake)
    }

    pub fn has_shake(&self) -> bool {
        matches!(self, Self::Shake | Self::BlurAndShake)
    }
}

/// Degradation options. Unspecified fields take the default values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradationInit {
    /// The probability that an image is degraded.
    pub degrade_prob: Ratio,
    /// The range of the Gaussian blur standard deviation.
    pub blur_sigma: (R64, R64),
    /// The range of the motion length of the shake kernel.
    pub shake_length: (R64, R64),
    /// The probability to blend the sharp image back through a vignette mask.
    pub mask_prob: Ratio,
    /// The range of the mask template jitter.
    pub mask_jitter: (R64, R64),
    /// The probability to add noise.
    pub noise_prob: Ratio,
    /// The range of the noise standard deviation.
    pub noise_scale: (R64, R64),
    /// The range of the noise smoothing standard deviation.
    pub noise_sigma: (R64, R64),
}

impl Default for DegradationInit {
    fn default() -> Self {
        let ratio = Ratio::new_unchecked;
        let GaussianBlurInit { sigma: blur_sigma } = GaussianBlurInit::default();
        let ShakeInit {
            length: shake_length,
        } = ShakeInit::default();
        let VignetteMaskInit {
            jitter: mask_jitter,
        } = VignetteMaskInit::default();
        let GaussianNoiseInit {
            scale: noise_scale,
            sigma: noise_sigma,
        } = GaussianNoiseInit::default();

        Self {
            degrade_prob: ratio(0.5),
            blur_sigma,
            shake_length,
            mask_prob: ratio(0.3),
            mask_jitter,
            noise_prob: ratio(0.4),
            noise_scale,
            noise_sigma,
        }
    }
}

impl DegradationInit {
    pub fn build(self) -> Result<Degradation> {
        let Self {
            degrade_prob,
            blur_sigma,
            shake_length,
            mask_prob,
            mask_jitter,
            noise_prob,
            noise_scale,
            noise_sigma,
        } = self;

        Ok(Degradation {
            degrade_prob,
            blur: GaussianBlurInit { sigma: blur_sigma }.build()?,
            shake: ShakeInit {
                length: shake_length,
            }
            .build()?,
            mask_prob,
            mask: VignetteMaskInit {
                jitter: mask_jitter,
            }
            .build()?,
            noise_prob,
            noise: GaussianNoiseInit {
                scale: noise_scale,
                sigma: noise_sigma,
            }
            .build()?,
        })
    }
}

/// Blurs, shakes, masks and adds noise to images, each stage with its own
/// random parameters.
#[derive(Debug, Clone)]
pub struct Degradation {
    degrade_prob: Ratio,
    blur: GaussianBlur,
    shake: Shake,
    mask_prob: Ratio,
    mask: VignetteMask,
    noise_prob: Ratio,
    noise: GaussianNoise,
}

impl Degradation {
    /// Decide whether the next image enters the pipeline.
    pub fn sample_entry<R>(&self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        self.degrade_prob.sample(rng)
    }

    /// Degrade a sharp image.
    ///
    /// The blur-class effects run first, then the optional mask and the
    /// optional noise.
    pub fn forward<R>(&self, rng: &mut R, sharp: &Array3<f32>) -> Result<Array3<f32>>
    where
        R: Rng + ?Sized,
    {
        let kind = DegradationKind::choose(rng);

        let degraded = match kind {
            DegradationKind::Blur => self.blur.forward(rng, sharp)?,
            DegradationKind::Shake => self.shake.forward(rng, sharp)?,
            DegradationKind::BlurAndShake => {
                let blurred = self.blur.forward(rng, sharp)?;
                self.shake.forward(rng, &blurred)?
            }
        };

        let degraded = if self.mask_prob.sample(rng) {
            self.mask.forward(rng, &degraded, sharp)?
        } else {
            degraded
        };

        let degraded = if self.noise_prob.sample(rng) {
            self.noise.forward(rng, &degraded)?
        } else {
            degraded
        };

        Ok(degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn checkerboard(height: usize, width: usize) -> Array3<f32> {
        Array3::from_shape_fn((height, width, 3), |(row, col, _)| {
            if (row / 4 + col / 4) % 2 == 0 {
                0.0
            } else {
                1.0
            }
        })
    }

    #[test]
    fn kinds_are_chosen_uniformly() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let kind = DegradationKind::choose(&mut rng);
            let index = DegradationKind::ALL
                .iter()
                .position(|&other| other == kind)
                .unwrap();
            counts[index] += 1;
        }
        assert!(counts.iter().all(|&count| (850..1150).contains(&count)));
    }

    #[test]
    fn kind_components() {
        assert!(DegradationKind::Blur.has_blur() && !DegradationKind::Blur.has_shake());
        assert!(!DegradationKind::Shake.has_blur() && DegradationKind::Shake.has_shake());
        assert!(DegradationKind::BlurAndShake.has_blur());
        assert!(DegradationKind::BlurAndShake.has_shake());
    }

    #[test]
    fn degraded_images_stay_in_unit_range() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(37);
        let init = DegradationInit {
            mask_prob: Ratio::try_from(0.5_f64)?,
            noise_prob: Ratio::try_from(0.5_f64)?,
            ..Default::default()
        };
        let degradation = init.build()?;
        let sharp = checkerboard(32, 32);

        for _ in 0..12 {
            let degraded = degradation.forward(&mut rng, &sharp)?;
            assert_eq!(degraded.dim(), sharp.dim());
            assert!(degraded
                .iter()
                .all(|&value| (-1e-6..=1.0 + 1e-6).contains(&value)));
            assert_ne!(degraded, sharp);
        }
        Ok(())
    }

    #[test]
    fn mask_blends_the_sharp_source_after_blurring() -> Result<()> {
        let degradation = DegradationInit {
            mask_prob: Ratio::try_from(1.0_f64)?,
            mask_jitter: (r64(0.0), r64(0.0)),
            noise_prob: Ratio::try_from(0.0_f64)?,
            ..Default::default()
        }
        .build()?;
        // three times the mask template size
        let sharp = checkerboard(30, 27);

        for seed in 0..9 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut replay = rng.clone();
            let output = degradation.forward(&mut rng, &sharp)?;

            let intermediate = match DegradationKind::choose(&mut replay) {
                DegradationKind::Blur => degradation.blur.forward(&mut replay, &sharp)?,
                DegradationKind::Shake => degradation.shake.forward(&mut replay, &sharp)?,
                DegradationKind::BlurAndShake => {
                    let blurred = degradation.blur.forward(&mut replay, &sharp)?;
                    degradation.shake.forward(&mut replay, &blurred)?
                }
            };

            for channel in 0..3 {
                for &(row, col) in &[(0, 0), (0, 26), (29, 0), (29, 26)] {
                    assert_abs_diff_eq!(
                        output[[row, col, channel]],
                        sharp[[row, col, channel]],
                        epsilon = 1e-5
                    );
                }
                for &(row, col) in &[(15, 13), (14, 13), (15, 12)] {
                    assert_abs_diff_eq!(
                        output[[row, col, channel]],
                        intermediate[[row, col, channel]],
                        epsilon = 1e-5
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn entry_probability_extremes() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(41);
        let never = DegradationInit {
            degrade_prob: Ratio::try_from(0.0_f64)?,
            ..Default::default()
        }
        .build()?;
        let always = DegradationInit {
            degrade_prob: Ratio::try_from(1.0_f64)?,
            ..Default::default()
        }
        .build()?;
        assert!((0..100).all(|_| !never.sample_entry(&mut rng)));
        assert!((0..100).all(|_| always.sample_entry(&mut rng)));
        Ok(())
    }

    #[test]
    fn default_options_from_empty_json5() -> Result<()> {
        let init: DegradationInit = json5::from_str("{}")?;
        assert_eq!(init, DegradationInit::default());

        let init: DegradationInit =
            json5::from_str("{ noise_prob: 0.0, blur_sigma: [1.0, 2.0] }")?;
        assert_eq!(init.blur_sigma, (r64(1.0), r64(2.0)));
        assert!(json5::from_str::<DegradationInit>("{ mask_prob: 1.5 }").is_err());
        Ok(())
    }
}
