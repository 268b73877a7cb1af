//! The random-access batch generator.

use crate::{
    catalog::Catalog,
    common::*,
    config::GeneratorConfig,
    decoder::{FileDecoder, ImageDecoder},
    degradation::{Degradation, DegradationInit},
    label::Label,
    processor::NUM_CHANNELS,
    sampler::Sampler,
    scheduler::IndexScheduler,
    utils::PixelSize,
};

/// A sequence of batches that a training loop iterates by index.
pub trait BatchSequence {
    /// The number of batches per epoch.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generate the batch at `index`, which must be less than [len()](BatchSequence::len).
    fn batch_at(&mut self, index: usize) -> Result<Batch>;

    /// Signal the end of an epoch.
    fn on_epoch_end(&mut self);
}

/// A batch of images and their one-hot labels in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Images in `(batch, height, width, channel)` layout.
    pub images: Array4<f32>,
    /// One-hot labels in `(batch, class)` layout.
    pub labels: Array2<f32>,
}

impl Batch {
    /// Stack equally sized images and their labels into a batch.
    pub fn stack(samples: &[(Array3<f32>, Label)], image_size: PixelSize) -> Result<Self> {
        let PixelSize { height, width } = image_size;
        let batch_size = samples.len();

        let mut images = Array4::zeros((batch_size, height, width, NUM_CHANNELS));
        let mut labels = Array2::zeros((batch_size, Label::NUM_CLASSES));

        for (index, (image, label)) in samples.iter().enumerate() {
            ensure!(
                image.dim() == (height, width, NUM_CHANNELS),
                "expect image shape {:?}, but get {:?}",
                (height, width, NUM_CHANNELS),
                image.dim()
            );
            images.index_axis_mut(Axis(0), index).assign(image);
            labels
                .row_mut(index)
                .assign(&ndarray::aview1(&label.one_hot()));
        }

        Ok(Self { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode the label of the `index`-th sample.
    pub fn label(&self, index: usize) -> Option<Label> {
        if index >= self.len() {
            return None;
        }
        let row = self.labels.row(index);
        Label::from_one_hot(&row.to_vec())
    }
}

/// Options to build an [UnsharpGenerator].
#[derive(Debug, Clone)]
pub struct UnsharpGeneratorInit {
    /// Folders scanned for source images.
    pub image_dirs: Vec<PathBuf>,
    /// The number of images per batch.
    pub batch_size: usize,
    /// The output image size.
    pub target_size: PixelSize,
    /// The random seed. It is seeded from system entropy if not set.
    pub seed: Option<u64>,
    /// If set, the maximum number of unusable images tolerated per sample.
    pub max_resample_attempts: Option<NonZeroUsize>,
    pub degradation: DegradationInit,
}

impl Default for UnsharpGeneratorInit {
    fn default() -> Self {
        Self {
            image_dirs: vec![],
            batch_size: 10,
            target_size: PixelSize::default(),
            seed: None,
            max_resample_attempts: None,
            degradation: DegradationInit::default(),
        }
    }
}

impl UnsharpGeneratorInit {
    pub fn build(self) -> Result<UnsharpGenerator> {
        let Self {
            image_dirs,
            batch_size,
            target_size,
            seed,
            max_resample_attempts,
            degradation,
        } = self;

        let batch_size = NonZeroUsize::new(batch_size)
            .ok_or_else(|| format_err!("batch_size must be positive"))?;
        let target_size = PixelSize::try_new(target_size.height, target_size.width)?;
        let sampler = Sampler::new(target_size, max_resample_attempts)?;
        let degradation = degradation.build()?;

        let catalog = Catalog::open(&image_dirs)?;
        let scheduler = IndexScheduler::new(catalog.len(), batch_size);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if scheduler.is_empty() {
            warn!(
                "batch size {} exceeds the number of images {}, no batch will be produced",
                batch_size,
                catalog.len()
            );
        }

        Ok(UnsharpGenerator {
            catalog,
            scheduler,
            sampler,
            degradation,
            decoder: Box::new(FileDecoder),
            rng,
        })
    }
}

/// Generates batches of randomly cropped images, half of which are degraded
/// on average, with their sharpness labels.
///
/// The catalog is visited in the order of the current permutation, which
/// starts as the catalog order and is reshuffled by
/// [on_epoch_end()](BatchSequence::on_epoch_end).
#[derive(Debug)]
pub struct UnsharpGenerator {
    catalog: Catalog,
    scheduler: IndexScheduler,
    sampler: Sampler,
    degradation: Degradation,
    decoder: Box<dyn ImageDecoder>,
    rng: StdRng,
}

impl UnsharpGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let GeneratorConfig {
            image_dirs,
            batch_size,
            target_size,
            seed,
            max_resample_attempts,
            degradation,
        } = config.clone();

        UnsharpGeneratorInit {
            image_dirs,
            batch_size: batch_size.get(),
            target_size,
            seed,
            max_resample_attempts,
            degradation,
        }
        .build()
    }

    /// Replace the image decoder.
    pub fn with_decoder<D>(self, decoder: D) -> Self
    where
        D: 'static + ImageDecoder,
    {
        Self {
            decoder: Box::new(decoder),
            ..self
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scheduler(&self) -> &IndexScheduler {
        &self.scheduler
    }

    pub fn batch_size(&self) -> usize {
        self.scheduler.batch_size()
    }

    pub fn target_size(&self) -> PixelSize {
        self.sampler.target_size()
    }

    /// Get the source image paths of the batch at `index`.
    ///
    /// The images actually used may differ if some of them are unusable.
    pub fn batch_paths(&self, index: usize) -> Result<Vec<&Path>> {
        let paths = self
            .scheduler
            .batch_indexes(index)?
            .iter()
            .map(|&record_index| &self.catalog.paths()[record_index])
            .map(PathBuf::as_path)
            .collect();
        Ok(paths)
    }

    fn generate(&mut self, paths: &[PathBuf]) -> Result<Batch> {
        let Self {
            catalog,
            sampler,
            degradation,
            decoder,
            rng,
            ..
        } = self;

        let samples: Vec<_> = paths
            .iter()
            .map(|path| -> Result<_> {
                let image = sampler.sample(rng, catalog, &**decoder, path)?;
                let sample = if degradation.sample_entry(rng) {
                    (degradation.forward(rng, &image)?, Label::Degraded)
                } else {
                    (image, Label::Sharp)
                };
                Ok(sample)
            })
            .collect::<Result<_>>()?;

        Batch::stack(&samples, sampler.target_size())
    }
}

impl BatchSequence for UnsharpGenerator {
    fn len(&self) -> usize {
        self.scheduler.len()
    }

    fn batch_at(&mut self, index: usize) -> Result<Batch> {
        let paths: Vec<PathBuf> = self
            .batch_paths(index)?
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        self.generate(&paths)
    }

    fn on_epoch_end(&mut self) {
        self.scheduler.reshuffle(&mut self.rng);
    }
}
