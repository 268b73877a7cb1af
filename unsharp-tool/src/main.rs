use anyhow::{ensure, Context, Result};
use image::{Rgb, RgbImage};
use log::info;
use ndarray::{ArrayView3, Axis};
use prettytable::{cell, row, Table};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use unsharp_dl::{BatchSequence, GeneratorConfig, Label, UnsharpGenerator};

#[derive(Debug, Clone, StructOpt)]
/// Inspect and dump training batches of sharp and degraded images.
enum Args {
    /// Print the image catalog and batch layout of a configuration.
    Info {
        /// generator configuration file
        #[structopt(long)]
        config: PathBuf,
    },
    /// Generate batches and save the images and labels to a directory.
    Dump {
        /// generator configuration file
        #[structopt(long)]
        config: PathBuf,
        /// output directory
        #[structopt(long)]
        output_dir: PathBuf,
        /// number of batches to generate
        #[structopt(long, default_value = "1")]
        num_batches: usize,
        /// reshuffle the catalog before generating
        #[structopt(long)]
        shuffle: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
struct SampleRecord {
    pub file: String,
    pub label: Label,
    pub one_hot: [f32; 2],
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Args::from_args() {
        Args::Info { config } => print_info(config)?,
        Args::Dump {
            config,
            output_dir,
            num_batches,
            shuffle,
        } => dump(config, output_dir, num_batches, shuffle)?,
    }

    Ok(())
}

fn print_info(config_file: impl AsRef<Path>) -> Result<()> {
    let config = GeneratorConfig::open(config_file)?;
    let generator = UnsharpGenerator::from_config(&config)?;
    let degradation = &config.degradation;
    let target_size = generator.target_size();

    let mut table = Table::new();
    table.add_row(row!["item", "value"]);
    table.add_row(row!["image folders", format!("{:?}", config.image_dirs)]);
    table.add_row(row!["images", generator.catalog().len()]);
    table.add_row(row!["batch size", generator.batch_size()]);
    table.add_row(row!["batches per epoch", generator.len()]);
    table.add_row(row![
        "target size",
        format!("{}x{}", target_size.height, target_size.width)
    ]);
    table.add_row(row![
        "seed",
        config
            .seed
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "entropy".into())
    ]);
    table.add_row(row![
        "degrade prob",
        f64::from(degradation.degrade_prob)
    ]);
    table.add_row(row!["mask prob", f64::from(degradation.mask_prob)]);
    table.add_row(row!["noise prob", f64::from(degradation.noise_prob)]);
    table.printstd();

    Ok(())
}

fn dump(
    config_file: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    num_batches: usize,
    shuffle: bool,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let config = GeneratorConfig::open(config_file)?;
    let mut generator = UnsharpGenerator::from_config(&config)?;
    ensure!(
        !generator.is_empty(),
        "the catalog has fewer images than a batch"
    );

    if shuffle {
        generator.on_epoch_end();
    }

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            output_dir.display()
        )
    })?;

    let num_batches = num_batches.min(generator.len());
    for batch_index in 0..num_batches {
        let batch = generator.batch_at(batch_index)?;

        let records: Vec<_> = batch
            .images
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(sample_index, image)| -> Result<_> {
                let file = format!("batch{:04}_{:03}.png", batch_index, sample_index);
                to_rgb_image(image).save(output_dir.join(&file))?;

                let label = batch
                    .label(sample_index)
                    .context("invalid one-hot label")?;
                Ok(SampleRecord {
                    file,
                    label,
                    one_hot: label.one_hot(),
                })
            })
            .collect::<Result<_>>()?;

        let labels_path = output_dir.join(format!("batch{:04}.json", batch_index));
        let writer = BufWriter::new(File::create(&labels_path)?);
        serde_json::to_writer_pretty(writer, &records)?;

        info!(
            "saved batch {} with {} images to '{}'",
            batch_index,
            records.len(),
            output_dir.display()
        );
    }

    Ok(())
}

fn to_rgb_image(image: ArrayView3<f32>) -> RgbImage {
    let (height, width, _) = image.dim();
    let to_u8 = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;

    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            to_u8(image[[y, x, 0]]),
            to_u8(image[[y, x, 1]]),
            to_u8(image[[y, x, 2]]),
        ])
    })
}
