//! On-the-fly training batch generation for image sharpness classifiers.
//!
//! The [UnsharpGenerator](generator::UnsharpGenerator) discovers source images in a set
//! of folders, samples random scaled crops of a fixed size and degrades half of them
//! with randomly parameterized blur, shake, vignette and noise filters. Each image is
//! paired with a one-hot label telling whether it was degraded.

mod common;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod degradation;
pub mod error;
pub mod generator;
pub mod label;
pub mod processor;
pub mod sampler;
pub mod scheduler;
pub mod utils;

pub use catalog::*;
pub use config::*;
pub use decoder::*;
pub use degradation::*;
pub use error::*;
pub use generator::*;
pub use label::*;
pub use sampler::*;
pub use scheduler::*;
