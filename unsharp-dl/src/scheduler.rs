//! Mapping of batch indexes to catalog entries.

use crate::{common::*, error::GeneratorError};

/// Holds the permutation of catalog indexes and slices it into batches.
#[derive(Debug, Clone)]
pub struct IndexScheduler {
    batch_size: usize,
    permutation: Vec<usize>,
}

impl IndexScheduler {
    /// Create a scheduler over `num_records` entries in the identity order.
    pub fn new(num_records: usize, batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size: batch_size.get(),
            permutation: (0..num_records).collect(),
        }
    }

    /// The number of full batches per epoch. A trailing partial batch is dropped.
    pub fn len(&self) -> usize {
        self.permutation.len() / self.batch_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Get the catalog indexes of the batch at `index`.
    pub fn batch_indexes(&self, index: usize) -> Result<&[usize]> {
        let len = self.len();
        if index >= len {
            return Err(GeneratorError::OutOfRange { index, len }.into());
        }
        let start = index * self.batch_size;
        Ok(&self.permutation[start..(start + self.batch_size)])
    }

    /// Reset the permutation and shuffle it uniformly.
    pub fn reshuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let num_records = self.permutation.len();
        self.permutation = (0..num_records).collect();
        self.permutation.shuffle(rng);
        debug!("reshuffled {} record indexes", num_records);
    }
}
