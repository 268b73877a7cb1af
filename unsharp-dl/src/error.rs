//! Error kinds that callers are expected to tell apart.

use thiserror::Error;

/// The generator errors surfaced to the training loop.
///
/// They are raised through [anyhow::Error] and can be recovered with
/// `err.downcast_ref::<GeneratorError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// No training data could be found.
    #[error("no usable training data: {reason}")]
    DataUnavailable { reason: String },
    /// The requested batch index is beyond the number of batches per epoch.
    #[error("batch index {index} is out of range, expect less than {len}")]
    OutOfRange { index: usize, len: usize },
}
