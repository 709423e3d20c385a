//! Error type shared by the loss functions, the matrix constructors and the
//! config loader.

use thiserror::Error;

/// Everything that can go wrong before a loss evaluation starts.
///
/// Validation is done up front, so a returned error means no partial output
/// was produced. Numerical overflow (an `inf` or `NaN` loss) is not an error
/// and is returned as-is.
#[derive(Error, Debug)]
pub enum SoftmaxError {
    /// Two operands disagree on a dimension.
    #[error("Shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which dimension was compared, e.g. `"W rows vs X cols"`.
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A row of `Matrix::data` does not have `cols` entries.
    #[error("Ragged matrix: row {row} has {got} columns, expected {expected}")]
    RaggedMatrix { row: usize, expected: usize, got: usize },

    /// A label is not a valid class index.
    #[error("Invalid label {label} at index {index}: must be < {classes}")]
    InvalidLabel {
        index: usize,
        label: usize,
        classes: usize,
    },

    /// The batch has no examples, so the mean loss is undefined.
    #[error("Empty batch: at least one example is required")]
    EmptyBatch,

    #[error("Invalid regularization strength {0}: must be finite and >= 0")]
    InvalidRegularization(f64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SoftmaxError {
    fn from(e: serde_json::Error) -> Self {
        SoftmaxError::Config(e.to_string())
    }
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, SoftmaxError>;
