use thiserror::Error;

/// Custom error type for the autoreduce crate.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum AutoReduceError {
    /// A node was built with parameters that can never be valid together.
    #[error("Invalid configuration for {operation}: {reason}")]
    InvalidConfiguration { operation: String, reason: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    /// `backward` ran without a matching `forward`, or `forward` ran twice
    /// without the saved state being consumed.
    #[error("State precondition violated in {operation}: {reason}")]
    StatePrecondition { operation: String, reason: String },

    #[error("Division by zero error")]
    DivisionByZero,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
