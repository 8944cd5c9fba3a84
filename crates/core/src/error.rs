//! Error types for rastra

use thiserror::Error;

/// Main error type for rastra operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("position {position} outside domain {domain}")]
    OutOfDomain { position: String, domain: String },

    #[error("axis {axis} out of range for dimension {dimension}")]
    AxisOutOfRange { axis: usize, dimension: usize },

    #[error("invalid parameter: {name} ({reason})")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("linear map is singular")]
    SingularMatrix,
}

/// Result type alias for rastra operations
pub type Result<T> = std::result::Result<T, Error>;
