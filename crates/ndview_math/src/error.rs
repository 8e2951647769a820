//! Geometry error types
//!
//! Every fallible kernel operation reports one of these. Failures are local
//! and synchronous; the kernel never retries.

use std::fmt;

/// Error type for kernel operations
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Operand shapes disagree (vector lengths, matrix sizes, vertex dimensions)
    DimensionMismatch { expected: usize, actual: usize },
    /// The operation needs a square matrix
    NotSquare { rows: usize, cols: usize },
    /// An axis index is out of range, or two axes that must differ are equal
    InvalidIndex { index: usize, bound: usize },
    /// The dimension is below what the operation supports
    InvalidDimension { dimension: usize, minimum: usize },
    /// A rotation plane name could not be parsed or is out of range
    InvalidPlaneName(String),
    /// Normalizing a vector whose magnitude is effectively zero
    DegenerateVector { magnitude: f64 },
    /// Converting out of homogeneous form with a trailing coordinate near zero
    SingularHomogeneous { w: f64 },
    /// A caller-supplied output buffer cannot hold the result
    BufferTooSmall { required: usize, available: usize },
}

/// Result alias used throughout ndview
pub type Result<T> = std::result::Result<T, GeometryError>;

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            GeometryError::NotSquare { rows, cols } => {
                write!(f, "Matrix is not square: {}x{}", rows, cols)
            }
            GeometryError::InvalidIndex { index, bound } => {
                write!(f, "Invalid axis index {} (bound {})", index, bound)
            }
            GeometryError::InvalidDimension { dimension, minimum } => {
                write!(f, "Invalid dimension {}: must be at least {}", dimension, minimum)
            }
            GeometryError::InvalidPlaneName(name) => {
                write!(f, "Invalid rotation plane name: '{}'", name)
            }
            GeometryError::DegenerateVector { magnitude } => {
                write!(f, "Cannot normalize degenerate vector (magnitude {:e})", magnitude)
            }
            GeometryError::SingularHomogeneous { w } => {
                write!(f, "Singular homogeneous coordinate (w = {:e})", w)
            }
            GeometryError::BufferTooSmall { required, available } => {
                write!(f, "Output buffer too small: need {}, have {}", required, available)
            }
        }
    }
}

impl std::error::Error for GeometryError {}
