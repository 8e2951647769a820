//! N-dimensional Mathematics Library
//!
//! This crate provides the dense linear algebra used by the ndview kernel.
//! Nothing here is fixed to 3 or 4 dimensions: vectors are plain `f64`
//! slices and matrices are flat row-major buffers of any size.
//!
//! ## Modules
//!
//! - [`vecn`] - Dense vector arithmetic over `&[f64]`
//! - [`matn`] - [`MatrixN`] plus allocation-free flat-buffer helpers
//! - [`trig`] - Bounded-error sin/cos for animation-only use
//! - [`error`] - [`GeometryError`], shared by every ndview crate
//!
//! ## Validation
//!
//! Hot-path shape checks are gated on [`VALIDATE`]. Debug builds (and
//! therefore all tests) always validate; optimized builds skip those checks
//! unless the `validate` feature is enabled.

pub mod error;
pub mod matn;
pub mod trig;
pub mod vecn;

pub use error::{GeometryError, Result};
pub use matn::{MatrixN, MatrixScratch, Operand};
pub use trig::TrigMode;

/// Whether hot-path shape and range checks are compiled in.
pub const VALIDATE: bool = cfg!(any(debug_assertions, feature = "validate"));

/// Default tolerance for approximate comparisons.
pub const EPSILON: f64 = 1e-10;
