//! ndview - n-dimensional geometry viewer
//!
//! Library half of the root package: configuration loading and the
//! animation system, plus re-exports of the kernel crates.

pub mod config;
pub mod systems;

pub use ndview_core::{
    FrameOutput, Kernel, KernelSettings, Polytope, PolytopeKind, RootSystemKind, TransformBuilder,
};
pub use ndview_math::{GeometryError, MatrixN, Result};
