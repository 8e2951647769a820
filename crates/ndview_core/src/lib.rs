//! Core of the ndview geometry kernel
//!
//! Builds on the math, rotation and projection crates:
//!
//! - [`transform`] - scale, shear and homogeneous translation, plus [`TransformBuilder`]
//! - [`vertices`] - batch matrix application and edge recovery over flat vertex buffers
//! - [`polytope`] - hypercube, simplex and root system generators
//! - [`kernel`] - [`Kernel`], which runs one animation frame end to end

pub mod kernel;
pub mod polytope;
pub mod transform;
pub mod vertices;

pub use kernel::{FrameOutput, Kernel, KernelSettings};
pub use polytope::{Polytope, PolytopeKind, RootSystemKind};
pub use transform::{
    apply_transform, compose_transformations, embed_homogeneous, from_homogeneous,
    scale_matrix, shear_matrix, to_homogeneous, translation_matrix, uniform_scale_matrix,
    TransformBuilder,
};
pub use vertices::{apply_matrix_to_vertices, build_knn_edges, build_short_edges};

// Re-export the lower layers so most users only depend on this crate
pub use ndview_math::{self as math, GeometryError, MatrixN, Result, TrigMode};
pub use ndview_projection as projection;
pub use ndview_rotation::{self as rotation, BackendKind, RotationContext};
