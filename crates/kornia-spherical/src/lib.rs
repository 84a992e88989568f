#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Equirectangular camera model: pixels to unit-sphere bearings and back.
pub mod camera;

/// Error types for the spherical two-view pipeline.
pub mod error;

/// Essential matrix estimation from bearing correspondences.
pub mod essential;

/// Kernels adapting solvers and error metrics to robust estimators.
pub mod kernel;

/// Linear algebra utilities.
pub mod linalg;

/// Capability traits for minimal solvers and error metrics.
pub mod solver;

/// Two-view triangulation of bearing correspondences.
pub mod triangulation;

pub use camera::{
    bearing_to_pixel, pixel_to_bearing, planar_to_spherical, EquirectangularCamera,
};
pub use error::SphericalError;
pub use essential::{AngularError, EightPointSpherical};
pub use kernel::{Kernel, PointFittingKernel, SphericalEssentialKernel};
pub use solver::{ErrorMetric, Solver};
pub use triangulation::{
    triangulate_dlt, triangulate_dlt_euclidean, ProjectionMatrix, TriangulationParams,
};
