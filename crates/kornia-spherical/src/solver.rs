//! Capability traits shared by model solvers and error metrics.
//!
//! A robust estimator (RANSAC, AC-RANSAC, ...) only needs two things from a
//! geometric problem: a way to fit candidate models to a small sample and a
//! way to score one model against one correspondence. [`Solver`] and
//! [`ErrorMetric`] describe those two capabilities; any pair of them can back a
//! [`crate::kernel::PointFittingKernel`].

use crate::error::SphericalError;
use glam::DVec3;

/// A solver producing candidate models from bearing correspondences.
pub trait Solver {
    /// The model type produced by the solver.
    type Model;

    /// Minimum number of correspondences needed to fit a model.
    fn min_samples(&self) -> usize;

    /// Maximum number of candidate models returned by a single fit.
    fn max_models(&self) -> usize;

    /// Fit candidate models to index-aligned correspondences.
    ///
    /// # Arguments
    ///
    /// * `x1` - Bearings observed by the first camera.
    /// * `x2` - Bearings observed by the second camera.
    fn solve(&self, x1: &[DVec3], x2: &[DVec3]) -> Result<Vec<Self::Model>, SphericalError>;

    /// Fit candidate models with a per-correspondence weight.
    ///
    /// Solvers without a weighted formulation return
    /// [`SphericalError::Unsupported`].
    fn solve_weighted(
        &self,
        _x1: &[DVec3],
        _x2: &[DVec3],
        _weights: &[f64],
    ) -> Result<Vec<Self::Model>, SphericalError> {
        Err(SphericalError::Unsupported(
            "this solver does not support problem solving with weights",
        ))
    }
}

/// Residual of a model against a single correspondence.
pub trait ErrorMetric<M> {
    /// Compute the error of `model` for the correspondence `(x1, x2)`.
    fn error(&self, model: &M, x1: &DVec3, x2: &DVec3) -> f64;
}
