//! Kernels adapting a solver and an error metric to a robust estimator.
//!
//! The robust estimation loop itself (sampling, thresholds, termination) lives
//! outside this crate. It drives a [`Kernel`] through index sets: fit models on
//! a sample, then score every stored correspondence against each model.

use crate::error::{check_aligned, SphericalError};
use crate::essential::{AngularError, EightPointSpherical};
use crate::solver::{ErrorMetric, Solver};
use glam::DVec3;

/// The fit/evaluate contract consumed by a robust estimator.
pub trait Kernel {
    /// The model type being estimated.
    type Model;

    /// Minimum number of sample indices accepted by [`Kernel::fit`].
    fn min_samples(&self) -> usize;

    /// Maximum number of models returned by a single [`Kernel::fit`].
    fn max_models(&self) -> usize;

    /// Total number of stored correspondences.
    fn num_samples(&self) -> usize;

    /// Fit candidate models on the correspondences at `samples`.
    fn fit(&self, samples: &[usize]) -> Result<Vec<Self::Model>, SphericalError>;

    /// Error of `model` for the correspondence at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_samples()`.
    fn residual(&self, model: &Self::Model, index: usize) -> f64;
}

/// A kernel fitting models to pairs of index-aligned bearings.
///
/// The kernel borrows the correspondences and never modifies them, so a single
/// instance can be shared between threads evaluating disjoint samples.
#[derive(Debug, Clone)]
pub struct PointFittingKernel<'a, S, M> {
    solver: S,
    metric: M,
    x1: &'a [DVec3],
    x2: &'a [DVec3],
}

/// Kernel estimating the essential matrix between two spherical cameras.
pub type SphericalEssentialKernel<'a> = PointFittingKernel<'a, EightPointSpherical, AngularError>;

impl<'a> SphericalEssentialKernel<'a> {
    /// Create the eight-point / angular-error kernel over the given bearings.
    ///
    /// # Arguments
    ///
    /// * `x1` - Bearings observed by the first camera.
    /// * `x2` - Bearings observed by the second camera, index-aligned with `x1`.
    pub fn spherical(x1: &'a [DVec3], x2: &'a [DVec3]) -> Result<Self, SphericalError> {
        Self::new(EightPointSpherical, AngularError, x1, x2)
    }
}

impl<'a, S, M> PointFittingKernel<'a, S, M>
where
    S: Solver,
    M: ErrorMetric<S::Model>,
{
    /// Create a kernel from a solver, an error metric and the correspondences.
    ///
    /// Returns an error if `x1` and `x2` are not index-aligned.
    pub fn new(
        solver: S,
        metric: M,
        x1: &'a [DVec3],
        x2: &'a [DVec3],
    ) -> Result<Self, SphericalError> {
        check_aligned("x1", x1, "x2", x2)?;
        Ok(Self {
            solver,
            metric,
            x1,
            x2,
        })
    }

    /// The bearings observed by the first camera.
    pub fn x1(&self) -> &'a [DVec3] {
        self.x1
    }

    /// The bearings observed by the second camera.
    pub fn x2(&self) -> &'a [DVec3] {
        self.x2
    }

    /// Fit candidate models on every stored correspondence.
    pub fn fit_all(&self) -> Result<Vec<S::Model>, SphericalError> {
        self.solver.solve(self.x1, self.x2)
    }
}

impl<S, M> Kernel for PointFittingKernel<'_, S, M>
where
    S: Solver,
    M: ErrorMetric<S::Model>,
{
    type Model = S::Model;

    fn min_samples(&self) -> usize {
        self.solver.min_samples()
    }

    fn max_models(&self) -> usize {
        self.solver.max_models()
    }

    fn num_samples(&self) -> usize {
        self.x1.len()
    }

    fn fit(&self, samples: &[usize]) -> Result<Vec<Self::Model>, SphericalError> {
        let required = self.solver.min_samples();
        if samples.len() < required {
            return Err(SphericalError::InsufficientCorrespondences {
                required,
                actual: samples.len(),
            });
        }

        let len = self.x1.len();
        let mut x1 = Vec::with_capacity(samples.len());
        let mut x2 = Vec::with_capacity(samples.len());
        for &index in samples {
            if index >= len {
                return Err(SphericalError::SampleIndexOutOfRange { index, len });
            }
            x1.push(self.x1[index]);
            x2.push(self.x2[index]);
        }

        log::trace!("kernel fit on {} of {} correspondences", samples.len(), len);

        self.solver.solve(&x1, &x2)
    }

    fn residual(&self, model: &Self::Model, index: usize) -> f64 {
        self.metric.error(model, &self.x1[index], &self.x2[index])
    }
}
