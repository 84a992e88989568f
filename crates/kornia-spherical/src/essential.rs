//! Essential matrix estimation between two spherical cameras.
//!
//! Bearings of a spherical camera are full 3D unit vectors, so the epipolar
//! constraint `x2ᵀ E x1 = 0` is encoded directly on them, without dividing by
//! the third coordinate as a pinhole solver would.

use crate::error::{check_aligned, SphericalError};
use crate::linalg::{mat3_from_row_major, nullspace, svd3};
use crate::solver::{ErrorMetric, Solver};
use glam::{DMat3, DVec3};

/// Number of correspondences in a minimal eight-point sample.
pub const EIGHT_POINT_MIN_SAMPLES: usize = 8;

/// Encode the epipolar equation `x2ᵀ E x1 = 0` as a linear system `A e = 0`.
///
/// Row `i` holds the outer product `x2[i] x1[i]ᵀ` flattened in row-major
/// order, matching the layout of the unknown `e = [E00, E01, ..., E22]`.
///
/// PRECONDITION: `x1` and `x2` have the same length.
pub fn encode_epipolar_equation(x1: &[DVec3], x2: &[DVec3]) -> faer::Mat<f64> {
    debug_assert_eq!(x1.len(), x2.len());
    let mut a = faer::Mat::<f64>::zeros(x1.len(), 9);
    for (i, (p1, p2)) in x1.iter().zip(x2.iter()).enumerate() {
        for r in 0..3 {
            for c in 0..3 {
                a.write(i, 3 * r + c, p2[r] * p1[c]);
            }
        }
    }
    a
}

/// Project a 3x3 matrix onto the essential manifold.
///
/// The two largest singular values are replaced by their mean and the
/// smallest is set to zero, which gives the closest essential matrix in
/// Frobenius norm while keeping the scale of the input.
pub fn enforce_essential_manifold(e: &DMat3) -> DMat3 {
    let (u, d, v) = svd3(e);
    let mean = (d.x + d.y) / 2.0;
    u * DMat3::from_diagonal(DVec3::new(mean, mean, 0.0)) * v.transpose()
}

/// Angular distance, in radians, of `x2` from the epipolar plane `E x1`.
///
/// The value lies in `[0, π/2]`. Neither bearing needs to be unit length. A
/// model mapping `x1` to the zero vector yields `NaN`.
pub fn epipolar_angular_error(e: &DMat3, x1: &DVec3, x2: &DVec3) -> f64 {
    let em1 = (*e * *x1).normalize();
    let sin_angle = x2.dot(em1) / (x2.length() * em1.length());
    sin_angle.clamp(-1.0, 1.0).asin().abs()
}

/// Linear eight-point solver for the essential matrix of two spherical cameras.
///
/// Solves the homogeneous epipolar system in the least-squares sense via SVD.
/// When more than eight correspondences are given, the solution is projected
/// onto the essential manifold (two equal singular values, the third zero).
/// The minimal eight-point solution is returned as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct EightPointSpherical;

impl EightPointSpherical {
    /// Create a new eight-point solver.
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EightPointSpherical {
    type Model = DMat3;

    fn min_samples(&self) -> usize {
        EIGHT_POINT_MIN_SAMPLES
    }

    fn max_models(&self) -> usize {
        1
    }

    fn solve(&self, x1: &[DVec3], x2: &[DVec3]) -> Result<Vec<DMat3>, SphericalError> {
        check_aligned("x1", x1, "x2", x2)?;
        if x1.len() < EIGHT_POINT_MIN_SAMPLES {
            return Err(SphericalError::InsufficientCorrespondences {
                required: EIGHT_POINT_MIN_SAMPLES,
                actual: x1.len(),
            });
        }

        let a = encode_epipolar_equation(x1, x2);
        let e = mat3_from_row_major(&nullspace(a.as_ref()));

        let e = if x1.len() > EIGHT_POINT_MIN_SAMPLES {
            enforce_essential_manifold(&e)
        } else {
            e
        };

        log::trace!(
            "eight-point: {} correspondences, manifold projection: {}",
            x1.len(),
            x1.len() > EIGHT_POINT_MIN_SAMPLES
        );

        Ok(vec![e])
    }
}

/// Angular epipolar error for spherical bearings, in radians.
///
/// Inlier thresholds used with this metric must be expressed as angles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngularError;

impl ErrorMetric<DMat3> for AngularError {
    fn error(&self, model: &DMat3, x1: &DVec3, x2: &DVec3) -> f64 {
        epipolar_angular_error(model, x1, x2)
    }
}
