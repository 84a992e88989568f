//! Linear two-view triangulation.
//!
//! A bearing `x` observed by a camera `P` is parallel to `P X`, so
//! `x × (P X) = 0`. Stacking that cross product for both views gives a 6x4
//! homogeneous system whose null vector is the point `X`.

use crate::error::SphericalError;
use crate::linalg::nullspace;
use glam::{DMat3, DVec3, DVec4};

/// A 3x4 camera projection matrix in row-major order.
pub type ProjectionMatrix = [[f64; 4]; 3];

/// Parameters for euclidean triangulation.
#[derive(Debug, Clone, Copy)]
pub struct TriangulationParams {
    /// Homogeneous coordinates with an absolute value below this threshold are
    /// reported as points at infinity.
    pub min_homogeneous_w: f64,
}

impl Default for TriangulationParams {
    fn default() -> Self {
        Self {
            min_homogeneous_w: 1e-12,
        }
    }
}

/// Build the projection matrix `[R | t]` of a camera pose.
///
/// The pose maps points from the reference frame into the camera frame:
/// `x_cam = R x + t`.
pub fn projection_from_pose(rotation: &DMat3, translation: &DVec3) -> ProjectionMatrix {
    let mut p = [[0.0; 4]; 3];
    for (i, row) in p.iter_mut().enumerate() {
        let r = rotation.row(i);
        *row = [r.x, r.y, r.z, translation[i]];
    }
    p
}

/// Project a euclidean point to a unit bearing of the camera `p`.
pub fn project_to_bearing(p: &ProjectionMatrix, point: &DVec3) -> DVec3 {
    let xh = point.extend(1.0);
    DVec3::new(
        DVec4::from_array(p[0]).dot(xh),
        DVec4::from_array(p[1]).dot(xh),
        DVec4::from_array(p[2]).dot(xh),
    )
    .normalize()
}

// Rows of cross(x, P X) = 0, one per component of the cross product.
fn write_cross_rows(a: &mut faer::Mat<f64>, offset: usize, p: &ProjectionMatrix, x: &DVec3) {
    for j in 0..4 {
        a.write(offset, j, -x.z * p[1][j] + x.y * p[2][j]);
        a.write(offset + 1, j, x.z * p[0][j] - x.x * p[2][j]);
        a.write(offset + 2, j, -x.y * p[0][j] + x.x * p[1][j]);
    }
}

/// Triangulate a 3D point from two bearings with the direct linear transform.
///
/// Solves the homogeneous system `[x1]× P1 X = 0`, `[x2]× P2 X = 0` in the
/// least-squares sense. The third row of each cross product is redundant but
/// kept in the 6x4 design matrix.
///
/// # Arguments
///
/// * `p1` - Projection matrix of the first camera.
/// * `x1` - Bearing observed by the first camera.
/// * `p2` - Projection matrix of the second camera.
/// * `x2` - Bearing observed by the second camera.
///
/// # Returns
///
/// The homogeneous point with unit norm. Degenerate geometry (parallel rays, a
/// point at infinity) still yields a well-formed vector; its last coordinate
/// must be checked before dividing.
pub fn triangulate_dlt(
    p1: &ProjectionMatrix,
    x1: &DVec3,
    p2: &ProjectionMatrix,
    x2: &DVec3,
) -> DVec4 {
    let mut design = faer::Mat::<f64>::zeros(6, 4);
    write_cross_rows(&mut design, 0, p1, x1);
    write_cross_rows(&mut design, 3, p2, x2);

    let x = nullspace(design.as_ref());
    DVec4::new(x[0], x[1], x[2], x[3])
}

/// Convert a homogeneous point to euclidean coordinates.
///
/// Returns [`SphericalError::PointAtInfinity`] when `|w|` is below
/// `min_homogeneous_w`.
pub fn homogeneous_to_euclidean(
    x: &DVec4,
    min_homogeneous_w: f64,
) -> Result<DVec3, SphericalError> {
    if x.w.abs() < min_homogeneous_w {
        log::trace!("homogeneous point {x} is at infinity");
        return Err(SphericalError::PointAtInfinity { w: x.w });
    }
    Ok(x.truncate() / x.w)
}

/// Triangulate a euclidean 3D point from two bearings.
///
/// See [`triangulate_dlt`]. Fails with [`SphericalError::PointAtInfinity`] when
/// the homogeneous solution cannot be dehomogenized.
pub fn triangulate_dlt_euclidean(
    p1: &ProjectionMatrix,
    x1: &DVec3,
    p2: &ProjectionMatrix,
    x2: &DVec3,
    params: &TriangulationParams,
) -> Result<DVec3, SphericalError> {
    let x = triangulate_dlt(p1, x1, p2, x2);
    homogeneous_to_euclidean(&x, params.min_homogeneous_w)
}
