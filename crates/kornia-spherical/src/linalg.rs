use glam::{DMat3, DVec3};

/// Compute the right null vector of a matrix.
///
/// Returns the right singular vector associated with the smallest singular
/// value, i.e. the unit vector `x` minimizing `‖A x‖`. The full SVD is used so
/// that under-determined systems (fewer rows than columns) are handled.
///
/// # Arguments
///
/// * `a` - The design matrix (rows x cols).
///
/// # Returns
///
/// A vector of length `cols` with unit norm.
pub fn nullspace(a: faer::MatRef<'_, f64>) -> Vec<f64> {
    let svd = a.svd();
    let v = svd.v();
    let last = v.ncols() - 1;
    (0..v.nrows()).map(|i| v.read(i, last)).collect()
}

/// Build a 3x3 matrix from 9 values laid out in row-major order.
pub fn mat3_from_row_major(e: &[f64]) -> DMat3 {
    debug_assert_eq!(e.len(), 9);
    DMat3::from_cols(
        DVec3::new(e[0], e[3], e[6]),
        DVec3::new(e[1], e[4], e[7]),
        DVec3::new(e[2], e[5], e[8]),
    )
}

/// Copy a glam 3x3 matrix into a faer matrix.
pub fn mat3_to_faer(m: &DMat3) -> faer::Mat<f64> {
    faer::Mat::<f64>::from_fn(3, 3, |i, j| m.col(j)[i])
}

/// Copy a 3x3 faer matrix into a glam matrix.
pub fn mat3_from_faer(m: faer::MatRef<'_, f64>) -> DMat3 {
    debug_assert_eq!((m.nrows(), m.ncols()), (3, 3));
    DMat3::from_cols(
        DVec3::new(m.read(0, 0), m.read(1, 0), m.read(2, 0)),
        DVec3::new(m.read(0, 1), m.read(1, 1), m.read(2, 1)),
        DVec3::new(m.read(0, 2), m.read(1, 2), m.read(2, 2)),
    )
}

/// Compute the SVD of a 3x3 matrix as `(U, singular values, V)`.
///
/// Singular values are sorted in non-increasing order and `m = U diag(s) Vᵀ`.
pub fn svd3(m: &DMat3) -> (DMat3, DVec3, DMat3) {
    let svd = mat3_to_faer(m).svd();
    let s = svd.s_diagonal();
    (
        mat3_from_faer(svd.u()),
        DVec3::new(s.read(0), s.read(1), s.read(2)),
        mat3_from_faer(svd.v()),
    )
}

/// Singular values of a 3x3 matrix in non-increasing order.
pub fn singular_values3(m: &DMat3) -> DVec3 {
    svd3(m).1
}

/// Skew-symmetric matrix `[t]×` such that `[t]× x = t × x`.
#[cfg(test)]
pub(crate) fn skew(t: &DVec3) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(0.0, t.z, -t.y),
        DVec3::new(-t.z, 0.0, t.x),
        DVec3::new(t.y, -t.x, 0.0),
    )
}
