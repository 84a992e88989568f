use thiserror::Error;

/// Error types for spherical relative pose estimation and triangulation.
#[derive(Debug, Error)]
pub enum SphericalError {
    /// Not enough correspondences (or sample indices) for the solver.
    #[error("Solver requires at least {required} correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum number of correspondences required by the solver.
        required: usize,
        /// Actual number of correspondences provided.
        actual: usize,
    },

    /// Invalid input data - mismatched array lengths with descriptive labels.
    #[error("Mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedArrayLengths {
        /// Label for the left-hand slice.
        left_name: &'static str,
        /// Length of the left-hand slice.
        left_len: usize,
        /// Label for the right-hand slice.
        right_name: &'static str,
        /// Length of the right-hand slice.
        right_len: usize,
    },

    /// A sample index does not refer to a stored correspondence.
    #[error("Sample index {index} out of range for {len} correspondences")]
    SampleIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of stored correspondences.
        len: usize,
    },

    /// The equirectangular image has a zero dimension.
    #[error("Invalid equirectangular image size: {width}x{height}")]
    InvalidImageSize {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },

    /// The requested operation is not supported by this solver.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The homogeneous coordinate of a triangulated point is too close to zero.
    #[error("Triangulated point lies at infinity (w = {w})")]
    PointAtInfinity {
        /// The homogeneous coordinate of the point.
        w: f64,
    },
}

/// Check that two slices are index-aligned.
pub(crate) fn check_aligned<A, B>(
    left_name: &'static str,
    left: &[A],
    right_name: &'static str,
    right: &[B],
) -> Result<(), SphericalError> {
    if left.len() != right.len() {
        return Err(SphericalError::MismatchedArrayLengths {
            left_name,
            left_len: left.len(),
            right_name,
            right_len: right.len(),
        });
    }
    Ok(())
}
