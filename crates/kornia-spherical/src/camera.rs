//! Equirectangular (360°) camera model.
//!
//! A spherical camera has no intrinsics: every pixel of the equirectangular
//! panorama maps to a fixed direction on the unit sphere. With normalized
//! coordinates `u = x / width` and `v = y / height`:
//!
//! ```text
//! d = normalize( sin(πv)·cos(π(2u + 0.5)),  cos(πv),  sin(πv)·sin(π(2u + 0.5)) )
//! ```
//!
//! `v` is the polar angle measured from the +Y axis and the azimuth is measured
//! in the XZ plane. Coordinates outside the image are not clamped; they wrap
//! through the trigonometric functions.

use crate::error::SphericalError;
use glam::{DVec2, DVec3};
use std::f64::consts::PI;

/// Geometry of an equirectangular panorama.
///
/// Both dimensions are guaranteed to be non-zero; deserialization goes
/// through [`EquirectangularCamera::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ImageSize")]
pub struct EquirectangularCamera {
    width: usize,
    height: usize,
}

// Unvalidated wire form of the camera.
#[derive(serde::Deserialize)]
struct ImageSize {
    width: usize,
    height: usize,
}

impl TryFrom<ImageSize> for EquirectangularCamera {
    type Error = SphericalError;

    fn try_from(size: ImageSize) -> Result<Self, Self::Error> {
        Self::new(size.width, size.height)
    }
}

impl EquirectangularCamera {
    /// Create a camera for a panorama of the given size.
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, SphericalError> {
        if width == 0 || height == 0 {
            return Err(SphericalError::InvalidImageSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Image width in pixels (spans 360° of azimuth).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels (spans 180° of polar angle).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Map a pixel to its unit bearing.
    pub fn unproject(&self, pixel: &DVec2) -> DVec3 {
        pixel_to_bearing(pixel, self)
    }

    /// Map a bearing to its pixel, with the azimuth wrapped into `[0, width)`.
    pub fn project(&self, bearing: &DVec3) -> DVec2 {
        bearing_to_pixel(bearing, self)
    }

    /// Map a set of pixels to unit bearings.
    pub fn unproject_points(&self, pixels: &[DVec2]) -> Vec<DVec3> {
        pixels.iter().map(|p| self.unproject(p)).collect()
    }
}

impl Default for EquirectangularCamera {
    fn default() -> Self {
        Self {
            width: 4096,
            height: 2048,
        }
    }
}

/// Convert an equirectangular pixel to a unit direction on the sphere.
///
/// The output is always renormalized. The poles (`y = 0` and `y = height`)
/// are valid inputs and map to `±Y` regardless of `x`.
pub fn pixel_to_bearing(pixel: &DVec2, camera: &EquirectangularCamera) -> DVec3 {
    let u = pixel.x / camera.width as f64;
    let v = pixel.y / camera.height as f64;

    let (sin_v, cos_v) = (v * PI).sin_cos();
    let (sin_a, cos_a) = (PI * (2.0 * u + 0.5)).sin_cos();

    DVec3::new(sin_v * cos_a, cos_v, sin_v * sin_a).normalize()
}

/// Convert a direction to its equirectangular pixel.
///
/// Inverse of [`pixel_to_bearing`]. The direction does not need to be unit
/// length. The returned `x` lies in `[0, width)` and `y` in `[0, height]`.
pub fn bearing_to_pixel(bearing: &DVec3, camera: &EquirectangularCamera) -> DVec2 {
    let d = bearing.normalize();
    let v = d.y.clamp(-1.0, 1.0).acos() / PI;
    let azimuth = d.z.atan2(d.x);
    let u = ((azimuth / PI - 0.5) / 2.0).rem_euclid(1.0);
    DVec2::new(u * camera.width as f64, v * camera.height as f64)
}

/// Convert planar equirectangular coordinates to unit-sphere directions.
///
/// # Arguments
///
/// * `planar_coords` - The `(x, y)` pixel coordinates.
/// * `width` - Width of the panorama in pixels.
/// * `height` - Height of the panorama in pixels.
///
/// # Returns
///
/// One unit bearing per input coordinate, in the same order, or
/// [`SphericalError::InvalidImageSize`] if a dimension is zero.
pub fn planar_to_spherical(
    planar_coords: &[DVec2],
    width: usize,
    height: usize,
) -> Result<Vec<DVec3>, SphericalError> {
    let camera = EquirectangularCamera::new(width, height)?;
    Ok(camera.unproject_points(planar_coords))
}
