/// Camera and projection utilities
use nalgebra::{Matrix4, Vector3};

use crate::transform::Transform;

/// Vertical field of view the projection matrix is actually built with
pub const PROJECTION_FOV: f64 = std::f64::consts::PI / 3.0;

pub const DEFAULT_NEAR: f64 = 0.1;
pub const DEFAULT_FAR: f64 = 1024.0;
pub const DEFAULT_FOV_DEGREES: f64 = 90.0;

/// Output surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Height over width, as used by the projection
    pub fn aspect(&self) -> f64 {
        self.height / self.width
    }

    /// Multipliers taking clip x/y to centred pixel coordinates
    pub fn half_extents(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(500.0, 500.0)
    }
}

/// A fixed look-at camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f64>,
    pub target: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl Camera {
    pub fn new(position: Vector3<f64>, target: Vector3<f64>) -> Self {
        Self {
            position,
            target,
            up: Vector3::y(),
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Transform::look_at(&self.position, &self.target, &self.up)
    }

    /// Unit direction the camera looks along; zero if target equals position
    pub fn direction(&self) -> Vector3<f64> {
        Transform::normalize_or_zero(self.target - self.position)
    }
}

/// Perspective projection parameters.
///
/// `fov_degrees` is carried as configuration only: [`ProjectionConfig::matrix`]
/// always uses [`PROJECTION_FOV`] (60 degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    /// Height over width
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub fov_degrees: f64,
}

impl ProjectionConfig {
    /// Build the projection matrix.
    ///
    /// The `1` sits in the depth row and the `-2 * far * near / (far - near)`
    /// term in the translation slot of that layout; no perspective divide
    /// follows, so clip z is used directly as depth.
    pub fn matrix(&self) -> Matrix4<f64> {
        let f = 1.0 / (PROJECTION_FOV / 2.0).tan();
        let depth = self.far - self.near;

        #[rustfmt::skip]
        let projection = Matrix4::new(
            f * self.aspect, 0.0, 0.0,                            0.0,
            0.0,             f,   0.0,                            0.0,
            0.0,             0.0, (self.far + self.near) / depth, 1.0,
            0.0,             0.0, -(2.0 * self.far * self.near) / depth, 0.0,
        );
        projection
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            aspect: Viewport::default().aspect(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }
}
