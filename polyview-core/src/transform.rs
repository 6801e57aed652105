/// 4x4 homogeneous matrix math.
///
/// Vectors are columns: a matrix is applied as `M * v`, so a composed
/// transform `A * B` applies `B` first.
use nalgebra::{Matrix4, Vector3, Vector4};

/// Matrix builders and helpers
pub struct Transform;

impl Transform {
    /// Matrix product `a * b`
    pub fn multiply(a: &Matrix4<f64>, b: &Matrix4<f64>) -> Matrix4<f64> {
        a * b
    }

    /// Transform a homogeneous vector, `m * v`
    pub fn apply(m: &Matrix4<f64>, v: &Vector4<f64>) -> Vector4<f64> {
        m * v
    }

    /// Rotation from Euler angles in degrees, composed as `Rx * Ry * Rz`
    pub fn rotation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        let (sx, cx) = x.to_radians().sin_cos();
        let (sy, cy) = y.to_radians().sin_cos();
        let (sz, cz) = z.to_radians().sin_cos();

        #[rustfmt::skip]
        let rx = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, cx,  -sx, 0.0,
            0.0, sx,  cx,  0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let ry = Matrix4::new(
            cy,  0.0, sy,  0.0,
            0.0, 1.0, 0.0, 0.0,
            -sy, 0.0, cy,  0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let rz = Matrix4::new(
            cz,  -sz, 0.0, 0.0,
            sz,  cz,  0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        Self::multiply(&Self::multiply(&rx, &ry), &rz)
    }

    /// Uniform scale applied to all four components, including `w`
    pub fn scale(factor: f64) -> Matrix4<f64> {
        Matrix4::from_diagonal_element(factor)
    }

    /// View matrix looking from `eye` towards `target`.
    ///
    /// Rows of the rotation block are `right`, `up` and `-forward`, where
    /// `right = up_hint x forward`. When `eye == target` the forward axis is
    /// the zero vector and the resulting matrix is singular; no fault is raised.
    pub fn look_at(eye: &Vector3<f64>, target: &Vector3<f64>, up: &Vector3<f64>) -> Matrix4<f64> {
        let forward = Self::normalize_or_zero(target - eye);
        let right = Self::normalize_or_zero(up.cross(&forward));
        let new_up = forward.cross(&right);
        let back = -forward;

        #[rustfmt::skip]
        let view = Matrix4::new(
            right.x,  right.y,  right.z,  -right.dot(eye),
            new_up.x, new_up.y, new_up.z, -new_up.dot(eye),
            back.x,   back.y,   back.z,   -back.dot(eye),
            0.0,      0.0,      0.0,      1.0,
        );
        view
    }

    /// Unit vector along `v`, or `v` itself when it has zero length
    pub fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
        v.try_normalize(0.0).unwrap_or(v)
    }
}
