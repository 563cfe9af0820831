/// 3x3 matrix helpers and elementary rotations
use nalgebra::{Matrix3, Vector3};

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Map 0, 1, 2 to X, Y, Z
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Row-by-column product `l * r`
pub fn multiply_matrix(l: &Matrix3<f32>, r: &Matrix3<f32>) -> Matrix3<f32> {
    Matrix3::from_fn(|row, col| (0..3).map(|k| l[(row, k)] * r[(k, col)]).sum())
}

/// Matrix times column vector `l * v`
pub fn multiply_vector(l: &Matrix3<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    Vector3::from_fn(|row, _| (0..3).map(|k| l[(row, k)] * v[k]).sum())
}

/// Elementary rotation of `angle` radians about `axis`.
///
/// Positive angles rotate counter-clockwise when looking from the positive
/// end of the axis toward the origin.
pub fn rotation_matrix(axis: Axis, angle: f32) -> Matrix3<f32> {
    let (sin, cos) = angle.sin_cos();
    match axis {
        Axis::X => Matrix3::new(
            1.0, 0.0, 0.0,
            0.0, cos, -sin,
            0.0, sin, cos,
        ),
        Axis::Y => Matrix3::new(
            cos, 0.0, sin,
            0.0, 1.0, 0.0,
            -sin, 0.0, cos,
        ),
        Axis::Z => Matrix3::new(
            cos, -sin, 0.0,
            sin, cos, 0.0,
            0.0, 0.0, 1.0,
        ),
    }
}

/// Rotation about the axis with the given index; unknown indices yield the identity
pub fn rotation_matrix_for_index(index: usize, angle: f32) -> Matrix3<f32> {
    match Axis::from_index(index) {
        Some(axis) => rotation_matrix(axis, angle),
        None => Matrix3::identity(),
    }
}
