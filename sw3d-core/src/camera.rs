/// Camera position and orientation, kept as a pair of inverse rotations
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nalgebra::{Matrix3, Point3, Vector3};

use crate::linalg::{multiply_matrix, multiply_vector, rotation_matrix, Axis};

/// Camera state.
///
/// Orientation is stored twice: `world_to_camera` and its exact inverse
/// `camera_to_world`. Both only ever change by composition with elementary
/// rotations, so they stay orthonormal and mutually inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Point3<f32>,
    world_to_camera: Matrix3<f32>,
    camera_to_world: Matrix3<f32>,
}

impl Camera {
    /// Camera at the origin looking along +z, with +y up and +x right
    pub fn new() -> Self {
        Self {
            position: Point3::origin(),
            world_to_camera: Matrix3::identity(),
            camera_to_world: Matrix3::identity(),
        }
    }

    /// Camera at `position`, rotated by `angles` (radians about x, y, z)
    pub fn with_angles(position: Point3<f32>, angles: Vector3<f32>) -> Self {
        let world_to_camera = multiply_matrix(
            &rotation_matrix(Axis::X, -angles.x),
            &multiply_matrix(
                &rotation_matrix(Axis::Y, -angles.y),
                &rotation_matrix(Axis::Z, -angles.z),
            ),
        );
        let camera_to_world = multiply_matrix(
            &rotation_matrix(Axis::Z, angles.z),
            &multiply_matrix(
                &rotation_matrix(Axis::Y, angles.y),
                &rotation_matrix(Axis::X, angles.x),
            ),
        );

        Self {
            position,
            world_to_camera,
            camera_to_world,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn world_to_camera(&self) -> &Matrix3<f32> {
        &self.world_to_camera
    }

    pub fn camera_to_world(&self) -> &Matrix3<f32> {
        &self.camera_to_world
    }

    /// Move along one of the camera's own axes
    pub fn translate_along_axis(&mut self, axis: Axis, amount: f32) {
        let direction = multiply_vector(&self.camera_to_world, &axis.unit());
        self.position += direction * amount;
    }

    /// Rotate by `amount` radians about `axis`
    pub fn rotate(&mut self, axis: Axis, amount: f32) {
        self.world_to_camera =
            multiply_matrix(&self.world_to_camera, &rotation_matrix(axis, -amount));
        self.camera_to_world =
            multiply_matrix(&rotation_matrix(axis, amount), &self.camera_to_world);
    }

    /// Camera-space coordinates of a world-space point
    pub fn to_camera_space(&self, point: &Point3<f32>) -> Vector3<f32> {
        multiply_vector(&self.world_to_camera, &(point - self.position))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera shared between the render loop and input handling.
///
/// Every read and read-modify-write goes through one lock, so the render
/// loop always sees a consistent position/orientation pair.
#[derive(Debug, Clone, Default)]
pub struct SharedCamera {
    inner: Arc<Mutex<Camera>>,
}

impl SharedCamera {
    pub fn new(camera: Camera) -> Self {
        Self {
            inner: Arc::new(Mutex::new(camera)),
        }
    }

    // Camera updates are plain arithmetic and cannot leave the state half-written
    fn lock(&self) -> MutexGuard<'_, Camera> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current camera state
    pub fn snapshot(&self) -> Camera {
        *self.lock()
    }

    pub fn translate_along_axis(&self, axis: Axis, amount: f32) {
        self.lock().translate_along_axis(axis, amount);
    }

    pub fn rotate(&self, axis: Axis, amount: f32) {
        self.lock().rotate(axis, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal_pair(camera: &Camera) {
        let w = camera.world_to_camera();
        let c = camera.camera_to_world();
        assert_relative_eq!(w * c, Matrix3::identity(), epsilon = 1e-4);
        assert_relative_eq!(w * w.transpose(), Matrix3::identity(), epsilon = 1e-4);
        assert_relative_eq!(c * c.transpose(), Matrix3::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_initial_state() {
        let camera = Camera::new();
        assert_eq!(camera.position(), Point3::origin());
        assert_eq!(*camera.world_to_camera(), Matrix3::identity());
        assert_eq!(*camera.camera_to_world(), Matrix3::identity());
    }

    #[test]
    fn test_rotations_keep_matrices_inverse() {
        let mut camera = Camera::new();
        for step in 0..500 {
            let axis = Axis::from_index(step % 3).unwrap();
            camera.rotate(axis, 0.02 * (step as f32).sin() + 0.01);
        }
        assert_orthonormal_pair(&camera);
    }

    #[test]
    fn test_with_angles_is_inverse_pair() {
        let camera = Camera::with_angles(Point3::new(2.0, 2.0, -2.0), Vector3::new(0.1, 0.2, 0.3));
        assert_orthonormal_pair(&camera);
    }

    #[test]
    fn test_translate_follows_local_axis() {
        let mut camera = Camera::new();
        camera.translate_along_axis(Axis::X, 2.0);
        assert_relative_eq!(camera.position(), Point3::new(2.0, 0.0, 0.0));

        // After a quarter turn about y, local +z points along world +x
        let mut camera = Camera::new();
        camera.rotate(Axis::Y, std::f32::consts::FRAC_PI_2);
        camera.translate_along_axis(Axis::Z, 1.0);
        assert_relative_eq!(camera.position(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_camera_space_of_point_ahead() {
        let mut camera = Camera::new();
        camera.translate_along_axis(Axis::Z, -3.0);
        let c = camera.to_camera_space(&Point3::new(0.5, -0.5, 2.0));
        assert_relative_eq!(c, Vector3::new(0.5, -0.5, 5.0));
    }

    #[test]
    fn test_shared_camera_updates_are_visible() {
        let shared = SharedCamera::new(Camera::new());
        let handle = shared.clone();
        std::thread::spawn(move || handle.translate_along_axis(Axis::Y, 1.5))
            .join()
            .unwrap();
        assert_relative_eq!(shared.snapshot().position(), Point3::new(0.0, 1.5, 0.0));
    }
}
