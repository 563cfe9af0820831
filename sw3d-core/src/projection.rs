/// View surface and perspective projection of scene vertices
use nalgebra::{Point2, Vector3};

use crate::camera::Camera;
use crate::error::SceneError;
use crate::geometry::Vertex;

/// Planar rectangle fixed in camera space, subdivided into a pixel grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSurface {
    /// Offset of the surface from the camera, usually on the forward axis
    pub position: Vector3<f32>,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    width: usize,
    height: usize,
}

impl ViewSurface {
    pub fn new(
        position: Vector3<f32>,
        [left, right, bottom, top]: [f32; 4],
        width: usize,
        height: usize,
    ) -> Result<Self, SceneError> {
        if width < 1 || height < 1 {
            return Err(SceneError::Resolution { width, height });
        }

        Ok(Self {
            position,
            left,
            right,
            bottom,
            top,
            width,
            height,
        })
    }

    /// Resolution in pixels as (width, height)
    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Center of pixel (`xi`, `yi`) on the surface; pixel (0, 0) is the top-left cell
    pub fn pixel_center(&self, xi: usize, yi: usize) -> Point2<f32> {
        let cell_w = (self.right - self.left) / self.width as f32;
        let cell_h = (self.top - self.bottom) / self.height as f32;
        Point2::new(
            self.left + (xi as f32 + 0.5) * cell_w,
            self.top - (yi as f32 + 0.5) * cell_h,
        )
    }
}

/// A vertex projected onto the view surface, with its camera-space depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedVertex {
    pub surface: Point2<f32>,
    pub depth: f32,
}

impl ProjectedVertex {
    /// Project a camera-space position onto `surface`.
    ///
    /// A point at zero depth divides by zero; the resulting non-finite
    /// coordinates are passed through unchanged.
    pub fn from_camera_space(c: &Vector3<f32>, surface: &ViewSurface) -> Self {
        let scale = surface.position.z / c.z;
        Self {
            surface: Point2::new(
                scale * c.x + surface.position.x,
                scale * c.y + surface.position.y,
            ),
            depth: c.z,
        }
    }
}

/// Project every vertex for one frame, preserving vertex order
pub fn project_vertices(
    vertices: &[Vertex],
    camera: &Camera,
    surface: &ViewSurface,
    out: &mut Vec<ProjectedVertex>,
) {
    out.clear();
    out.extend(
        vertices
            .iter()
            .map(|v| ProjectedVertex::from_camera_space(&camera.to_camera_space(v), surface)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Axis;
    use approx::assert_relative_eq;

    fn unit_surface(width: usize, height: usize) -> ViewSurface {
        ViewSurface::new(Vector3::new(0.0, 0.0, 1.0), [-1.0, 1.0, -1.0, 1.0], width, height).unwrap()
    }

    #[test]
    fn test_rejects_empty_resolution() {
        let result = ViewSurface::new(Vector3::z(), [-1.0, 1.0, -1.0, 1.0], 0, 4);
        assert!(matches!(result, Err(SceneError::Resolution { width: 0, height: 4 })));
    }

    #[test]
    fn test_pixel_centers() {
        let surface = unit_surface(4, 4);
        assert_relative_eq!(surface.pixel_center(0, 0), Point2::new(-0.75, 0.75));
        assert_relative_eq!(surface.pixel_center(3, 3), Point2::new(0.75, -0.75));

        // Asymmetric limits are partitioned over their full extent
        let surface =
            ViewSurface::new(Vector3::z(), [0.0, 2.0, 1.0, 2.0], 2, 1).unwrap();
        assert_relative_eq!(surface.pixel_center(1, 0), Point2::new(1.5, 1.5));
    }

    #[test]
    fn test_perspective_divide() {
        let surface = unit_surface(4, 4);
        let mut projected = Vec::new();
        let vertices = [Vertex::new(0.0, 0.0, 5.0), Vertex::new(5.0, -2.5, 5.0)];
        project_vertices(&vertices, &Camera::new(), &surface, &mut projected);

        assert_eq!(projected.len(), 2);
        assert_relative_eq!(projected[0].surface, Point2::new(0.0, 0.0));
        assert_relative_eq!(projected[1].surface, Point2::new(1.0, -0.5));
        assert_relative_eq!(projected[1].depth, 5.0);
    }

    #[test]
    fn test_projection_follows_camera() {
        let surface = unit_surface(4, 4);
        let mut camera = Camera::new();
        camera.translate_along_axis(Axis::X, 5.0);

        let mut projected = Vec::new();
        project_vertices(&[Vertex::new(0.0, 0.0, 5.0)], &camera, &surface, &mut projected);
        assert_relative_eq!(projected[0].surface, Point2::new(-1.0, 0.0));
    }

    #[test]
    fn test_zero_depth_is_not_finite() {
        let p = ProjectedVertex::from_camera_space(&Vector3::new(1.0, 1.0, 0.0), &unit_surface(1, 1));
        assert!(!p.surface.x.is_finite());
        assert_eq!(p.depth, 0.0);
    }
}
