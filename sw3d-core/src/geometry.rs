/// Scene primitives: vertices, flat-colored faces, and the validated scene
use nalgebra::Point3;

use crate::error::SceneError;

/// A world-space vertex position
pub type Vertex = Point3<f32>;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0x00RRGGBB`
    pub const fn pack(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn unpack(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }
}

/// A triangle referencing three vertices by index, drawn in one flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub indices: [usize; 3],
    pub color: Color,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize, color: Color) -> Self {
        Self {
            indices: [a, b, c],
            color,
        }
    }
}

/// An immutable triangle mesh. Every face index is guaranteed to be in range.
#[derive(Debug, Clone)]
pub struct Scene {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Scene {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self, SceneError> {
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face.indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(SceneError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Axis-aligned bounding box as (min, max), or `None` for an empty scene
    pub fn bounds(&self) -> Option<(Vertex, Vertex)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        let color = Color::new(0x12, 0x34, 0x56);
        assert_eq!(color.pack(), 0x0012_3456);
        assert_eq!(Color::unpack(color.pack()), color);
        assert_eq!(Color::BLACK.pack(), 0);
    }

    #[test]
    fn test_scene_rejects_out_of_range_index() {
        let vertices = vec![Vertex::origin(), Vertex::new(1.0, 0.0, 0.0), Vertex::new(0.0, 1.0, 0.0)];
        let faces = vec![Face::new(0, 1, 2, Color::WHITE), Face::new(0, 3, 2, Color::WHITE)];

        match Scene::new(vertices, faces) {
            Err(SceneError::FaceIndexOutOfRange { face, index, vertex_count }) => {
                assert_eq!((face, index, vertex_count), (1, 3, 3));
            }
            other => panic!("expected out-of-range error, got {:?}", other),
        }
    }

    #[test]
    fn test_scene_bounds() {
        let vertices = vec![
            Vertex::new(-1.0, 2.0, 0.5),
            Vertex::new(3.0, -4.0, 1.0),
            Vertex::new(0.0, 0.0, -2.0),
        ];
        let scene = Scene::new(vertices, vec![Face::new(0, 1, 2, Color::WHITE)]).unwrap();
        let (min, max) = scene.bounds().unwrap();
        assert_eq!(min, Vertex::new(-1.0, -4.0, -2.0));
        assert_eq!(max, Vertex::new(3.0, 2.0, 1.0));

        let empty = Scene::new(Vec::new(), Vec::new()).unwrap();
        assert!(empty.bounds().is_none());
    }
}
