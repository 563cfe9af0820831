//! Scene description loading
//!
//! A scene file is a JSON object of flat numeric arrays:
//!
//! - `vertices`: vertex n at `[3n, 3n + 1, 3n + 2]`
//! - `faces`: each 3-tuple of vertex indices is one triangle
//! - `color`: face n has color `(R, G, B)` at `[3n, 3n + 1, 3n + 2]`
//! - `cam_pos`, `cam_angle`: initial camera position and rotation (radians)
//! - `surf_pos`, `surf_lims`, `surf_res`: view surface offset,
//!   `[left, right, bottom, top]` limits and `[width, height]` resolution

use std::path::Path;

use log::info;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::SceneError;
use crate::geometry::{Color, Face, Scene, Vertex};
use crate::projection::ViewSurface;

/// Built-in unit cube with a differently colored pair of triangles per side
pub const TEST_CUBE: &str = r#"{
    "vertices": [0.0,0.0,0.0, 1.0,0.0,0.0, 1.0,1.0,0.0, 0.0,1.0,0.0,
                 0.0,0.0,1.0, 1.0,0.0,1.0, 1.0,1.0,1.0, 0.0,1.0,1.0],
    "faces": [0,1,2, 0,2,3, 0,1,5, 0,5,4, 1,2,6, 1,6,5,
              2,3,7, 2,7,6, 3,0,4, 3,4,7, 4,5,6, 4,6,7],
    "color": [255,0,0, 255,0,0, 0,255,0, 0,255,0, 0,0,255, 0,0,255,
              255,255,0, 255,255,0, 255,0,255, 255,0,255, 0,255,255, 0,255,255],
    "cam_pos": [2.0, 2.0, -2.0],
    "cam_angle": [0.0, 0.0, 0.0],
    "surf_pos": [0.0, 0.0, 1.0],
    "surf_lims": [-1.0, 1.0, -1.0, 1.0],
    "surf_res": [120, 80]
}"#;

/// Raw scene description as read from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub vertices: Vec<f32>,
    pub faces: Vec<usize>,
    pub color: Vec<u8>,
    pub cam_pos: [f32; 3],
    pub cam_angle: [f32; 3],
    pub surf_pos: [f32; 3],
    pub surf_lims: [f32; 4],
    pub surf_res: [usize; 2],
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "loaded scene {}: {} vertices, {} faces",
            path.display(),
            config.vertices.len() / 3,
            config.faces.len() / 3
        );
        Ok(config)
    }

    pub fn test_cube() -> Result<Self, SceneError> {
        Self::from_json(TEST_CUBE)
    }

    /// Validate and build the scene, initial camera, and view surface
    pub fn into_parts(self) -> Result<(Scene, Camera, ViewSurface), SceneError> {
        if self.vertices.len() % 3 != 0 {
            return Err(SceneError::VertexComponents(self.vertices.len()));
        }
        if self.faces.len() % 3 != 0 {
            return Err(SceneError::FaceComponents(self.faces.len()));
        }
        let face_count = self.faces.len() / 3;
        if self.color.len() != self.faces.len() {
            return Err(SceneError::ColorCount {
                faces: face_count,
                expected: self.faces.len(),
                found: self.color.len(),
            });
        }

        let vertices = self
            .vertices
            .chunks_exact(3)
            .map(|v| Vertex::new(v[0], v[1], v[2]))
            .collect();
        let faces = self
            .faces
            .chunks_exact(3)
            .zip(self.color.chunks_exact(3))
            .map(|(f, c)| Face::new(f[0], f[1], f[2], Color::new(c[0], c[1], c[2])))
            .collect();
        let scene = Scene::new(vertices, faces)?;

        let camera = Camera::with_angles(Point3::from(self.cam_pos), Vector3::from(self.cam_angle));
        let surface = ViewSurface::new(
            Vector3::from(self.surf_pos),
            self.surf_lims,
            self.surf_res[0],
            self.surf_res[1],
        )?;

        Ok((scene, camera, surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_config() -> SceneConfig {
        SceneConfig {
            vertices: vec![-1.0, -1.0, 3.0, 1.0, -1.0, 3.0, 1.0, 1.0, 3.0],
            faces: vec![0, 1, 2],
            color: vec![10, 20, 30],
            cam_pos: [0.0, 0.0, 0.0],
            cam_angle: [0.0, 0.0, 0.0],
            surf_pos: [0.0, 0.0, 1.0],
            surf_lims: [-1.0, 1.0, -1.0, 1.0],
            surf_res: [4, 3],
        }
    }

    #[test]
    fn test_builtin_cube() {
        let (scene, camera, surface) = SceneConfig::test_cube().unwrap().into_parts().unwrap();
        assert_eq!(scene.vertices().len(), 8);
        assert_eq!(scene.faces().len(), 12);
        assert_eq!(scene.faces()[2].color, Color::new(0, 255, 0));
        assert_relative_eq!(camera.position(), Point3::new(2.0, 2.0, -2.0));
        assert_eq!(surface.resolution(), (120, 80));
    }

    #[test]
    fn test_valid_config() {
        let (scene, _, surface) = square_config().into_parts().unwrap();
        assert_eq!(scene.faces(), &[Face::new(0, 1, 2, Color::new(10, 20, 30))]);
        assert_eq!(surface.resolution(), (4, 3));
    }

    #[test]
    fn test_rejects_bad_component_counts() {
        let mut config = square_config();
        config.vertices.push(0.0);
        assert!(matches!(config.into_parts(), Err(SceneError::VertexComponents(10))));

        let mut config = square_config();
        config.faces.push(0);
        assert!(matches!(config.into_parts(), Err(SceneError::FaceComponents(4))));

        let mut config = square_config();
        config.color.truncate(2);
        assert!(matches!(config.into_parts(), Err(SceneError::ColorCount { found: 2, .. })));
    }

    #[test]
    fn test_rejects_out_of_range_face() {
        let mut config = square_config();
        config.faces = vec![0, 1, 3];
        assert!(matches!(
            config.into_parts(),
            Err(SceneError::FaceIndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_resolution() {
        let mut config = square_config();
        config.surf_res = [0, 10];
        assert!(matches!(config.into_parts(), Err(SceneError::Resolution { .. })));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(SceneConfig::from_json("{\"vertices\": [1, 2"), Err(SceneError::Parse(_))));
        // Colors outside 0-255 and negative indices fail to deserialize
        let text = TEST_CUBE.replace("255,0,0, 255,0,0,", "256,0,0, 255,0,0,");
        assert!(matches!(SceneConfig::from_json(&text), Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("sw3d-scene-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&square_config()).unwrap()).unwrap();
        let loaded = SceneConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), square_config());
    }
}
