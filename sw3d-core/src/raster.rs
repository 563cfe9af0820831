/// Brute-force nearest-face rasterizer
use nalgebra::Point2;

use crate::camera::Camera;
use crate::geometry::{Color, Scene};
use crate::projection::{project_vertices, ProjectedVertex, ViewSurface};

/// Value of a pixel that no face covers
pub const BACKGROUND: u32 = 0;

/// Row-major grid of packed `0x00RRGGBB` pixels, index 0 at the top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    frame: u64,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; width * height],
            frame: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Sequence number of the frame held here; 0 until something is rendered
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BACKGROUND);
    }
}

/// Barycentric weights `[s, t, u]` of `p` against triangle `a`, `b`, `c`.
///
/// Weights always sum to 1. A zero-area triangle divides by zero and yields
/// non-finite weights.
pub fn barycentric(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> [f32; 3] {
    let denom = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    let s = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / denom;
    let t = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / denom;
    [s, t, 1.0 - s - t]
}

/// True when every weight lies in the closed interval [0, 1]
pub fn is_inside(weights: &[f32; 3]) -> bool {
    weights.iter().all(|w| (0.0..=1.0).contains(w))
}

/// Renders a scene into framebuffers, reusing its projection scratch space
pub struct Rasterizer {
    projected: Vec<ProjectedVertex>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            projected: Vec::new(),
        }
    }

    /// Clear `target` and draw one complete frame of `scene` as seen by `camera`.
    ///
    /// `target` must have the same dimensions as the surface resolution.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        surface: &ViewSurface,
        target: &mut Framebuffer,
    ) {
        debug_assert_eq!(
            (target.width, target.height),
            surface.resolution(),
            "framebuffer does not match surface resolution"
        );
        target.clear();
        project_vertices(scene.vertices(), camera, surface, &mut self.projected);

        let (width, height) = surface.resolution();
        for yi in 0..height {
            for xi in 0..width {
                let p = surface.pixel_center(xi, yi);
                if let Some(color) = self.nearest_face_color(scene, p) {
                    target.pixels[yi * width + xi] = color.pack();
                }
            }
        }
    }

    fn nearest_face_color(&self, scene: &Scene, p: Point2<f32>) -> Option<Color> {
        let mut nearest: Option<(f32, Color)> = None;

        for face in scene.faces() {
            let [a, b, c] = face.indices.map(|i| self.projected[i]);
            let weights = barycentric(p, a.surface, b.surface, c.surface);
            if !is_inside(&weights) {
                continue;
            }

            // Perspective-correct depth from interpolated inverse depth
            let z = 1.0 / (weights[0] / a.depth + weights[1] / b.depth + weights[2] / c.depth);
            if z < nearest.map_or(f32::INFINITY, |(best, _)| best) {
                nearest = Some((z, face.color));
            }
        }

        nearest.map(|(_, color)| color)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}
