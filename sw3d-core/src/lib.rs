/// SW3D Core Library - Software triangle rasterizer
///
/// Projects a flat-colored triangle mesh through a movable camera onto a
/// view surface, resolves the nearest face per pixel, and publishes frames
/// from a background render loop through a double buffer.

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod linalg;
pub mod projection;
pub mod raster;
pub mod scheduler;
pub mod stl;

// Re-export commonly used types
pub use camera::{Camera, SharedCamera};
pub use config::SceneConfig;
pub use error::{RenderError, SceneError};
pub use geometry::{Color, Face, Scene, Vertex};
pub use linalg::Axis;
pub use projection::{ProjectedVertex, ViewSurface};
pub use raster::{Framebuffer, Rasterizer, BACKGROUND};
pub use scheduler::{FrameScheduler, FrontBuffer};
