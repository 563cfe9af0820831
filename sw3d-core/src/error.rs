/// Error types for scene loading and the render loop
use std::time::Duration;

use thiserror::Error;

/// Invalid or unreadable scene data
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("vertex data has {0} components, expected a multiple of 3")]
    VertexComponents(usize),

    #[error("face data has {0} indices, expected a multiple of 3")]
    FaceComponents(usize),

    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("{faces} faces need {expected} color components, found {found}")]
    ColorCount {
        faces: usize,
        expected: usize,
        found: usize,
    },

    #[error("surface resolution must be at least 1x1, got {width}x{height}")]
    Resolution { width: usize, height: usize },

    #[error("malformed scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed STL data: {0}")]
    Stl(String),
}

/// Failure to start, serve, or stop the frame scheduler
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("bad scene data: {0}")]
    Scene(#[from] SceneError),

    #[error("failed to start render loop: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{0} lock poisoned by a panicking thread")]
    Poisoned(&'static str),

    #[error("render thread panicked")]
    Panicked,

    #[error("render loop did not stop within {0:?}")]
    ShutdownTimeout(Duration),
}
