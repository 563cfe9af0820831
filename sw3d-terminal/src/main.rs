/// SW3D Terminal Viewer
///
/// Renders a scene file (JSON) or an STL mesh in the terminal.
/// Without an argument the built-in test cube is shown.
/// Controls:
///   - A/D, W/S, X/C: Move along the camera's x, y, z axes
///   - Arrow Keys: Turn
///   - Q/ESC: Quit

use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

use crossterm::terminal;
use log::info;
use sw3d_core::{stl, Color, FrameScheduler, RenderError, SceneConfig, SceneError};
use sw3d_terminal::TerminalApp;

/// Flat color given to imported STL meshes
const STL_COLOR: Color = Color::new(200, 200, 210);

fn is_stl(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("stl"))
}

/// Build the scene and start rendering; every setup failure comes back as one `RenderError`
fn load_scheduler(path: Option<&str>, stl_resolution: (usize, usize)) -> Result<FrameScheduler, RenderError> {
    match path {
        Some(path) if is_stl(path) => {
            let scene = stl::parse_stl(&fs::read(path).map_err(SceneError::Io)?, STL_COLOR)?;
            info!("imported {} triangles from {}", scene.faces().len(), path);
            let (camera, surface) = stl::framing_for(&scene, stl_resolution)?;
            FrameScheduler::start(scene, camera, surface)
        }
        Some(path) => FrameScheduler::from_config(SceneConfig::load(path)?),
        None => FrameScheduler::from_config(SceneConfig::test_cube()?),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = env::args().nth(1);
    match &path {
        Some(path) => println!("SW3D Terminal Viewer - Loading {}...", path),
        None => println!("SW3D Terminal Viewer - No scene given, using the test cube..."),
    }

    // One pixel per column, two per row, leaving the status line free
    let (columns, rows) = terminal::size()?;
    let stl_resolution = (columns.max(1) as usize, rows.saturating_sub(1).max(1) as usize * 2);

    let scheduler = load_scheduler(path.as_deref(), stl_resolution)?;

    let app = TerminalApp::new(scheduler)?;
    app.run()?;

    println!("Thank you for using SW3D Terminal Viewer!");
    Ok(())
}
