/// Background render loop with a double-buffered output
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::camera::{Camera, SharedCamera};
use crate::config::SceneConfig;
use crate::error::RenderError;
use crate::geometry::Scene;
use crate::linalg::Axis;
use crate::projection::ViewSurface;
use crate::raster::{Framebuffer, Rasterizer};

/// How long `Drop` waits for the render loop to finish its current frame
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the render thread and the framebuffer it publishes.
///
/// The thread renders each frame into a private scratch buffer and then
/// exchanges it with the shared front buffer. The lock is held only for the
/// exchange, so readers never see a partially drawn frame.
pub struct FrameScheduler {
    front: Arc<Mutex<Framebuffer>>,
    camera: SharedCamera,
    running: Arc<AtomicBool>,
    finished: Receiver<u64>,
    worker: Option<JoinHandle<()>>,
    resolution: (usize, usize),
}

/// Exclusive read access to the front buffer; released on drop
pub struct FrontBuffer<'a> {
    guard: MutexGuard<'a, Framebuffer>,
}

impl Deref for FrontBuffer<'_> {
    type Target = Framebuffer;

    fn deref(&self) -> &Framebuffer {
        &self.guard
    }
}

struct RenderLoop {
    scene: Scene,
    surface: ViewSurface,
    camera: SharedCamera,
    front: Arc<Mutex<Framebuffer>>,
    running: Arc<AtomicBool>,
    finished: Sender<u64>,
}

impl RenderLoop {
    fn run(self) {
        info!("render loop started");
        let (width, height) = self.surface.resolution();
        let mut scratch = Framebuffer::new(width, height);
        let mut rasterizer = Rasterizer::new();
        let mut frame = 0u64;

        while self.running.load(Ordering::Acquire) {
            let camera: Camera = self.camera.snapshot();
            rasterizer.render(&self.scene, &camera, &self.surface, &mut scratch);
            frame += 1;
            scratch.set_frame(frame);

            match self.front.lock() {
                Ok(mut front) => std::mem::swap(&mut *front, &mut scratch),
                Err(_) => {
                    error!("front buffer lock poisoned, stopping render loop");
                    self.running.store(false, Ordering::Release);
                    break;
                }
            }

            if frame % 100 == 0 {
                debug!("rendered {} frames", frame);
            }
        }

        info!("render loop exiting after {} frames", frame);
        // The scheduler may already have given up waiting
        let _ = self.finished.send(frame);
    }
}

impl FrameScheduler {
    /// Spawn the render loop for `scene`, starting from `camera`
    pub fn start(scene: Scene, camera: Camera, surface: ViewSurface) -> Result<Self, RenderError> {
        let resolution = surface.resolution();
        let front = Arc::new(Mutex::new(Framebuffer::new(resolution.0, resolution.1)));
        let camera = SharedCamera::new(camera);
        let running = Arc::new(AtomicBool::new(true));
        let (finished_tx, finished) = mpsc::channel();

        info!(
            "starting renderer: {} vertices, {} faces, {}x{} pixels",
            scene.vertices().len(),
            scene.faces().len(),
            resolution.0,
            resolution.1
        );

        let render_loop = RenderLoop {
            scene,
            surface,
            camera: camera.clone(),
            front: Arc::clone(&front),
            running: Arc::clone(&running),
            finished: finished_tx,
        };

        let worker = thread::Builder::new()
            .name("sw3d-render".into())
            .spawn(move || render_loop.run())
            .map_err(RenderError::Spawn)?;

        Ok(Self {
            front,
            camera,
            running,
            finished,
            worker: Some(worker),
            resolution,
        })
    }

    /// Validate a scene description and start rendering it
    pub fn from_config(config: SceneConfig) -> Result<Self, RenderError> {
        let (scene, camera, surface) = config.into_parts()?;
        Self::start(scene, camera, surface)
    }

    /// Output resolution as (width, height)
    pub fn resolution(&self) -> (usize, usize) {
        self.resolution
    }

    /// Handle to the camera the render loop reads each frame
    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    pub fn translate_camera(&self, axis: Axis, amount: f32) {
        self.camera.translate_along_axis(axis, amount);
    }

    pub fn rotate_camera(&self, axis: Axis, amount: f32) {
        self.camera.rotate(axis, amount);
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some() && self.running.load(Ordering::Acquire)
    }

    /// Lock the most recently completed frame for reading.
    ///
    /// The render loop blocks on its next swap until the returned guard is dropped.
    pub fn front_buffer(&self) -> Result<FrontBuffer<'_>, RenderError> {
        let guard = self
            .front
            .lock()
            .map_err(|_| RenderError::Poisoned("front buffer"))?;
        Ok(FrontBuffer { guard })
    }

    /// Ask the render loop to stop after its current frame and wait up to `timeout`
    pub fn stop(&mut self, timeout: Duration) -> Result<(), RenderError> {
        self.running.store(false, Ordering::Release);
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        match self.finished.recv_timeout(timeout) {
            Ok(frames) => debug!("render loop finished after {} frames", frames),
            Err(RecvTimeoutError::Disconnected) => warn!("render loop exited without signalling"),
            Err(RecvTimeoutError::Timeout) => {
                warn!("render loop still busy after {:?}, detaching", timeout);
                return Err(RenderError::ShutdownTimeout(timeout));
            }
        }

        worker
            .join()
            .map_err(|_| RenderError::Panicked)
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        if let Err(e) = self.stop(DEFAULT_SHUTDOWN_TIMEOUT) {
            error!("failed to stop renderer: {}", e);
        }
    }
}
