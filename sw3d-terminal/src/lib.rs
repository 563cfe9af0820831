/// Terminal display and keyboard control for the software renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{info, warn};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use sw3d_core::{Axis, FrameScheduler, RenderError};
use thiserror::Error;

pub mod renderer;

pub use renderer::FrameBlitter;

/// How often the front buffer is fetched and redrawn
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);
const MOVE_STEP: f32 = 0.1;
const TURN_STEP: f32 = 0.02;

/// Something a key press asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Translate(Axis, f32),
    Rotate(Axis, f32),
    Quit,
}

/// Key bindings for camera control
pub fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('a') => Command::Translate(Axis::X, -MOVE_STEP),
        KeyCode::Char('d') => Command::Translate(Axis::X, MOVE_STEP),
        KeyCode::Char('w') => Command::Translate(Axis::Y, MOVE_STEP),
        KeyCode::Char('s') => Command::Translate(Axis::Y, -MOVE_STEP),
        KeyCode::Char('x') => Command::Translate(Axis::Z, -MOVE_STEP),
        KeyCode::Char('c') => Command::Translate(Axis::Z, MOVE_STEP),
        KeyCode::Left => Command::Rotate(Axis::Y, TURN_STEP),
        KeyCode::Right => Command::Rotate(Axis::Y, -TURN_STEP),
        KeyCode::Up => Command::Rotate(Axis::X, TURN_STEP),
        KeyCode::Down => Command::Rotate(Axis::X, -TURN_STEP),
        _ => return None,
    };
    Some(command)
}

/// Errors from the terminal frontend
#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Displays frames from a running scheduler and feeds key presses to its camera
pub struct TerminalApp {
    scheduler: FrameScheduler,
    blitter: FrameBlitter,
    running: bool,
    last_frame: u64,
    last_sample: Instant,
    frames_since_sample: u64,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scheduler: FrameScheduler) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;

        Ok(Self {
            scheduler,
            blitter: FrameBlitter::new(columns as usize, rows as usize, 1),
            running: true,
            last_frame: 0,
            last_sample: Instant::now(),
            frames_since_sample: 0,
            fps: 0.0,
        })
    }

    pub fn run(mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result?;
        self.scheduler.stop(Duration::from_secs(2))?;
        info!("renderer stopped");
        Ok(())
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let mut next_refresh = Instant::now();

        while self.running {
            let wait = next_refresh.saturating_duration_since(Instant::now());
            if event::poll(wait)? {
                self.handle_event(event::read()?)?;
                continue;
            }

            self.present()?;
            next_refresh = Instant::now() + REFRESH_INTERVAL;
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                match command_for(code) {
                    Some(Command::Quit) => self.running = false,
                    Some(Command::Translate(axis, amount)) => {
                        self.scheduler.translate_camera(axis, amount)
                    }
                    Some(Command::Rotate(axis, amount)) => self.scheduler.rotate_camera(axis, amount),
                    None => {}
                }
            }
            Event::Resize(columns, rows) => {
                self.blitter.resize(columns as usize, rows as usize);
                execute!(stdout(), terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), AppError> {
        let mut stdout = stdout();

        let frame_number = {
            let front = self.scheduler.front_buffer()?;
            self.blitter.draw(&front, &mut stdout)?;
            front.frame()
        };
        self.sample_rate(frame_number);

        let (width, height) = self.scheduler.resolution();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SW3D {}x{} | frame {} | {:.1} fps | WASDXC=Move Arrows=Turn Q=Quit",
                width, height, frame_number, self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    fn sample_rate(&mut self, frame_number: u64) {
        if frame_number < self.last_frame {
            warn!("frame counter went backwards: {} -> {}", self.last_frame, frame_number);
        }
        self.frames_since_sample += frame_number.saturating_sub(self.last_frame);
        self.last_frame = frame_number;

        let elapsed = self.last_sample.elapsed();
        if elapsed.as_secs() >= 1 {
            self.fps = self.frames_since_sample as f32 / elapsed.as_secs_f32();
            self.frames_since_sample = 0;
            self.last_sample = Instant::now();
        }
    }
}
