/// Terminal front end: render loop, input queue and polygon drawing
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use polyview_core::{InputEvent, Mesh, ModelState, Pipeline, RenderConfig};
use std::collections::VecDeque;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod renderer;

pub use renderer::PolygonRenderer;

/// Degrees turned per rotation key press
pub const ROTATE_STEP: f64 = 5.0;

/// Startup settings for [`TerminalApp`]
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base pipeline settings; the viewport is replaced by the terminal size
    pub render: RenderConfig,
    pub state: ModelState,
    pub frame_time: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            state: ModelState::default(),
            frame_time: Duration::from_millis(15),
        }
    }
}

/// Translate a key press into a model input event
pub fn key_event(code: KeyCode) -> Option<InputEvent> {
    let rotate = |dx, dy, dz| Some(InputEvent::Rotate { dx, dy, dz });
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char('w') | KeyCode::Up => rotate(ROTATE_STEP, 0.0, 0.0),
        KeyCode::Char('s') | KeyCode::Down => rotate(-ROTATE_STEP, 0.0, 0.0),
        KeyCode::Char('a') | KeyCode::Left => rotate(0.0, -ROTATE_STEP, 0.0),
        KeyCode::Char('d') | KeyCode::Right => rotate(0.0, ROTATE_STEP, 0.0),
        KeyCode::Char('e') => rotate(0.0, 0.0, ROTATE_STEP),
        KeyCode::Char('r') => rotate(0.0, 0.0, -ROTATE_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(InputEvent::SpeedUp),
        KeyCode::Char('-') => Some(InputEvent::SlowDown),
        KeyCode::Char(' ') => Some(InputEvent::TogglePause),
        KeyCode::Char('0') => Some(InputEvent::Reset),
        _ => None,
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    pipeline: Pipeline,
    state: ModelState,
    renderer: PolygonRenderer,
    input: VecDeque<InputEvent>,
    frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    visible: usize,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let renderer = PolygonRenderer::new(width as usize, height as usize);
        let render = RenderConfig {
            viewport: renderer.viewport(),
            ..config.render
        };

        tracing::info!(
            columns = width,
            rows = height,
            faces = mesh.face_count(),
            "starting terminal renderer"
        );

        Ok(Self {
            mesh,
            pipeline: Pipeline::new(render),
            state: config.state,
            renderer,
            input: VecDeque::new(),
            frame_time: config.frame_time,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            visible: 0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.state.running {
            let frame_start = Instant::now();

            self.poll_input()?;
            self.update();
            if !self.state.running {
                break;
            }
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        tracing::info!("renderer stopped");
        Ok(())
    }

    /// Queue every pending key press without blocking
    fn poll_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                if let Some(input) = key_event(code) {
                    tracing::debug!(?input, "queued input");
                    self.input.push_back(input);
                }
            }
        }
        Ok(())
    }

    /// Apply queued input, then the automatic spin
    fn update(&mut self) {
        self.state.apply_all(self.input.drain(..));
        self.state.advance();
    }

    fn render(&mut self) -> io::Result<()> {
        let polygons = self.pipeline.frame(&self.mesh, &self.state);
        self.visible = polygons.len();

        self.renderer.clear();
        self.renderer.render(&polygons);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let rotation = self.state.rotation;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Polyview | FPS: {:.1} | rot {:.0}/{:.0}/{:.0} step {:.0}{} | faces {}/{} | WASD/Arrows=Rotate E/R=Roll +/-=Speed Space=Pause 0=Reset Q=Quit",
                self.fps,
                rotation.x,
                rotation.y,
                rotation.z,
                self.state.step,
                if self.state.paused { " (paused)" } else { "" },
                self.visible,
                self.mesh.face_count(),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_event(KeyCode::Esc), Some(InputEvent::Quit));
        assert_eq!(
            key_event(KeyCode::Left),
            Some(InputEvent::Rotate { dx: 0.0, dy: -ROTATE_STEP, dz: 0.0 })
        );
        assert_eq!(key_event(KeyCode::Char(' ')), Some(InputEvent::TogglePause));
        assert_eq!(key_event(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_queued_keys_drive_state() {
        let mut state = ModelState::default();
        let queue: VecDeque<_> = [KeyCode::Up, KeyCode::Char('+'), KeyCode::Char('q')]
            .into_iter()
            .filter_map(key_event)
            .collect();
        state.apply_all(queue);
        assert_eq!(state.rotation.x, 45.0 + ROTATE_STEP);
        assert_eq!(state.step, 3.0);
        assert!(!state.running);
    }
}
