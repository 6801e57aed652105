/// Per-frame model state and the input events that mutate it
use nalgebra::Matrix4;

use crate::transform::Transform;

/// Rotation about the three axes, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts, wrapping each angle into `[0, 360)`
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x = wrap_degrees(self.x + dx);
        self.y = wrap_degrees(self.y + dy);
        self.z = wrap_degrees(self.z + dz);
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        Transform::rotation(self.x, self.y, self.z)
    }
}

/// `rem_euclid` rounds tiny negative angles up to exactly 360
fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::zero()
    }
}

/// Something the presentation layer wants done to the model between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Rotate { dx: f64, dy: f64, dz: f64 },
    SpeedUp,
    SlowDown,
    TogglePause,
    Reset,
    Quit,
}

/// The mutable state read once per frame by the pipeline.
///
/// Owned by the frame driver; only the driver writes to it, and only
/// between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelState {
    pub rotation: Rotation,
    /// Degrees added to the y angle by each [`ModelState::advance`]
    pub step: f64,
    pub paused: bool,
    pub running: bool,
    initial: (Rotation, f64),
}

impl ModelState {
    pub const STEP_DELTA: f64 = 1.0;

    pub fn new(rotation: Rotation, step: f64) -> Self {
        Self {
            rotation,
            step,
            paused: false,
            running: true,
            initial: (rotation, step),
        }
    }

    /// Automatic spin about the y axis
    pub fn advance(&mut self) {
        if !self.paused {
            self.rotation.rotate(0.0, self.step, 0.0);
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Rotate { dx, dy, dz } => self.rotation.rotate(dx, dy, dz),
            InputEvent::SpeedUp => self.step += Self::STEP_DELTA,
            InputEvent::SlowDown => self.step -= Self::STEP_DELTA,
            InputEvent::TogglePause => self.paused = !self.paused,
            InputEvent::Reset => {
                let (rotation, step) = self.initial;
                self.rotation = rotation;
                self.step = step;
                self.paused = false;
            }
            InputEvent::Quit => self.running = false,
        }
    }

    /// Apply queued events in arrival order
    pub fn apply_all<I: IntoIterator<Item = InputEvent>>(&mut self, events: I) {
        for event in events {
            self.apply(event);
        }
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new(Rotation::new(45.0, 120.0, 0.0), 2.0)
    }
}
