use serde::{Deserialize, Serialize};

use crate::cursor::Direction;

/// One main-loop pass worth of raw input readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Normalized pot positions, `0.0..=1.0`.
    pub sine_volume: f32,
    pub square_volume: f32,
    pub playback_speed: f32,
    /// Raw joystick button level. The line is pulled up, so `true` means
    /// released and `false` means pressed.
    pub button_level: bool,
    pub direction: Direction,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            sine_volume: 0.0,
            square_volume: 0.0,
            playback_speed: 0.0,
            button_level: true,
            direction: Direction::None,
        }
    }
}

impl InputSnapshot {
    pub fn button_pressed(&self) -> bool {
        !self.button_level
    }
}
