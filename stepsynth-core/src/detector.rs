//! Decides which freshly sampled inputs count as changes.
//!
//! Pots go through hysteresis: a reading is only accepted once it moves
//! more than the signal's threshold away from the last accepted value.
//! The joystick direction and the button are edge-triggered.

use std::time::Duration;

use stepsynth_types::{Cursor, Direction, InputSnapshot, Pattern, Pitch, Step};

use crate::tempo::TempoMap;

/// Per-signal hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub sine_volume: f32,
    pub square_volume: f32,
    pub playback_speed: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sine_volume: 0.10,
            square_volume: 0.05,
            playback_speed: 0.05,
        }
    }
}

/// What one main-loop pass changed. Consumed once by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Changes {
    pub playhead: bool,
    pub cursor: bool,
    /// Column whose note was toggled, and its new content
    pub pattern: Option<(Step, Option<Pitch>)>,
    pub sine_volume: bool,
    pub square_volume: bool,
    /// New step period after an accepted speed change
    pub tempo: Option<Duration>,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether anything requires a redraw.
    pub fn any(&self) -> bool {
        self.playhead
            || self.cursor
            || self.pattern.is_some()
            || self.sine_volume
            || self.square_volume
            || self.tempo.is_some()
    }

    pub fn merge(&mut self, other: Changes) {
        self.playhead |= other.playhead;
        self.cursor |= other.cursor;
        if other.pattern.is_some() {
            self.pattern = other.pattern;
        }
        self.sine_volume |= other.sine_volume;
        self.square_volume |= other.square_volume;
        if other.tempo.is_some() {
            self.tempo = other.tempo;
        }
    }
}

/// Last accepted value of every input.
pub struct ChangeDetector {
    thresholds: Thresholds,
    tempo: TempoMap,
    sine_volume: f32,
    square_volume: f32,
    playback_speed: f32,
    button_level: bool,
    direction: Direction,
}

impl ChangeDetector {
    pub fn new(thresholds: Thresholds, tempo: TempoMap) -> Self {
        Self {
            thresholds,
            tempo,
            sine_volume: 0.0,
            square_volume: 0.0,
            playback_speed: 0.0,
            // Pulled up: released.
            button_level: true,
            direction: Direction::None,
        }
    }

    pub fn sine_volume(&self) -> f32 {
        self.sine_volume
    }

    pub fn square_volume(&self) -> f32 {
        self.square_volume
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn tempo_map(&self) -> &TempoMap {
        &self.tempo
    }

    /// Compare `input` with the committed state, apply joystick events to
    /// `pattern` and `cursor`, and report what changed.
    pub fn apply(&mut self, input: &InputSnapshot, pattern: &mut Pattern, cursor: &mut Cursor) -> Changes {
        let mut changes = Changes::none();

        if input.direction != self.direction {
            self.direction = input.direction;
            changes.cursor = cursor.apply(input.direction);
        }

        // Falling edge only: released -> pressed.
        let pressed_edge = self.button_level && !input.button_level;
        self.button_level = input.button_level;
        if pressed_edge {
            let step = cursor.step();
            let note = pattern.toggle(step, cursor.pitch());
            changes.pattern = Some((step, note));
        }

        if exceeds(self.sine_volume, input.sine_volume, self.thresholds.sine_volume) {
            self.sine_volume = input.sine_volume;
            changes.sine_volume = true;
        }

        if exceeds(self.square_volume, input.square_volume, self.thresholds.square_volume) {
            self.square_volume = input.square_volume;
            changes.square_volume = true;
        }

        if exceeds(self.playback_speed, input.playback_speed, self.thresholds.playback_speed) {
            self.playback_speed = input.playback_speed;
            changes.tempo = Some(self.tempo.period(self.playback_speed));
        }

        changes
    }
}

fn exceeds(committed: f32, sampled: f32, threshold: f32) -> bool {
    (sampled - committed).abs() > threshold
}
