//! LCD layout. Pure output: everything drawn comes from [`DisplayState`].
//!
//! ```text
//!  x=0         x=5 .. 77 (8 columns, 9px apart)        x=82
//!  |sine bar|  [grid 8×8 cells, 10×5 px, 4px apart]    |square bar|
//!              [tempo bar at y=44, shorter when faster]
//! ```

use stepsynth_types::{Cursor, Pattern, Step, GRID_SIZE};

use crate::hal::{Fill, Surface};

const BAR_MAX: i32 = 38;
const BAR_BOTTOM: i32 = 8 + BAR_MAX;
const BAR_WIDTH: i32 = 2;
const SQUARE_BAR_X: i32 = 82;

const TEMPO_X: i32 = 4;
const TEMPO_Y: i32 = 44;
const TEMPO_MAX: i32 = 76;
const TEMPO_HEIGHT: i32 = 5;

const GRID_X: i32 = 5;
const GRID_Y: i32 = 4;
const CELL_DX: i32 = 9;
const CELL_DY: i32 = 4;
const CELL_W: i32 = 10;
const CELL_H: i32 = 5;

const PLAYHEAD_Y: i32 = 5;
const PLAYHEAD_H: i32 = 32;

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayState {
    pub sine_volume: f32,
    pub square_volume: f32,
    pub playback_speed: f32,
    pub cursor: Cursor,
    pub pattern: Pattern,
    pub playhead: Step,
}

#[derive(Debug, Clone, Copy)]
pub struct DisplayRenderer {
    contrast: f32,
    brightness: f32,
}

impl Default for DisplayRenderer {
    fn default() -> Self {
        Self::new(0.4, 0.3)
    }
}

impl DisplayRenderer {
    pub fn new(contrast: f32, brightness: f32) -> Self {
        Self { contrast, brightness }
    }

    /// Panel setup: contrast, backlight, blank frame.
    pub fn init<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_contrast(self.contrast);
        surface.set_brightness(self.brightness);
        surface.clear();
        surface.refresh();
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, state: &DisplayState) {
        surface.clear();

        let sine_bar = bar_height(state.sine_volume);
        let square_bar = bar_height(state.square_volume);
        surface.fill_rect(0, BAR_BOTTOM - sine_bar, BAR_WIDTH, sine_bar, Fill::Black);
        surface.fill_rect(SQUARE_BAR_X, BAR_BOTTOM - square_bar, BAR_WIDTH, square_bar, Fill::Black);
        surface.fill_rect(TEMPO_X, TEMPO_Y, tempo_bar_len(state.playback_speed), TEMPO_HEIGHT, Fill::Black);

        let (cx, cy) = cell_origin(state.cursor.column() as i32, state.cursor.row() as i32);
        surface.fill_rect(cx + 1, cy + 1, CELL_W - 2, CELL_H - 2, Fill::Transparent);

        for row in 0..GRID_SIZE as i32 {
            for col in 0..GRID_SIZE as i32 {
                let (x, y) = cell_origin(col, row);
                surface.fill_rect(x, y, CELL_W, CELL_H, Fill::Transparent);
            }
        }

        for (step, note) in state.pattern.iter() {
            if let Some(pitch) = note {
                let (x, y) = cell_origin(step.index() as i32, pitch.row() as i32);
                surface.fill_rect(x, y, CELL_W, CELL_H, Fill::Black);
            }
        }

        let (px, _) = cell_origin(state.playhead.index() as i32, 0);
        surface.fill_rect(px, PLAYHEAD_Y, CELL_W, PLAYHEAD_H, Fill::Invert);

        surface.refresh();
    }
}

fn cell_origin(col: i32, row: i32) -> (i32, i32) {
    (GRID_X + CELL_DX * col, GRID_Y + CELL_DY * row)
}

fn bar_height(volume: f32) -> i32 {
    (volume.clamp(0.0, 1.0) * BAR_MAX as f32).round() as i32
}

fn tempo_bar_len(speed: f32) -> i32 {
    TEMPO_MAX - (speed.clamp(0.0, 1.0) * TEMPO_MAX as f32).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use stepsynth_types::Pitch;

    fn state() -> DisplayState {
        DisplayState::default()
    }

    #[test]
    fn test_init_sets_panel() {
        let mut b = Bitmap::new();
        DisplayRenderer::new(0.4, 0.3).init(&mut b);
        assert!((b.contrast() - 0.4).abs() < 1e-6);
        assert!((b.brightness() - 0.3).abs() < 1e-6);
        assert_eq!(b.refresh_count(), 1);
        assert_eq!(b.lit(), 0);
    }

    #[test]
    fn test_volume_bars() {
        let mut b = Bitmap::new();
        let mut s = state();
        s.sine_volume = 1.0;
        s.square_volume = 0.5;
        DisplayRenderer::default().render(&mut b, &s);
        // Full sine bar spans y=8..45.
        assert!(b.pixel(0, 8));
        assert!(b.pixel(1, 45));
        assert!(!b.pixel(0, 7));
        // Half square bar: 19px, y=27..45.
        assert!(b.pixel(83, 27));
        assert!(!b.pixel(83, 26));
    }

    #[test]
    fn test_tempo_bar_shrinks_with_speed() {
        let mut slow = Bitmap::new();
        let mut fast = Bitmap::new();
        let mut s = state();
        DisplayRenderer::default().render(&mut slow, &s);
        s.playback_speed = 1.0;
        DisplayRenderer::default().render(&mut fast, &s);
        assert!(slow.pixel(79, 46));
        assert!(!fast.pixel(10, 46));
    }

    #[test]
    fn test_note_cell_filled() {
        let mut b = Bitmap::new();
        let mut s = state();
        s.playhead = Step::new(7).unwrap();
        s.pattern.set(Step::new(3).unwrap(), Pitch::new(2));
        DisplayRenderer::default().render(&mut b, &s);
        // Interior of cell (3, 2): origin (32, 12).
        assert!(b.pixel(34, 14));
        // Interior of an empty cell stays dark.
        assert!(!b.pixel(34 - 9, 14));
    }

    #[test]
    fn test_playhead_inverts_column() {
        let mut b = Bitmap::new();
        let mut s = state();
        s.playhead = Step::new(2).unwrap();
        s.cursor = Cursor::new(6, 6).unwrap();
        DisplayRenderer::default().render(&mut b, &s);
        // Interior of an empty cell in the playhead column is lit.
        assert!(b.pixel(5 + 18 + 3, 4 + 4 * 4 + 2));
        // Same row, other column: dark.
        assert!(!b.pixel(5 + 9 + 3, 4 + 4 * 4 + 2));
    }

    #[test]
    fn test_cursor_outline() {
        let mut b = Bitmap::new();
        let mut s = state();
        s.cursor = Cursor::new(4, 5).unwrap();
        s.playhead = Step::new(0).unwrap();
        DisplayRenderer::default().render(&mut b, &s);
        let (x, y) = cell_origin(4, 5);
        assert!(b.pixel((x + 1) as usize, (y + 1) as usize));
        assert!(b.pixel((x + 8) as usize, (y + 3) as usize));
    }

    #[test]
    fn test_render_refreshes_once() {
        let mut b = Bitmap::new();
        DisplayRenderer::default().render(&mut b, &state());
        assert_eq!(b.refresh_count(), 1);
    }
}
