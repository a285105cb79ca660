//! In-memory 84×48 monochrome LCD.

use crate::hal::{Fill, Surface};

pub const WIDTH: usize = 84;
pub const HEIGHT: usize = 48;

/// A double-buffered bitmap: drawing hits the back buffer, `refresh`
/// copies it to the visible frame.
#[derive(Debug, Clone)]
pub struct Bitmap {
    back: [[bool; WIDTH]; HEIGHT],
    front: [[bool; WIDTH]; HEIGHT],
    contrast: f32,
    brightness: f32,
    refreshes: u64,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitmap {
    pub fn new() -> Self {
        Self {
            back: [[false; WIDTH]; HEIGHT],
            front: [[false; WIDTH]; HEIGHT],
            contrast: 0.5,
            brightness: 0.5,
            refreshes: 0,
        }
    }

    /// Visible pixel, `false` outside the panel.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.front.get(y).and_then(|row| row.get(x)).copied().unwrap_or(false)
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.front
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// How many frames have been pushed to the visible buffer.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Number of lit pixels in the visible frame.
    pub fn lit(&self) -> usize {
        self.front.iter().flatten().filter(|&&p| p).count()
    }

    fn put(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(px) = self.back.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            *px = on;
        }
    }

    fn flip(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(px) = self.back.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
            *px = !*px;
        }
    }
}

impl Surface for Bitmap {
    fn clear(&mut self) {
        self.back = [[false; WIDTH]; HEIGHT];
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Fill) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x1, y1) = (x + w - 1, y + h - 1);
        match fill {
            Fill::Transparent => {
                for px in x..=x1 {
                    self.put(px, y, true);
                    self.put(px, y1, true);
                }
                for py in y..=y1 {
                    self.put(x, py, true);
                    self.put(x1, py, true);
                }
            }
            Fill::Black | Fill::White => {
                let on = fill == Fill::Black;
                for py in y..=y1 {
                    for px in x..=x1 {
                        self.put(px, py, on);
                    }
                }
            }
            Fill::Invert => {
                for py in y..=y1 {
                    for px in x..=x1 {
                        self.flip(px, py);
                    }
                }
            }
        }
    }

    fn refresh(&mut self) {
        self.front = self.back;
        self.refreshes += 1;
    }

    fn set_contrast(&mut self, contrast: f32) {
        self.contrast = contrast.clamp(0.0, 1.0);
    }

    fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.clamp(0.0, 1.0);
    }
}
