//! Hardware seams. Each trait is one synchronous read or draw call.

use stepsynth_types::Direction;

/// A potentiometer read as a normalized value.
pub trait AnalogIn {
    fn read(&mut self) -> f32;
}

/// A digital input level.
pub trait DigitalIn {
    fn read(&mut self) -> bool;
}

/// The joystick, already decoded into a direction.
pub trait DirectionSource {
    fn direction(&mut self) -> Direction;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Outline only, interior untouched.
    Transparent,
    Black,
    White,
    /// Flip every pixel in the rectangle.
    Invert,
}

/// A monochrome drawing surface. Drawing goes to a back buffer; `refresh`
/// makes it visible.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Fill);
    fn refresh(&mut self);
    fn set_contrast(&mut self, contrast: f32);
    fn set_brightness(&mut self, brightness: f32);
}
