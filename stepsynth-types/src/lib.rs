//! # stepsynth-types
//!
//! Shared type definitions for the stepsynth workspace.
//! Everything here is plain data: the audio crate, the core crate and the
//! terminal front panel all agree on these shapes.

pub mod cursor;
pub mod input;
pub mod pattern;
pub mod pitch;

pub use cursor::{Cursor, Direction};
pub use input::InputSnapshot;
pub use pattern::{Pattern, Step};
pub use pitch::{Pitch, C_MAJOR_PERIODS_US};

/// Width and height of the note grid (steps × pitch rows).
pub const GRID_SIZE: usize = 8;

/// Number of samples in one wavetable cycle.
pub const WAVETABLE_LEN: usize = 128;
