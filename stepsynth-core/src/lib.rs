//! # stepsynth-core
//!
//! The main-loop side of the sequencer, independent of any front end:
//! input sampling, change detection with hysteresis, the pattern/cursor
//! state, the display renderer, and configuration.
//!
//! ## Module Overview
//!
//! - [`hal`]: traits for the pots, button, joystick and LCD
//! - [`sampler`]: reads every input once per pass
//! - [`detector`]: hysteresis and edge detection, producing [`Changes`]
//! - [`tempo`]: speed pot to step period
//! - [`controller`]: one main-loop pass: sample, detect, publish, redraw
//! - [`render`] / [`bitmap`]: LCD layout and an in-memory 84×48 surface
//! - [`panel`]: a virtual front panel implementing the `hal` traits
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod bitmap;
pub mod config;
pub mod controller;
pub mod detector;
pub mod hal;
pub mod panel;
pub mod render;
pub mod sampler;
pub mod tempo;

pub use bitmap::Bitmap;
pub use config::Config;
pub use controller::Controller;
pub use detector::{ChangeDetector, Changes, Thresholds};
pub use hal::{AnalogIn, DigitalIn, DirectionSource, Fill, Surface};
pub use panel::{Pot, VirtualPanel};
pub use render::{DisplayRenderer, DisplayState};
pub use sampler::InputSampler;
pub use tempo::TempoMap;
