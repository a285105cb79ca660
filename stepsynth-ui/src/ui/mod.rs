pub mod keys;
pub mod lcd;
mod ratatui_impl;

pub use keys::apply;
pub use ratatui_impl::{RatatuiBackend, StatusView};
