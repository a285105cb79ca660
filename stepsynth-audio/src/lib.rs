//! # stepsynth-audio
//!
//! The timing-critical half of the sequencer: the wavetables, the state
//! shared between the periodic processes and the main loop, the high-rate
//! sample synthesizer, the step-advancing note scheduler, and the clocks
//! that drive them (a device-sample clock and a thread ticker).

pub mod clock;
pub mod devices;
pub mod handle;
pub mod output;
pub mod render;
pub mod scheduler;
pub mod shared;
pub mod synth;
pub mod telemetry;
pub mod wavetable;

pub use clock::{SampleClock, Ticker};
pub use devices::{AudioDeviceConfig, BufferSize};
pub use handle::AudioHandle;
pub use render::OfflineRenderer;
pub use scheduler::{NoteScheduler, StepEvent};
pub use shared::SharedState;
pub use synth::SampleSynth;
pub use wavetable::Wavetables;
