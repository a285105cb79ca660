//! State shared between the main loop and the two periodic processes.
//!
//! Every field is an independent atomic scalar, so a preempted writer can
//! never leave a half-written value behind. Ownership of writes:
//! - main loop: volumes, pattern, step period
//! - note scheduler: current step, current note, sample period
//! - sample synthesizer: nothing (it only reads)

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::time::Duration;

use stepsynth_types::{Pattern, Pitch, Step, C_MAJOR_PERIODS_US, GRID_SIZE};

/// Encoding of "no note" inside an `AtomicU8` slot.
const NO_NOTE: u8 = u8::MAX;

/// Step period before the speed pot has been read: `20ms + 0.0 * 1000ms`.
pub const DEFAULT_STEP_PERIOD_US: u32 = 20_000;

/// An `f32` stored as its bit pattern.
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(v: f32) -> Self {
        Self(AtomicU32::new(v.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, v: f32) {
        self.0.store(v.to_bits(), Ordering::Relaxed)
    }
}

fn encode(note: Option<Pitch>) -> u8 {
    note.map(Pitch::row).unwrap_or(NO_NOTE)
}

fn decode(raw: u8) -> Option<Pitch> {
    Pitch::new(raw)
}

#[derive(Debug)]
pub struct SharedState {
    sine_volume: AtomicF32,
    square_volume: AtomicF32,
    notes: [AtomicU8; GRID_SIZE],
    current_step: AtomicU8,
    current_note: AtomicU8,
    sample_period_us: AtomicU32,
    step_period_us: AtomicU32,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            sine_volume: AtomicF32::new(0.0),
            square_volume: AtomicF32::new(0.0),
            notes: std::array::from_fn(|_| AtomicU8::new(NO_NOTE)),
            current_step: AtomicU8::new(0),
            current_note: AtomicU8::new(NO_NOTE),
            sample_period_us: AtomicU32::new(C_MAJOR_PERIODS_US[0]),
            step_period_us: AtomicU32::new(DEFAULT_STEP_PERIOD_US),
        }
    }

    // --- volumes (main loop writes, synth reads) ---

    pub fn sine_volume(&self) -> f32 {
        self.sine_volume.load()
    }

    pub fn set_sine_volume(&self, v: f32) {
        self.sine_volume.store(v.clamp(0.0, 1.0));
    }

    pub fn square_volume(&self) -> f32 {
        self.square_volume.load()
    }

    pub fn set_square_volume(&self, v: f32) {
        self.square_volume.store(v.clamp(0.0, 1.0));
    }

    // --- pattern (main loop writes, scheduler reads) ---

    pub fn note(&self, step: Step) -> Option<Pitch> {
        decode(self.notes[step.index()].load(Ordering::Acquire))
    }

    pub fn set_note(&self, step: Step, note: Option<Pitch>) {
        self.notes[step.index()].store(encode(note), Ordering::Release);
    }

    pub fn load_pattern(&self, pattern: &Pattern) {
        for (step, note) in pattern.iter() {
            self.set_note(step, note);
        }
    }

    pub fn pattern(&self) -> Pattern {
        let mut p = Pattern::new();
        for i in 0..GRID_SIZE as u8 {
            if let Some(step) = Step::new(i) {
                p.set(step, self.note(step));
            }
        }
        p
    }

    // --- playhead (scheduler writes, main loop reads) ---

    pub fn current_step(&self) -> Step {
        Step::new(self.current_step.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn current_note(&self) -> Option<Pitch> {
        decode(self.current_note.load(Ordering::Acquire))
    }

    /// True while the current step holds a note.
    pub fn is_sounding(&self) -> bool {
        self.current_note.load(Ordering::Relaxed) != NO_NOTE
    }

    pub(crate) fn publish_step(&self, step: Step, note: Option<Pitch>) {
        self.current_note.store(encode(note), Ordering::Release);
        self.current_step.store(step.index() as u8, Ordering::Release);
    }

    // --- clock periods ---

    pub fn sample_period_us(&self) -> u32 {
        self.sample_period_us.load(Ordering::Relaxed)
    }

    pub(crate) fn set_sample_period_us(&self, us: u32) {
        self.sample_period_us.store(us.max(1), Ordering::Relaxed);
    }

    pub fn step_period(&self) -> Duration {
        Duration::from_micros(self.step_period_us.load(Ordering::Relaxed) as u64)
    }

    /// Reprogram the step clock. The tick already scheduled keeps its
    /// deadline; the new period applies from the one after.
    pub fn set_step_period(&self, period: Duration) {
        let us = period.as_micros().clamp(1, u32::MAX as u128) as u32;
        self.step_period_us.store(us, Ordering::Relaxed);
    }
}
