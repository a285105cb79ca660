//! Lookup tables for the two oscillator shapes, computed once at boot.

use std::f64::consts::TAU;

use stepsynth_types::WAVETABLE_LEN;

/// One cycle each of a sine and a square wave, normalized to `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetables {
    pub sine: [f32; WAVETABLE_LEN],
    pub square: [f32; WAVETABLE_LEN],
}

impl Wavetables {
    pub fn generate() -> Self {
        let mut sine = [0.0f32; WAVETABLE_LEN];
        let mut square = [0.0f32; WAVETABLE_LEN];
        let half = WAVETABLE_LEN / 2;

        for (k, v) in sine.iter_mut().enumerate() {
            let phase = k as f64 / WAVETABLE_LEN as f64 * TAU;
            *v = ((1.0 + phase.sin()) / 2.0) as f32;
        }
        // The midpoint belongs to the high half.
        for (k, v) in square.iter_mut().enumerate() {
            *v = if k < half { 0.0 } else { 1.0 };
        }

        log::debug!(target: "audio::wavetable", "generated {}-sample sine and square tables", WAVETABLE_LEN);
        Self { sine, square }
    }
}
