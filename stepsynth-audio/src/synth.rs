//! The high-rate sample process.

use std::sync::Arc;

use stepsynth_types::WAVETABLE_LEN;

use crate::shared::SharedState;
use crate::wavetable::Wavetables;

/// Mixes the sine and square tables at a private read index.
///
/// `tick` runs once per sample-clock period. It only reads shared state,
/// never allocates and cannot fail.
pub struct SampleSynth {
    tables: Arc<Wavetables>,
    index: usize,
}

impl SampleSynth {
    pub fn new(tables: Arc<Wavetables>) -> Self {
        Self { tables, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Produce one sample in `0.0..=2.0` and advance the read index.
    /// A step without a note produces silence but still advances.
    #[inline]
    pub fn tick(&mut self, shared: &SharedState) -> f32 {
        let i = self.index;
        self.index = (self.index + 1) % WAVETABLE_LEN;

        if !shared.is_sounding() {
            return 0.0;
        }
        self.tables.sine[i] * shared.sine_volume() + self.tables.square[i] * shared.square_volume()
    }
}
