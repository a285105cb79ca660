//! Offline rendering: both clocks simulated in virtual time, no threads.
//!
//! Produces exactly what the device callback would, frame for frame, which
//! makes it the reference for timing tests and for the `render` command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::SampleClock;
use crate::scheduler::{NoteScheduler, StepEvent};
use crate::shared::SharedState;
use crate::synth::SampleSynth;
use crate::wavetable::Wavetables;

pub struct OfflineRenderer {
    shared: Arc<SharedState>,
    synth: SampleSynth,
    scheduler: NoteScheduler,
    clock: SampleClock,
    sample_rate: u32,
    frame_us: f64,
    until_step_us: f64,
    steps: Vec<StepEvent>,
}

impl OfflineRenderer {
    pub fn new(shared: Arc<SharedState>, tables: Arc<Wavetables>, sample_rate: u32) -> Self {
        let until_step_us = shared.step_period().as_micros() as f64;
        Self {
            synth: SampleSynth::new(tables),
            scheduler: NoteScheduler::detached(),
            clock: SampleClock::new(sample_rate),
            frame_us: 1_000_000.0 / sample_rate.max(1) as f64,
            sample_rate,
            until_step_us,
            steps: Vec::new(),
            shared,
        }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Synth ticks run so far.
    pub fn synth_ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn synth_index(&self) -> usize {
        self.synth.index()
    }

    /// Step events fired so far, in order.
    pub fn step_events(&self) -> &[StepEvent] {
        &self.steps
    }

    /// Render `frames` output frames, each the held mix clamped to `0.0..=1.0`.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(frames);
        for _ in 0..frames {
            self.until_step_us -= self.frame_us;
            while self.until_step_us <= 0.0 {
                let ev = self.scheduler.tick(&self.shared);
                self.steps.push(ev);
                self.until_step_us += self.shared.step_period().as_micros().max(1) as f64;
            }
            let level = self.clock.advance_frame(&mut self.synth, &self.shared);
            out.push(level.clamp(0.0, 1.0));
        }
        out
    }

    /// Render for `duration` of virtual time.
    pub fn render_for(&mut self, duration: Duration) -> Vec<f32> {
        let frames = (duration.as_secs_f64() * self.sample_rate as f64).round() as usize;
        self.render(frames)
    }
}

/// Write duty-cycle samples (`0.0..=1.0`) as a 16-bit mono WAV, re-centred
/// around zero.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), String> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    for &s in samples {
        let centred = (s.clamp(0.0, 1.0) * 2.0 - 1.0) * i16::MAX as f32;
        writer
            .write_sample(centred as i16)
            .map_err(|e| format!("Failed to write sample: {}", e))?;
    }
    writer
        .finalize()
        .map_err(|e| format!("Failed to finalize {}: {}", path.display(), e))
}
