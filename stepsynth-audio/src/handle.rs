//! Main-thread handle to the running audio side.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::clock::{SampleClock, Ticker};
use crate::devices::AudioDeviceConfig;
use crate::output::AudioOutput;
use crate::scheduler::{NoteScheduler, StepEvent};
use crate::shared::SharedState;
use crate::synth::SampleSynth;
use crate::telemetry::TickTelemetry;
use crate::wavetable::Wavetables;

/// Step events buffered between two main-loop passes.
const FEEDBACK_CAPACITY: usize = 64;

/// Lateness beyond which a step tick counts as an overrun.
const STEP_BUDGET_US: u32 = 2_000;

/// Wake-up period of the headless synth clock. Each wake-up runs every
/// synth tick that fell due since the last one.
const HEADLESS_FRAME: Duration = Duration::from_millis(1);

/// Owns the two periodic processes: the sample clock (driven by the audio
/// device, or by a headless ticker when there is none) and the step ticker.
/// Both stop when the handle is dropped.
pub struct AudioHandle {
    shared: Arc<SharedState>,
    tables: Arc<Wavetables>,
    output: Option<AudioOutput>,
    synth_clock: Option<Ticker>,
    step_clock: Option<Ticker>,
    feedback_tx: Sender<StepEvent>,
    feedback_rx: Receiver<StepEvent>,
}

impl Default for AudioHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHandle {
    /// Build the wavetables and the shared state. Nothing runs yet.
    pub fn new() -> Self {
        let (feedback_tx, feedback_rx) = crossbeam_channel::bounded(FEEDBACK_CAPACITY);
        Self {
            shared: Arc::new(SharedState::new()),
            tables: Arc::new(Wavetables::generate()),
            output: None,
            synth_clock: None,
            step_clock: None,
            feedback_tx,
            feedback_rx,
        }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn tables(&self) -> &Arc<Wavetables> {
        &self.tables
    }

    /// Receiver of step events; cloned so the main loop can own one.
    pub fn feedback(&self) -> Receiver<StepEvent> {
        self.feedback_rx.clone()
    }

    /// Collect all step events since the last call.
    pub fn drain_feedback(&self) -> Vec<StepEvent> {
        self.feedback_rx.try_iter().collect()
    }

    pub fn is_running(&self) -> bool {
        self.step_clock.as_ref().is_some_and(Ticker::is_running)
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// True when the synth runs on the headless clock instead of a device.
    pub fn is_headless(&self) -> bool {
        self.synth_clock.is_some()
    }

    pub fn output(&self) -> Option<&AudioOutput> {
        self.output.as_ref()
    }

    /// Start the step ticker and, if a device is available, the audio
    /// output. A missing device falls back to the headless synth clock.
    pub fn start(&mut self, device: &AudioDeviceConfig) -> Result<(), String> {
        if self.step_clock.is_none() {
            self.step_clock = Some(self.spawn_step_clock()?);
        }

        if self.output.is_none() && self.synth_clock.is_none() {
            match AudioOutput::start(device, Arc::clone(&self.shared), Arc::clone(&self.tables)) {
                Ok(out) => self.output = Some(out),
                Err(e) => {
                    log::warn!(target: "audio", "audio output unavailable, running headless: {}", e);
                    self.synth_clock = Some(self.spawn_synth_clock()?);
                }
            }
        }
        Ok(())
    }

    /// Start without opening an audio device. The synth still runs in real
    /// time, its output is discarded.
    pub fn start_silent(&mut self) -> Result<(), String> {
        if self.step_clock.is_none() {
            self.step_clock = Some(self.spawn_step_clock()?);
        }
        if self.synth_clock.is_none() && self.output.is_none() {
            self.synth_clock = Some(self.spawn_synth_clock()?);
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut clock) = self.step_clock.take() {
            clock.stop();
        }
        if let Some(mut clock) = self.synth_clock.take() {
            clock.stop();
        }
        self.output = None;
        log::debug!(target: "audio", "audio stopped");
    }

    fn spawn_synth_clock(&self) -> Result<Ticker, String> {
        let shared = Arc::clone(&self.shared);
        let mut synth = SampleSynth::new(Arc::clone(&self.tables));
        // The rate only matters for advance_frame, which is unused here.
        let mut clock = SampleClock::new(1_000_000);
        let mut last = Instant::now();

        Ticker::spawn(
            "stepsynth-synth",
            || HEADLESS_FRAME,
            move |_| {
                let now = Instant::now();
                let elapsed = now - last;
                last = now;
                clock.advance(elapsed.as_micros() as f64, &mut synth, &shared);
            },
        )
    }

    fn spawn_step_clock(&self) -> Result<Ticker, String> {
        let period_source = Arc::clone(&self.shared);
        let shared = Arc::clone(&self.shared);
        let mut scheduler = NoteScheduler::new(self.feedback_tx.clone());
        let mut telemetry = TickTelemetry::new();

        Ticker::spawn(
            "stepsynth-step",
            move || period_source.step_period(),
            move |lateness| {
                scheduler.tick(&shared);
                telemetry.record(lateness, STEP_BUDGET_US);
                if telemetry.window_full() {
                    let s = telemetry.take_summary();
                    log::debug!(
                        target: "audio::telemetry",
                        "step lateness avg={}us max={}us p95={}us overruns={} dropped={}",
                        s.avg_us,
                        s.max_us,
                        s.p95_us,
                        s.overruns,
                        scheduler.dropped_events()
                    );
                }
            },
        )
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
