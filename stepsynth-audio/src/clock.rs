//! Periodic clocks.
//!
//! Two drivers share the same contract: the period is re-read after every
//! tick, so a reprogrammed period applies from the next tick and never
//! cuts the one in flight short.
//! - [`Ticker`] runs a callback on its own thread at a wall-clock period.
//! - [`SampleClock`] subdivides audio-device time into synth ticks inside
//!   the device callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::shared::SharedState;
use crate::synth::SampleSynth;

/// A named thread invoking a callback once per period.
pub struct Ticker {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn the ticker. `period` is consulted after each tick; `on_tick`
    /// receives how late the tick fired relative to its deadline.
    pub fn spawn<P, F>(name: &str, period: P, mut on_tick: F) -> Result<Self, String>
    where
        P: Fn() -> Duration + Send + 'static,
        F: FnMut(Duration) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut deadline = Instant::now() + period();
                while flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < deadline {
                        thread::park_timeout(deadline - now);
                        continue;
                    }
                    on_tick(now - deadline);

                    let next = period();
                    deadline += next;
                    // Fell more than a whole period behind: resync instead of
                    // firing a burst of catch-up ticks.
                    if deadline + next < now {
                        deadline = now + next;
                    }
                }
            })
            .map_err(|e| format!("Failed to spawn {} thread: {}", name, e))?;

        log::debug!(target: "audio::clock", "ticker '{}' started", name);
        Ok(Self {
            running,
            thread: Some(thread),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the ticker and wait for its thread. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!(target: "audio::clock", "ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Converts device frames into synth ticks at the synth's current period.
///
/// Between ticks the last sample is held, the way a PWM pin keeps its duty
/// cycle until it is rewritten.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frame_us: f64,
    until_tick_us: f64,
    held: f32,
    ticks: u64,
}

impl SampleClock {
    pub fn new(device_rate: u32) -> Self {
        Self {
            frame_us: 1_000_000.0 / device_rate.max(1) as f64,
            until_tick_us: 0.0,
            held: 0.0,
            ticks: 0,
        }
    }

    /// Total synth ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance by `elapsed_us` of device time and return the held sample.
    #[inline]
    pub fn advance(&mut self, elapsed_us: f64, synth: &mut SampleSynth, shared: &SharedState) -> f32 {
        self.until_tick_us -= elapsed_us;
        while self.until_tick_us <= 0.0 {
            self.held = synth.tick(shared);
            self.ticks += 1;
            self.until_tick_us += shared.sample_period_us() as f64;
        }
        self.held
    }

    /// Advance by exactly one device frame.
    #[inline]
    pub fn advance_frame(&mut self, synth: &mut SampleSynth, shared: &SharedState) -> f32 {
        self.advance(self.frame_us, synth, shared)
    }
}
