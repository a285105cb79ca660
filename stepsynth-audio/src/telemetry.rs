//! Step-clock jitter telemetry.
//!
//! Records how late each step tick fired, in a fixed-size ring so the
//! ticker thread never allocates.

use std::time::Duration;

/// Ring buffer size for lateness samples.
const LATENESS_BUFFER_SIZE: usize = 64;

/// Summary of the samples collected since the last window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JitterSummary {
    pub avg_us: u32,
    pub max_us: u32,
    pub p95_us: u32,
    /// Cumulative count of ticks later than the budget
    pub overruns: u64,
}

pub struct TickTelemetry {
    lateness_us: [u32; LATENESS_BUFFER_SIZE],
    idx: usize,
    max_us: u32,
    overrun_count: u64,
    sample_count: usize,
    since_summary: usize,
}

impl Default for TickTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TickTelemetry {
    pub fn new() -> Self {
        Self {
            lateness_us: [0; LATENESS_BUFFER_SIZE],
            idx: 0,
            max_us: 0,
            overrun_count: 0,
            sample_count: 0,
            since_summary: 0,
        }
    }

    /// Record one tick's lateness against `budget_us`.
    #[inline]
    pub fn record(&mut self, lateness: Duration, budget_us: u32) {
        let us = lateness.as_micros().min(u32::MAX as u128) as u32;

        self.lateness_us[self.idx] = us;
        self.idx = (self.idx + 1) % LATENESS_BUFFER_SIZE;
        if self.sample_count < LATENESS_BUFFER_SIZE {
            self.sample_count += 1;
        }
        self.since_summary += 1;

        self.max_us = self.max_us.max(us);
        if us > budget_us {
            self.overrun_count += 1;
        }
    }

    /// True once a full window has been recorded since the last summary.
    pub fn window_full(&self) -> bool {
        self.since_summary >= LATENESS_BUFFER_SIZE
    }

    /// Summarize and reset the max for the next window (overruns stay cumulative).
    pub fn take_summary(&mut self) -> JitterSummary {
        if self.sample_count == 0 {
            return JitterSummary::default();
        }

        let window = &self.lateness_us[..self.sample_count];
        let sum: u64 = window.iter().map(|&x| x as u64).sum();
        let avg_us = (sum / self.sample_count as u64) as u32;

        let mut sorted = self.lateness_us;
        sorted[..self.sample_count].sort_unstable();
        let p95_idx = (self.sample_count * 95 / 100).max(1) - 1;
        let p95_us = sorted[p95_idx.min(self.sample_count - 1)];

        let summary = JitterSummary {
            avg_us,
            max_us: self.max_us,
            p95_us,
            overruns: self.overrun_count,
        };
        self.max_us = 0;
        self.since_summary = 0;
        summary
    }
}
