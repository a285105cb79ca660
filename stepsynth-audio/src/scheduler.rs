//! The step clock's callback: advance the playhead and retune the synth.

use crossbeam_channel::{Sender, TrySendError};
use serde::{Deserialize, Serialize};
use stepsynth_types::{Pitch, Step};

use crate::shared::SharedState;

/// Emitted once per step tick so the main loop can redraw the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub step: Step,
    pub note: Option<Pitch>,
}

pub struct NoteScheduler {
    step: Step,
    feedback_tx: Option<Sender<StepEvent>>,
    dropped: u64,
}

impl NoteScheduler {
    pub fn new(feedback_tx: Sender<StepEvent>) -> Self {
        Self {
            step: Step::default(),
            feedback_tx: Some(feedback_tx),
            dropped: 0,
        }
    }

    /// A scheduler nobody listens to (offline rendering).
    pub fn detached() -> Self {
        Self {
            step: Step::default(),
            feedback_tx: None,
            dropped: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Events the main loop was too slow to pick up.
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }

    /// Advance one step, look up its note and reprogram the sample clock.
    ///
    /// A rest leaves the sample period alone and silences the synth through
    /// the published note.
    pub fn tick(&mut self, shared: &SharedState) -> StepEvent {
        self.step = self.step.next();
        let note = shared.note(self.step);

        if let Some(pitch) = note {
            shared.set_sample_period_us(pitch.period_us());
        }
        shared.publish_step(self.step, note);

        let event = StepEvent { step: self.step, note };
        if let Some(tx) = &self.feedback_tx {
            match tx.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => self.dropped += 1,
                Err(TrySendError::Disconnected(_)) => self.feedback_tx = None,
            }
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepsynth_types::{Pattern, C_MAJOR_PERIODS_US, GRID_SIZE};

    #[test]
    fn test_step_cycles_with_period_eight() {
        let shared = SharedState::new();
        let mut sched = NoteScheduler::detached();
        let mut seen = Vec::new();
        for _ in 0..(GRID_SIZE * 2) {
            seen.push(sched.tick(&shared).step.index());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 0, 1, 2, 3, 4, 5, 6, 7, 0]);
        assert_eq!(shared.current_step(), sched.step());
    }

    #[test]
    fn test_reprograms_sample_period() {
        let shared = SharedState::new();
        shared.load_pattern(&Pattern::parse("-,4,7").unwrap());
        let mut sched = NoteScheduler::detached();

        let ev = sched.tick(&shared);
        assert_eq!(ev.note, Pitch::new(4));
        assert_eq!(shared.sample_period_us(), C_MAJOR_PERIODS_US[4]);

        sched.tick(&shared);
        assert_eq!(shared.sample_period_us(), C_MAJOR_PERIODS_US[7]);
        assert!(shared.is_sounding());
    }

    #[test]
    fn test_rest_silences_and_keeps_period() {
        let shared = SharedState::new();
        shared.load_pattern(&Pattern::parse("-,4").unwrap());
        let mut sched = NoteScheduler::detached();
        sched.tick(&shared);
        let ev = sched.tick(&shared);
        assert_eq!(ev.note, None);
        assert!(!shared.is_sounding());
        assert_eq!(shared.sample_period_us(), C_MAJOR_PERIODS_US[4]);
    }

    #[test]
    fn test_feedback_never_blocks() {
        let (tx, rx) = crossbeam_channel::bounded(2);
        let shared = SharedState::new();
        let mut sched = NoteScheduler::new(tx);
        for _ in 0..5 {
            sched.tick(&shared);
        }
        assert_eq!(rx.try_iter().count(), 2);
        assert_eq!(sched.dropped_events(), 3);
    }

    #[test]
    fn test_disconnected_feedback_is_ignored() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let shared = SharedState::new();
        let mut sched = NoteScheduler::new(tx);
        sched.tick(&shared);
        sched.tick(&shared);
        assert_eq!(sched.step().index(), 2);
    }
}
