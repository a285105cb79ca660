//! One main-loop pass: collect step feedback, sample the panel, run change
//! detection, publish the results to the periodic processes and redraw.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use stepsynth_audio::{SharedState, StepEvent};
use stepsynth_types::{Cursor, Pattern, Step};

use crate::detector::{ChangeDetector, Changes, Thresholds};
use crate::hal::Surface;
use crate::render::{DisplayRenderer, DisplayState};
use crate::sampler::InputSampler;
use crate::tempo::TempoMap;

pub struct Controller {
    shared: Arc<SharedState>,
    feedback: Receiver<StepEvent>,
    sampler: InputSampler,
    detector: ChangeDetector,
    renderer: DisplayRenderer,
    pattern: Pattern,
    cursor: Cursor,
    playhead: Step,
    redraws: u64,
}

impl Controller {
    /// Takes over the shared state: loads the (empty) pattern and the step
    /// period for a speed pot at zero.
    pub fn new(
        shared: Arc<SharedState>,
        feedback: Receiver<StepEvent>,
        sampler: InputSampler,
        thresholds: Thresholds,
        tempo: TempoMap,
    ) -> Self {
        let detector = ChangeDetector::new(thresholds, tempo);
        shared.set_step_period(tempo.period(detector.playback_speed()));
        let pattern = Pattern::new();
        shared.load_pattern(&pattern);

        Self {
            playhead: shared.current_step(),
            shared,
            feedback,
            sampler,
            detector,
            renderer: DisplayRenderer::default(),
            pattern,
            cursor: Cursor::default(),
            redraws: 0,
        }
    }

    pub fn with_renderer(mut self, renderer: DisplayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the whole pattern, e.g. one given on the command line.
    pub fn load_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.shared.load_pattern(&pattern);
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn playhead(&self) -> Step {
        self.playhead
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            sine_volume: self.detector.sine_volume(),
            square_volume: self.detector.square_volume(),
            playback_speed: self.detector.playback_speed(),
            cursor: self.cursor,
            pattern: self.pattern,
            playhead: self.playhead,
        }
    }

    /// Panel setup and the first frame.
    pub fn init<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.renderer.init(surface);
        self.redraw(surface);
    }

    pub fn redraw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.renderer.render(surface, &self.display_state());
        self.redraws += 1;
    }

    pub fn run_pass<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Changes {
        let mut changes = Changes::none();

        for event in self.feedback.try_iter() {
            self.playhead = event.step;
            changes.playhead = true;
        }

        let input = self.sampler.sample();
        changes.merge(self.detector.apply(&input, &mut self.pattern, &mut self.cursor));
        self.publish(&changes);

        if changes.any() {
            self.redraw(surface);
        }
        changes
    }

    fn publish(&self, changes: &Changes) {
        if changes.sine_volume {
            self.shared.set_sine_volume(self.detector.sine_volume());
        }
        if changes.square_volume {
            self.shared.set_square_volume(self.detector.square_volume());
        }
        if let Some((step, note)) = changes.pattern {
            self.shared.set_note(step, note);
            log::debug!(target: "sequencer", "step {} -> {:?}", step.index(), note);
        }
        if let Some(period) = changes.tempo {
            self.shared.set_step_period(period);
            log::debug!(target: "sequencer", "step period {}ms", period.as_millis());
        }
    }
}
