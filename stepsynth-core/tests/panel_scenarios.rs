//! Whole main-loop passes driven through the virtual panel.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use stepsynth_audio::{OfflineRenderer, SharedState, StepEvent, Wavetables};
use stepsynth_core::{Bitmap, Controller, Pot, TempoMap, Thresholds, VirtualPanel};
use stepsynth_types::{Direction, Pattern, Pitch, Step};

struct Rig {
    controller: Controller,
    panel: VirtualPanel,
    lcd: Bitmap,
    feedback: Sender<StepEvent>,
}

impl Rig {
    fn new() -> Self {
        let panel = VirtualPanel::new();
        let (feedback, rx) = crossbeam_channel::unbounded();
        let mut controller = Controller::new(
            Arc::new(SharedState::new()),
            rx,
            panel.sampler(),
            Thresholds::default(),
            TempoMap::default(),
        );
        let mut lcd = Bitmap::new();
        controller.init(&mut lcd);
        Self {
            controller,
            panel,
            lcd,
            feedback,
        }
    }

    fn pass(&mut self) -> stepsynth_core::Changes {
        self.controller.run_pass(&mut self.lcd)
    }

    /// One joystick flick: held for a pass, then back to centre.
    fn flick(&mut self, dir: Direction, times: usize) {
        for _ in 0..times {
            self.panel.push_direction(dir);
            self.pass();
            self.pass();
        }
    }

    fn press(&mut self) -> stepsynth_core::Changes {
        self.panel.press_button();
        self.pass()
    }
}

#[test]
fn toggling_a_cell_twice_restores_the_pattern() {
    let mut rig = Rig::new();
    rig.flick(Direction::East, 3);
    rig.flick(Direction::South, 2);
    assert_eq!((rig.controller.cursor().column(), rig.controller.cursor().row()), (3, 2));

    let step = Step::new(3).unwrap();
    let changes = rig.press();
    assert_eq!(changes.pattern, Some((step, Pitch::new(2))));
    assert_eq!(rig.controller.shared().note(step), Pitch::new(2));

    // Release, then press again at the same cell.
    rig.pass();
    let changes = rig.press();
    assert_eq!(changes.pattern, Some((step, None)));
    assert_eq!(rig.controller.shared().note(step), None);
    assert!(rig.controller.pattern().is_empty());
}

#[test]
fn holding_the_button_toggles_once() {
    let mut rig = Rig::new();
    rig.panel.press_button();
    rig.panel.press_button();
    let first = rig.pass();
    let second = rig.pass();
    assert!(first.pattern.is_some());
    assert!(second.pattern.is_none());
    assert_eq!(rig.controller.pattern().get(Step::new(0).unwrap()), Pitch::new(0));
}

#[test]
fn cursor_is_clamped_at_the_edges() {
    let mut rig = Rig::new();
    rig.panel.push_direction(Direction::West);
    assert!(!rig.pass().cursor);
    rig.pass();
    rig.panel.push_direction(Direction::North);
    assert!(!rig.pass().cursor);
    rig.pass();

    rig.flick(Direction::East, 12);
    rig.flick(Direction::South, 12);
    let cursor = rig.controller.cursor();
    assert_eq!((cursor.column(), cursor.row()), (7, 7));
}

#[test]
fn sine_volume_hysteresis() {
    let mut rig = Rig::new();
    rig.panel.set_pot(Pot::SineVolume, 0.50);
    rig.pass();
    rig.panel.set_pot(Pot::SineVolume, 0.10);
    assert!(rig.pass().sine_volume);
    assert!((rig.controller.shared().sine_volume() - 0.10).abs() < 1e-6);

    // 0.10 -> 0.25 is past the 0.10 threshold.
    rig.panel.set_pot(Pot::SineVolume, 0.25);
    let changes = rig.pass();
    assert!(changes.sine_volume);
    assert!((rig.controller.shared().sine_volume() - 0.25).abs() < 1e-6);

    // 0.25 -> 0.30 is not.
    let refreshes = rig.lcd.refresh_count();
    rig.panel.set_pot(Pot::SineVolume, 0.30);
    let changes = rig.pass();
    assert!(!changes.sine_volume);
    assert!(!changes.any());
    assert_eq!(rig.lcd.refresh_count(), refreshes);
    assert!((rig.controller.shared().sine_volume() - 0.25).abs() < 1e-6);
    assert!((rig.controller.display_state().sine_volume - 0.25).abs() < 1e-6);
}

#[test]
fn idle_passes_do_not_redraw() {
    let mut rig = Rig::new();
    let refreshes = rig.lcd.refresh_count();
    for _ in 0..10 {
        assert!(!rig.pass().any());
    }
    assert_eq!(rig.lcd.refresh_count(), refreshes);
}

#[test]
fn several_changes_coalesce_into_one_redraw() {
    let mut rig = Rig::new();
    let refreshes = rig.lcd.refresh_count();
    rig.panel.set_pot(Pot::SquareVolume, 0.9);
    rig.panel.set_pot(Pot::PlaybackSpeed, 0.7);
    rig.panel.push_direction(Direction::East);
    rig.feedback
        .send(StepEvent {
            step: Step::new(1).unwrap(),
            note: None,
        })
        .unwrap();
    let changes = rig.pass();
    assert!(changes.square_volume && changes.cursor && changes.playhead);
    assert!(changes.tempo.is_some());
    assert_eq!(rig.lcd.refresh_count(), refreshes + 1);
}

#[test]
fn speed_change_reprograms_the_step_clock() {
    let mut rig = Rig::new();
    rig.controller.load_pattern(Pattern::parse("0,1,2,3,4,5,6,7").unwrap());

    rig.panel.set_pot(Pot::PlaybackSpeed, 0.20);
    assert_eq!(rig.pass().tempo, Some(Duration::from_millis(220)));
    assert_eq!(rig.controller.shared().step_period(), Duration::from_millis(220));

    let mut audio = OfflineRenderer::new(
        Arc::clone(rig.controller.shared()),
        Arc::new(Wavetables::generate()),
        48_000,
    );
    audio.render_for(Duration::from_millis(300));
    assert_eq!(audio.step_events().len(), 1);

    rig.panel.set_pot(Pot::PlaybackSpeed, 0.50);
    assert_eq!(rig.pass().tempo, Some(Duration::from_millis(520)));

    // The tick pending at 440ms keeps the old period.
    audio.render_for(Duration::from_millis(150));
    assert_eq!(audio.step_events().len(), 2);
    audio.render_for(Duration::from_millis(500));
    assert_eq!(audio.step_events().len(), 2);
    audio.render_for(Duration::from_millis(20));
    assert_eq!(audio.step_events().len(), 3);

    // Feed the steps back: the playhead follows the last one.
    for event in audio.step_events() {
        rig.feedback.send(*event).unwrap();
    }
    assert!(rig.pass().playhead);
    assert_eq!(rig.controller.playhead(), Step::new(3).unwrap());
    assert_eq!(rig.controller.shared().current_note(), Pitch::new(3));
}
