//! A front panel with no hardware behind it. The terminal UI and the
//! scenario tests drive it; the controller reads it through the `hal`
//! traits like any other input.

use std::cell::RefCell;
use std::rc::Rc;

use stepsynth_types::Direction;

use crate::hal::{AnalogIn, DigitalIn, DirectionSource};
use crate::sampler::InputSampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pot {
    SineVolume,
    SquareVolume,
    PlaybackSpeed,
}

#[derive(Debug, Default)]
struct PanelState {
    pots: [f32; 3],
    /// Pending presses; each one reads low exactly once.
    presses: u32,
    direction: Direction,
}

impl PanelState {
    fn pot(&self, pot: Pot) -> f32 {
        self.pots[pot as usize]
    }
}

/// Cloneable handle; all clones share one panel.
#[derive(Debug, Clone, Default)]
pub struct VirtualPanel {
    state: Rc<RefCell<PanelState>>,
}

impl VirtualPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pot(&self, pot: Pot) -> f32 {
        self.state.borrow().pot(pot)
    }

    pub fn set_pot(&self, pot: Pot, value: f32) {
        self.state.borrow_mut().pots[pot as usize] = value.clamp(0.0, 1.0);
    }

    /// Move a pot by `delta`, clamped to its travel.
    pub fn nudge_pot(&self, pot: Pot, delta: f32) {
        let value = self.pot(pot) + delta;
        self.set_pot(pot, value);
    }

    /// The button reads pressed on the next read, then released again.
    pub fn press_button(&self) {
        self.state.borrow_mut().presses += 1;
    }

    /// Hold the joystick in `dir` for one read.
    pub fn push_direction(&self, dir: Direction) {
        self.state.borrow_mut().direction = dir;
    }

    pub fn sampler(&self) -> InputSampler {
        InputSampler::new(
            Box::new(PotView { panel: self.clone(), pot: Pot::SineVolume }),
            Box::new(PotView { panel: self.clone(), pot: Pot::SquareVolume }),
            Box::new(PotView { panel: self.clone(), pot: Pot::PlaybackSpeed }),
            Box::new(ButtonView(self.clone())),
            Box::new(StickView(self.clone())),
        )
    }
}

struct PotView {
    panel: VirtualPanel,
    pot: Pot,
}

impl AnalogIn for PotView {
    fn read(&mut self) -> f32 {
        self.panel.pot(self.pot)
    }
}

struct ButtonView(VirtualPanel);

impl DigitalIn for ButtonView {
    /// Active low: `false` while pressed.
    fn read(&mut self) -> bool {
        let mut state = self.0.state.borrow_mut();
        if state.presses > 0 {
            state.presses -= 1;
            false
        } else {
            true
        }
    }
}

struct StickView(VirtualPanel);

impl DirectionSource for StickView {
    fn direction(&mut self) -> Direction {
        std::mem::take(&mut self.0.state.borrow_mut().direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pots_clamp() {
        let panel = VirtualPanel::new();
        panel.set_pot(Pot::SineVolume, 1.7);
        assert_eq!(panel.pot(Pot::SineVolume), 1.0);
        panel.nudge_pot(Pot::SineVolume, -3.0);
        assert_eq!(panel.pot(Pot::SineVolume), 0.0);
    }

    #[test]
    fn test_press_reads_low_once() {
        let panel = VirtualPanel::new();
        let mut sampler = panel.sampler();
        assert!(!sampler.sample().button_pressed());
        panel.press_button();
        assert!(sampler.sample().button_pressed());
        assert!(!sampler.sample().button_pressed());
    }

    #[test]
    fn test_direction_held_for_one_read() {
        let panel = VirtualPanel::new();
        let mut sampler = panel.sampler();
        panel.push_direction(Direction::East);
        assert_eq!(sampler.sample().direction, Direction::East);
        assert_eq!(sampler.sample().direction, Direction::None);
    }

    #[test]
    fn test_sampler_sees_pots() {
        let panel = VirtualPanel::new();
        let mut sampler = panel.sampler();
        panel.set_pot(Pot::SquareVolume, 0.6);
        panel.set_pot(Pot::PlaybackSpeed, 0.2);
        let snap = sampler.sample();
        assert!((snap.square_volume - 0.6).abs() < 1e-6);
        assert!((snap.playback_speed - 0.2).abs() < 1e-6);
        assert_eq!(snap.sine_volume, 0.0);
    }
}
