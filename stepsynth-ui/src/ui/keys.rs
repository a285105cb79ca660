//! Keyboard stand-ins for the hardware controls.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stepsynth_core::panel::Pot;
use stepsynth_core::VirtualPanel;
use stepsynth_types::Direction;

/// One key press moves a pot by this much. Two presses clear the widest
/// hysteresis threshold.
pub const POT_STEP: f32 = 1.0 / 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    Joystick(Direction),
    Button,
    Nudge(Pot, f32),
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<PanelAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(PanelAction::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Up => PanelAction::Joystick(Direction::North),
        KeyCode::Down => PanelAction::Joystick(Direction::South),
        KeyCode::Left => PanelAction::Joystick(Direction::West),
        KeyCode::Right => PanelAction::Joystick(Direction::East),
        KeyCode::Char(' ') | KeyCode::Enter => PanelAction::Button,
        KeyCode::Char('q') => PanelAction::Nudge(Pot::SineVolume, POT_STEP),
        KeyCode::Char('a') => PanelAction::Nudge(Pot::SineVolume, -POT_STEP),
        KeyCode::Char('w') => PanelAction::Nudge(Pot::SquareVolume, POT_STEP),
        KeyCode::Char('s') => PanelAction::Nudge(Pot::SquareVolume, -POT_STEP),
        KeyCode::Char('e') => PanelAction::Nudge(Pot::PlaybackSpeed, POT_STEP),
        KeyCode::Char('d') => PanelAction::Nudge(Pot::PlaybackSpeed, -POT_STEP),
        KeyCode::Esc => PanelAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Apply `action` to the panel. Returns false for quit.
pub fn apply(panel: &VirtualPanel, action: PanelAction) -> bool {
    match action {
        PanelAction::Joystick(dir) => panel.push_direction(dir),
        PanelAction::Button => panel.press_button(),
        PanelAction::Nudge(pot, delta) => panel.nudge_pot(pot, delta),
        PanelAction::Quit => return false,
    }
    true
}
