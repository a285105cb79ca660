use serde::{Deserialize, Serialize};

use crate::pattern::Step;
use crate::pitch::Pitch;
use crate::GRID_SIZE;

/// Decoded joystick direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    North,
    South,
    East,
    West,
}

/// Grid cell addressed by the joystick cursor.
///
/// `column` selects the step, `row` selects the pitch. Row 0 is drawn at the
/// top of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    column: u8,
    row: u8,
}

impl Cursor {
    pub fn new(column: u8, row: u8) -> Option<Self> {
        let max = GRID_SIZE as u8;
        if column < max && row < max {
            Some(Self { column, row })
        } else {
            None
        }
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// The step this cursor's column addresses.
    pub fn step(&self) -> Step {
        Step::new(self.column).unwrap_or_default()
    }

    /// The pitch this cursor's row addresses.
    pub fn pitch(&self) -> Pitch {
        Pitch::new(self.row).unwrap_or(Pitch::LOWEST)
    }

    /// Move one cell in `dir`, clamped at the grid edges.
    /// Returns true if the position changed.
    pub fn apply(&mut self, dir: Direction) -> bool {
        let last = GRID_SIZE as u8 - 1;
        let before = *self;
        match dir {
            Direction::North => self.row = self.row.saturating_sub(1),
            Direction::South => self.row = (self.row + 1).min(last),
            Direction::East => self.column = (self.column + 1).min(last),
            Direction::West => self.column = self.column.saturating_sub(1),
            Direction::None => {}
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_one_cell() {
        let mut c = Cursor::default();
        assert!(c.apply(Direction::East));
        assert!(c.apply(Direction::South));
        assert_eq!((c.column(), c.row()), (1, 1));
        assert!(c.apply(Direction::North));
        assert!(c.apply(Direction::West));
        assert_eq!(c, Cursor::default());
    }

    #[test]
    fn test_clamped_at_edges() {
        let mut c = Cursor::default();
        assert!(!c.apply(Direction::West));
        assert!(!c.apply(Direction::North));
        assert_eq!(c, Cursor::default());

        let mut c = Cursor::new(7, 7).unwrap();
        assert!(!c.apply(Direction::East));
        assert!(!c.apply(Direction::South));
        assert_eq!((c.column(), c.row()), (7, 7));
    }

    #[test]
    fn test_none_is_noop() {
        let mut c = Cursor::new(3, 4).unwrap();
        assert!(!c.apply(Direction::None));
        assert_eq!((c.column(), c.row()), (3, 4));
    }

    #[test]
    fn test_out_of_grid_rejected() {
        assert!(Cursor::new(8, 0).is_none());
        assert!(Cursor::new(0, 8).is_none());
    }
}
