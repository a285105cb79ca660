//! The 8-step note pattern and the sequencer playhead.

use serde::{Deserialize, Serialize};

use crate::pitch::Pitch;
use crate::GRID_SIZE;

/// Playhead position, always in `0..8`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Step(u8);

impl Step {
    pub fn new(step: u8) -> Option<Self> {
        if (step as usize) < GRID_SIZE {
            Some(Self(step))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The following step, wrapping from 7 back to 0.
    pub fn next(self) -> Self {
        Self((self.0 + 1) % GRID_SIZE as u8)
    }
}

/// One note slot per step. `None` means nothing is programmed there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    notes: [Option<Pitch>; GRID_SIZE],
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_notes(notes: [Option<Pitch>; GRID_SIZE]) -> Self {
        Self { notes }
    }

    pub fn get(&self, step: Step) -> Option<Pitch> {
        self.notes[step.index()]
    }

    pub fn set(&mut self, step: Step, note: Option<Pitch>) {
        self.notes[step.index()] = note;
    }

    /// Button semantics: pressing on the note already programmed in this
    /// column clears it, anything else programs `row` there.
    pub fn toggle(&mut self, column: Step, row: Pitch) -> Option<Pitch> {
        let slot = &mut self.notes[column.index()];
        *slot = if *slot == Some(row) { None } else { Some(row) };
        *slot
    }

    pub fn clear(&mut self) {
        self.notes = [None; GRID_SIZE];
    }

    pub fn is_empty(&self) -> bool {
        self.notes.iter().all(Option::is_none)
    }

    /// Iterate `(step, note)` over all eight steps.
    pub fn iter(&self) -> impl Iterator<Item = (Step, Option<Pitch>)> + '_ {
        self.notes
            .iter()
            .enumerate()
            .map(|(i, n)| (Step(i as u8), *n))
    }

    /// Parse a comma-separated pattern such as `0,2,4,-,7,-,-,1`.
    /// `-` (or an empty field) is a rest. Fewer than eight fields leave the
    /// remaining steps empty.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut pattern = Pattern::new();
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() > GRID_SIZE {
            return Err(format!(
                "pattern has {} steps, at most {} allowed",
                fields.len(),
                GRID_SIZE
            ));
        }
        for (i, field) in fields.into_iter().enumerate() {
            if field.is_empty() || field == "-" {
                continue;
            }
            let row: u8 = field
                .parse()
                .map_err(|_| format!("step {}: '{}' is not a pitch row", i, field))?;
            let pitch = Pitch::try_from(row).map_err(|e| format!("step {}: {}", i, e))?;
            pattern.notes[i] = Some(pitch);
        }
        Ok(pattern)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match note {
                Some(p) => write!(f, "{}", p.row())?,
                None => f.write_str("-")?,
            }
        }
        Ok(())
    }
}
