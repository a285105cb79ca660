use serde::{Deserialize, Serialize};

use crate::GRID_SIZE;

/// Sample-tick period in microseconds for each pitch row.
///
/// One wavetable cycle is 128 ticks, so row 0 sounds at
/// `1 / (128 * 119µs)` ≈ 65.6 Hz (C2). The last row is the octave above.
pub const C_MAJOR_PERIODS_US: [u32; GRID_SIZE] = [119, 106, 95, 89, 80, 71, 63, 60];

/// A pitch row on the note grid, always in `0..8`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pitch(u8);

impl Pitch {
    pub const LOWEST: Pitch = Pitch(0);
    pub const HIGHEST: Pitch = Pitch(GRID_SIZE as u8 - 1);

    pub fn new(row: u8) -> Option<Self> {
        if (row as usize) < GRID_SIZE {
            Some(Self(row))
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.0
    }

    /// Sample-tick period for this pitch.
    pub fn period_us(self) -> u32 {
        C_MAJOR_PERIODS_US[self.0 as usize]
    }

    /// Frequency of the tone produced when one wavetable cycle spans
    /// `table_len` ticks of this pitch's period.
    pub fn frequency_hz(self, table_len: usize) -> f32 {
        1_000_000.0 / (self.period_us() as f32 * table_len as f32)
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "C2",
            1 => "D2",
            2 => "E2",
            3 => "F2",
            4 => "G2",
            5 => "A2",
            6 => "B2",
            _ => "C3",
        }
    }
}

impl TryFrom<u8> for Pitch {
    type Error = String;

    fn try_from(row: u8) -> Result<Self, Self::Error> {
        Pitch::new(row).ok_or_else(|| format!("pitch row {} out of range 0..{}", row, GRID_SIZE))
    }
}

impl From<Pitch> for u8 {
    fn from(p: Pitch) -> u8 {
        p.0
    }
}

impl std::fmt::Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
