//! Fixed series palette.
//!
//! Datasets are colored by position (`index % PALETTE.len()`), so the same
//! input always renders with the same colors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesColor {
    Blue,
    Red,
    Green,
    Purple,
    Orange,
    Brown,
    Pink,
    Gray,
}

pub const PALETTE: [SeriesColor; 8] = [
    SeriesColor::Blue,
    SeriesColor::Red,
    SeriesColor::Green,
    SeriesColor::Purple,
    SeriesColor::Orange,
    SeriesColor::Brown,
    SeriesColor::Pink,
    SeriesColor::Gray,
];

impl SeriesColor {
    /// Palette slot for the dataset at `index` (0-based), wrapping around.
    pub fn for_index(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            SeriesColor::Blue => "blue",
            SeriesColor::Red => "red",
            SeriesColor::Green => "green",
            SeriesColor::Purple => "purple",
            SeriesColor::Orange => "orange",
            SeriesColor::Brown => "brown",
            SeriesColor::Pink => "pink",
            SeriesColor::Gray => "gray",
        }
    }

    /// CSS named-color RGB values.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SeriesColor::Blue => (0, 0, 255),
            SeriesColor::Red => (255, 0, 0),
            SeriesColor::Green => (0, 128, 0),
            SeriesColor::Purple => (128, 0, 128),
            SeriesColor::Orange => (255, 165, 0),
            SeriesColor::Brown => (165, 42, 42),
            SeriesColor::Pink => (255, 192, 203),
            SeriesColor::Gray => (128, 128, 128),
        }
    }

    /// Point marker used by the ASCII plot, where color is unavailable.
    pub fn marker(self) -> char {
        match self {
            SeriesColor::Blue => 'o',
            SeriesColor::Red => 'x',
            SeriesColor::Green => '+',
            SeriesColor::Purple => '*',
            SeriesColor::Orange => '#',
            SeriesColor::Brown => '@',
            SeriesColor::Pink => '%',
            SeriesColor::Gray => '&',
        }
    }
}

impl std::fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
