//! The 24-entry drawing palette.
//!
//! Index meanings follow the gschem display color map (background, pin, net
//! endpoint, graphic, net, attribute, ...). Index 15 is the lock color: a
//! locked component paints every stroke with it regardless of the declared
//! color index.

use serde::{Deserialize, Serialize};

/// Palette slot used for locked components.
pub const LOCK_COLOR_INDEX: usize = 15;

const DEFAULT_PALETTE: [&str; 24] = [
    "#000000", // background
    "#ffffff", // pin
    "#ff0000", // net endpoint
    "#00ff00", // graphic
    "#0000ff", // net
    "#ffff00", // attribute
    "#00ffff", // logic bubble
    "#bebebe", // dots grid
    "#ff0000", // detached attribute
    "#00ff00", // text
    "#00ff00", // bus
    "#ffa500", // select
    "#ffa500", // bounding box
    "#00ffff", // zoom box
    "#e5e5e5", // stroke
    "#bebebe", // lock
    "#00ff00", // output background
    "#00ff00", // freestyle 1
    "#00ff00", // freestyle 2
    "#00ff00", // freestyle 3
    "#00ff00", // freestyle 4
    "#ffff00", // junction
    "#1e1e1e", // mesh grid major
    "#171717", // mesh grid minor
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable {
    entries: Vec<String>,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ColorTable {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Load a palette from a color file: one color per line, first seven
    /// characters taken verbatim (`#rrggbb`). Blank lines are skipped.
    pub fn from_lines(source: &str) -> Self {
        let entries = source
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.chars().take(7).collect())
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stroke color for a declared index. A locked owner overrides the
    /// declared index with the lock color.
    pub fn color(&self, index: usize, locked: bool) -> &str {
        if locked {
            self.raw(LOCK_COLOR_INDEX)
        } else {
            self.raw(index)
        }
    }

    /// Palette lookup without the lock override. Out-of-range indexes fall
    /// back to the background slot.
    pub fn raw(&self, index: usize) -> &str {
        self.entries
            .get(index)
            .or_else(|| self.entries.first())
            .map(String::as_str)
            .unwrap_or("#000000")
    }

    /// Canvas background color (slot 0).
    pub fn background(&self) -> &str {
        self.raw(0)
    }
}
