// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The 8-color named palette (spec §3 "Color palette"): a fixed, global,
/// immutable mapping of names to ANSI SGR codes and hex HTML colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl PaletteColor {
    /// The SGR foreground code `colorize` emits for this color.
    #[must_use]
    pub fn sgr_code(self) -> u16 {
        match self {
            PaletteColor::Red => 31,
            PaletteColor::Green => 32,
            PaletteColor::Yellow => 33,
            PaletteColor::Blue => 34,
            PaletteColor::Magenta => 35,
            PaletteColor::Cyan => 36,
            PaletteColor::White => 37,
            PaletteColor::Gray => 90,
        }
    }

    /// The hex HTML color `toHTML` emits for this color.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            PaletteColor::Red => "#ff5555",
            PaletteColor::Green => "#50c878",
            PaletteColor::Yellow => "#f0e68c",
            PaletteColor::Blue => "#6495ed",
            PaletteColor::Magenta => "#ff77ff",
            PaletteColor::Cyan => "#5ffbf1",
            PaletteColor::White => "#f5f5f5",
            PaletteColor::Gray => "#a0a0a0",
        }
    }

    /// Reverse lookup used by `toHTML`: the palette color (if any) whose
    /// SGR code matches the final numeric parameter of a CSI-m sequence.
    #[must_use]
    pub fn from_sgr_code(code: u16) -> Option<Self> {
        [
            PaletteColor::Red,
            PaletteColor::Green,
            PaletteColor::Yellow,
            PaletteColor::Blue,
            PaletteColor::Magenta,
            PaletteColor::Cyan,
            PaletteColor::White,
            PaletteColor::Gray,
        ]
        .into_iter()
        .find(|c| c.sgr_code() == code)
    }
}
