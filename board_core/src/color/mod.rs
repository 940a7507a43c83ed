// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Colorizer (spec §4.B / component B).

mod palette;

pub use palette::PaletteColor;

use crate::ansi::{scan, strip_sgr, Token};

pub const SGR_RESET: &str = "\x1b[0m";

/// How a caller supplies a color to the frame builder (spec §4.C): either
/// a named palette color, or a raw escape sequence taken literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Color {
    Named(PaletteColor),
    Raw(String),
}

impl From<PaletteColor> for Color {
    fn from(c: PaletteColor) -> Self { Color::Named(c) }
}

/// `colorize(text, color)`: wraps `text` in the color's SGR sequence and
/// a trailing reset (spec §4.B, testable property 3: always ends with
/// reset).
#[must_use]
pub fn colorize(text: &str, color: PaletteColor) -> String {
    format!("\x1b[{}m{text}{SGR_RESET}", color.sgr_code())
}

/// Applies a [`Color`] to `text`: a named color is colorized normally; a
/// raw escape is wrapped around the text verbatim, with its own reset
/// appended (spec §4.C "Apply color either by wrapping ... or by taking a
/// caller-supplied raw escape literally").
#[must_use]
pub fn apply_color(text: &str, color: &Color) -> String {
    match color {
        Color::Named(c) => colorize(text, *c),
        Color::Raw(seq) => format!("{seq}{text}{SGR_RESET}"),
    }
}

/// `strip(s)`: removes every CSI-m sequence (spec §4.B). Testable
/// property 1 (`strip(colorize(text, color)) == text`) depends on this
/// being the exact inverse of [`colorize`]'s wrapping.
#[must_use]
pub fn strip(s: &str) -> String { strip_sgr(s) }

/// `toHTML(s)`: converts ANSI color sequences to HTML `<span>` pairs
/// (spec §4.B). Reset closes any open span; a recognized color code opens
/// a new one (closing a previously open one first); unknown codes are
/// dropped without producing a span. Any span left open at the end is
/// closed. Never emits an ESC byte (testable property 4).
#[must_use]
pub fn to_html(s: &str) -> String {
    let mut out = String::new();
    let mut open = false;
    for tok in scan(s) {
        match tok {
            Token::Text(t) => out.push_str(&html_escape(t)),
            Token::Sgr(params) => {
                let last = *params.last().unwrap_or(&0);
                if last == 0 {
                    if open {
                        out.push_str("</span>");
                        open = false;
                    }
                } else if let Some(color) = PaletteColor::from_sgr_code(last) {
                    if open {
                        out.push_str("</span>");
                    }
                    out.push_str(&format!("<span style=\"color:{}\">", color.hex()));
                    open = true;
                }
                // Unknown codes are dropped without producing a span.
            }
        }
    }
    if open {
        out.push_str("</span>");
    }
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
