// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Frame validator (spec §4.D / component D): an oracle independent of
//! the builder, used in tests to check the builder's output (and usable
//! against any frame text, e.g. output from elsewhere).

use crate::color::strip;
use crate::frame::style::{vertical_glyphs, FrameStyle, DOUBLE, SINGLE};
use crate::width::visual_width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub width: usize,
    pub height: usize,
    pub issues: Vec<String>,
}

impl ValidationResult {
    fn invalid(issue: impl Into<String>) -> Self {
        Self {
            valid: false,
            width: 0,
            height: 0,
            issues: vec![issue.into()],
        }
    }
}

fn stripped_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(strip).collect();
    while matches!(lines.last(), Some(l) if l.is_empty()) {
        lines.pop();
    }
    lines
}

/// `validate(frameText)` (spec §4.D).
#[must_use]
pub fn validate(frame_text: &str) -> ValidationResult {
    let lines = stripped_lines(frame_text);
    if lines.is_empty() {
        return ValidationResult::invalid("frame has no lines");
    }

    let mut issues = Vec::new();
    let expected_width = visual_width(&lines[0]);
    for (i, line) in lines.iter().enumerate() {
        let w = visual_width(line);
        if w != expected_width {
            issues.push(format!(
                "line {i} has width {w}, expected {expected_width}"
            ));
        }
    }

    let top_style = corner_style(&lines[0], true);
    if top_style.is_none() {
        issues.push("top row does not open with a recognized corner pair".to_string());
    }
    let bottom_style = corner_style(lines.last().unwrap(), false);
    if bottom_style.is_none() {
        issues.push("bottom row does not close with a recognized corner pair".to_string());
    }

    if let Some(style) = top_style {
        check_horizontal_interior(&lines[0], style, &mut issues, "top");
    }
    if let Some(style) = bottom_style {
        check_horizontal_interior(lines.last().unwrap(), style, &mut issues, "bottom");
    }

    let mut observed_styles = std::collections::HashSet::new();
    if lines.len() > 2 {
        for (i, line) in lines[1..lines.len() - 1].iter().enumerate() {
            let row = i + 1;
            let chars: Vec<char> = line.chars().collect();
            let first = chars.first().copied();
            let last = chars.last().copied();
            for c in [first, last].into_iter().flatten() {
                match vertical_glyphs().into_iter().find(|(g, _)| *g == c) {
                    Some((_, style)) => {
                        observed_styles.insert(style);
                    }
                    None => {
                        issues.push(format!(
                            "row {row} does not begin/end with a vertical-or-tee glyph"
                        ));
                    }
                }
            }
        }
    }
    if observed_styles.len() > 1 {
        issues.push("mixed border styles detected".to_string());
    }

    ValidationResult {
        valid: issues.is_empty(),
        width: expected_width,
        height: lines.len(),
        issues,
    }
}

fn corner_style(line: &str, top: bool) -> Option<FrameStyle> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    for style in [FrameStyle::Single, FrameStyle::Double] {
        let g = style.glyphs();
        let (expect_first, expect_last) = if top {
            (g.top_left, g.top_right)
        } else {
            (g.bottom_left, g.bottom_right)
        };
        if first == expect_first && last == expect_last {
            return Some(style);
        }
    }
    None
}

fn check_horizontal_interior(
    line: &str,
    style: FrameStyle,
    issues: &mut Vec<String>,
    which: &str,
) {
    let g = style.glyphs();
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= 2 {
        return;
    }
    for &c in &chars[1..chars.len() - 1] {
        if c != g.horizontal {
            issues.push(format!("{which} row contains a non-horizontal interior glyph"));
            return;
        }
    }
}

/// `validateMultiple(text)`: scans for nested/sequential frames by
/// detecting top corners, and validates each one independently.
#[must_use]
pub fn validate_multiple(text: &str) -> Vec<ValidationResult> {
    let lines: Vec<&str> = text.lines().collect();
    let mut starts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let stripped = strip(line);
        if matches!(stripped.chars().next(), Some('┌') | Some('╔')) {
            starts.push(i);
        }
    }
    if starts.is_empty() {
        return vec![validate(text)];
    }
    starts
        .iter()
        .enumerate()
        .map(|(idx, &start)| {
            let end = starts.get(idx + 1).copied().unwrap_or(lines.len());
            validate(&lines[start..end].join("\n"))
        })
        .collect()
}

/// `validateBorders(text, style)`: a stricter check that a specific style
/// is used uniformly throughout.
#[must_use]
pub fn validate_borders(text: &str, style: FrameStyle) -> ValidationResult {
    let mut result = validate(text);
    let other = match style {
        FrameStyle::Single => DOUBLE,
        FrameStyle::Double => SINGLE,
    };
    let lines = stripped_lines(text);
    for line in &lines {
        if line.chars().any(|c| {
            c == other.top_left
                || c == other.top_right
                || c == other.bottom_left
                || c == other.bottom_right
                || c == other.vertical
                || c == other.horizontal
                || c == other.left_tee
                || c == other.right_tee
        }) {
            result
                .issues
                .push(format!("found a {other:?}-style glyph in a frame expected to be {style:?}"));
            result.valid = false;
        }
    }
    result
}

/// `validateMaxWidth(text, w)`: reports any line exceeding `w`.
#[must_use]
pub fn validate_max_width(text: &str, w: usize) -> Vec<String> {
    stripped_lines(text)
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let width = visual_width(line);
            (width > w).then(|| format!("line {i} has width {width}, exceeding max {w}"))
        })
        .collect()
}
