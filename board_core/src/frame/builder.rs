// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Frame builder (spec §4.C / component C).

use crate::color::{apply_color, Color};
use crate::frame::error::RenderError;
use crate::frame::line::{Align, FrameLine};
use crate::frame::style::FrameStyle;
use crate::width::visual_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuilder {
    width: usize,
    max_width: usize,
    padding: usize,
    style: FrameStyle,
    align: Align,
}

impl FrameBuilder {
    /// Rejects construction if `width > max_width` (spec §4.C).
    pub fn new(
        width: usize,
        max_width: usize,
        padding: usize,
        style: FrameStyle,
        align: Align,
    ) -> Result<Self, RenderError> {
        if width > max_width {
            return Err(RenderError::InvalidDimensions { width, max_width });
        }
        Ok(Self {
            width,
            max_width,
            padding,
            style,
            align,
        })
    }

    fn content_width(self) -> usize { self.width.saturating_sub(2 + 2 * self.padding) }

    fn content_line(&self, line: &FrameLine) -> String {
        let content_width = self.content_width();
        let padded = pad_to_width(&line.text, content_width, line.align);
        let body = match &line.color {
            Some(color) => apply_color(&padded, color),
            None => padded,
        };
        let glyphs = self.style.glyphs();
        let pad = " ".repeat(self.padding);
        format!("{}{pad}{body}{pad}{}", glyphs.vertical, glyphs.vertical)
    }

    fn top_border(&self) -> String {
        let g = self.style.glyphs();
        format!(
            "{}{}{}",
            g.top_left,
            g.horizontal.to_string().repeat(self.width.saturating_sub(2)),
            g.top_right
        )
    }

    fn bottom_border(&self) -> String {
        let g = self.style.glyphs();
        format!(
            "{}{}{}",
            g.bottom_left,
            g.horizontal.to_string().repeat(self.width.saturating_sub(2)),
            g.bottom_right
        )
    }

    fn divider(&self) -> String {
        let g = self.style.glyphs();
        format!(
            "{}{}{}",
            g.left_tee,
            g.horizontal.to_string().repeat(self.width.saturating_sub(2)),
            g.right_tee
        )
    }

    fn empty_content_line(&self) -> String {
        self.content_line(&FrameLine::new(String::new()))
    }

    fn finish(&self, lines: Vec<String>) -> Result<Vec<String>, RenderError> {
        for line in &lines {
            let actual = visual_width(line);
            if actual > self.max_width {
                return Err(RenderError::WidthExceeded {
                    actual,
                    max: self.max_width,
                });
            }
        }
        Ok(lines)
    }

    /// `build(lines)`: top border, one content row per logical line,
    /// bottom border. No trailing separators.
    pub fn build(&self, lines: &[FrameLine]) -> Result<Vec<String>, RenderError> {
        let mut out = Vec::with_capacity(lines.len() + 2);
        out.push(self.top_border());
        out.extend(lines.iter().map(|l| self.content_line(l)));
        out.push(self.bottom_border());
        self.finish(out)
    }

    /// `buildWithTitle(title, lines, titleColor?)`: title is centered,
    /// surrounded by empty lines, separated from content by a divider row.
    pub fn build_with_title(
        &self,
        title: &str,
        lines: &[FrameLine],
        title_color: Option<Color>,
    ) -> Result<Vec<String>, RenderError> {
        let mut title_line = FrameLine::new(title).with_align(Align::Center);
        if let Some(c) = title_color {
            title_line = title_line.with_color(c);
        }

        let mut out = Vec::with_capacity(lines.len() + 5);
        out.push(self.top_border());
        out.push(self.empty_content_line());
        out.push(self.content_line(&title_line));
        out.push(self.empty_content_line());
        out.push(self.divider());
        out.extend(lines.iter().map(|l| self.content_line(l)));
        out.push(self.bottom_border());
        self.finish(out)
    }

    /// `buildMessage(message, color?)`: a single centered line.
    pub fn build_message(
        &self,
        message: &str,
        color: Option<Color>,
    ) -> Result<Vec<String>, RenderError> {
        let mut line = FrameLine::new(message).with_align(Align::Center);
        if let Some(c) = color {
            line = line.with_color(c);
        }
        self.build(&[line])
    }

    /// A light sanity check redundant with the full validator in
    /// [`crate::frame::validator`] (spec §4.C): the text is non-empty and
    /// its first line opens with a known top-left corner glyph.
    #[must_use]
    pub fn validate(frame_text: &str) -> bool {
        let first_line = frame_text.lines().next();
        match first_line {
            Some(line) => {
                let stripped = crate::color::strip(line);
                let first_char = stripped.chars().next();
                matches!(first_char, Some('┌') | Some('╔'))
            }
            None => false,
        }
    }
}

fn pad_to_width(text: &str, width: usize, align: Align) -> String {
    let w = visual_width(text);
    if w >= width {
        return text.to_string();
    }
    let diff = width - w;
    match align {
        Align::Left => format!("{text}{}", " ".repeat(diff)),
        Align::Center => {
            let left = diff / 2;
            let right = diff - left;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaletteColor;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_width_greater_than_max_width() {
        let err = FrameBuilder::new(100, 80, 1, FrameStyle::Single, Align::Left).unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidDimensions {
                width: 100,
                max_width: 80
            }
        );
    }

    /// Scenario C (spec §8): width 60, double style, two lines.
    #[test]
    fn scenario_c_double_style_frame() {
        let builder = FrameBuilder::new(60, 60, 1, FrameStyle::Double, Align::Left).unwrap();
        let lines = builder
            .build(&[FrameLine::new("Line 1"), FrameLine::new("Line 2")])
            .unwrap();

        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert_eq!(visual_width(line), 60);
        }
        assert!(lines[0].starts_with('╔'));
        assert!(lines[0].ends_with('╗'));
        assert!(lines[3].starts_with('╚'));
        assert!(lines[3].ends_with('╝'));
        assert!(lines[1].starts_with('║'));
        assert!(lines[1].ends_with('║'));
        assert!(lines[2].starts_with('║'));
        assert!(lines[2].ends_with('║'));
    }

    #[test]
    fn build_with_title_has_divider_and_centered_title() {
        let builder = FrameBuilder::new(40, 40, 1, FrameStyle::Single, Align::Left).unwrap();
        let lines = builder
            .build_with_title("Welcome", &[FrameLine::new("body")], None)
            .unwrap();
        // top, empty, title, empty, divider, body, bottom
        assert_eq!(lines.len(), 7);
        assert!(lines[4].starts_with('├') && lines[4].ends_with('┤'));
        for line in &lines {
            assert_eq!(visual_width(line), 40);
        }
    }

    #[test]
    fn build_message_is_a_single_centered_line() {
        let builder = FrameBuilder::new(30, 30, 1, FrameStyle::Single, Align::Left).unwrap();
        let lines = builder.build_message("hi", Some(PaletteColor::Green.into())).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(visual_width(&lines[1]), 30);
    }

    #[test]
    fn overlong_content_line_fails_width_exceeded() {
        let builder = FrameBuilder::new(20, 20, 1, FrameStyle::Single, Align::Left).unwrap();
        let err = builder
            .build(&[FrameLine::new("a".repeat(200))])
            .unwrap_err();
        assert!(matches!(err, RenderError::WidthExceeded { .. }));
    }

    #[test]
    fn static_validate_checks_the_opening_corner() {
        let builder = FrameBuilder::new(10, 10, 0, FrameStyle::Single, Align::Left).unwrap();
        let lines = builder.build(&[FrameLine::new("hi")]).unwrap();
        assert!(FrameBuilder::validate(&lines.join("\n")));
        assert!(!FrameBuilder::validate("not a frame"));
    }
}
