// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Rendering service (spec §4.E / component E): the context-aware
//! integration point over the width calculator, colorizer, frame
//! builder, and frame validator.

use std::collections::HashMap;

use crate::color::{apply_color, to_html, Color};
use crate::frame::{self, Align, FrameBuilder, FrameLine, FrameStyle, RenderError};
use crate::render::context::{line_ending, ContextType, RenderContext};
use crate::render::template::{substitute, Template};
use crate::width::visual_width;

fn build_and_validate(
    ctx: RenderContext,
    raw_lines: Vec<String>,
    validate: bool,
) -> Result<Vec<String>, RenderError> {
    if validate {
        let joined = raw_lines.join("\n");
        let result = frame::validate(&joined);
        if !result.valid {
            return Err(RenderError::FrameInvalid {
                issues: result.issues,
            });
        }
    }
    for line in &raw_lines {
        let actual = visual_width(line);
        if actual > ctx.width {
            return Err(RenderError::WidthExceeded {
                actual,
                max: ctx.width,
            });
        }
    }
    Ok(raw_lines)
}

fn finalize(ctx: RenderContext, raw_lines: Vec<String>) -> String {
    let lines: Vec<String> = if ctx.is_web() {
        raw_lines.iter().map(|l| to_html(l)).collect()
    } else {
        raw_lines
    };
    lines.join(line_ending(ctx))
}

/// `renderFrame` (spec §4.E pipeline): build via the frame builder, HTML-
/// convert each line when the context is `web`, join with the context's
/// line ending, and (when `validate` is set) run the independent
/// validator against the pre-join lines.
pub fn render_frame(
    ctx: RenderContext,
    lines: &[FrameLine],
    style: FrameStyle,
    padding: usize,
    align: Align,
    validate: bool,
) -> Result<String, RenderError> {
    let builder = FrameBuilder::new(ctx.width, ctx.width, padding, style, align)?;
    let raw = builder.build(lines)?;
    let raw = build_and_validate(ctx, raw, validate)?;
    Ok(finalize(ctx, raw))
}

pub fn render_frame_with_title(
    ctx: RenderContext,
    title: &str,
    lines: &[FrameLine],
    title_color: Option<Color>,
    style: FrameStyle,
    padding: usize,
    align: Align,
    validate: bool,
) -> Result<String, RenderError> {
    let builder = FrameBuilder::new(ctx.width, ctx.width, padding, style, align)?;
    let raw = builder.build_with_title(title, lines, title_color)?;
    let raw = build_and_validate(ctx, raw, validate)?;
    Ok(finalize(ctx, raw))
}

/// `renderText` (spec §4.E): colorize if a color is given, then convert
/// to HTML if the context is `web`.
#[must_use]
pub fn render_text(ctx: RenderContext, text: &str, color: Option<Color>) -> String {
    let colored = match color {
        Some(c) => apply_color(text, &c),
        None => text.to_string(),
    };
    if ctx.context_type == ContextType::Web {
        to_html(&colored)
    } else {
        colored
    }
}

/// `renderTemplate(tpl, vars, ctx, validate)` (spec §4.E).
pub fn render_template(
    tpl: &Template,
    vars: &HashMap<String, String>,
    ctx: RenderContext,
    validate: bool,
) -> Result<String, RenderError> {
    let content = substitute(&tpl.content, vars, &tpl.variables)?;
    render_frame(ctx, &content, tpl.style, tpl.padding, tpl.align, validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaletteColor;
    use pretty_assertions::assert_eq;

    #[test]
    fn terminal_output_has_no_crlf() {
        let out = render_frame(
            RenderContext::terminal(20),
            &[FrameLine::new("hi")],
            FrameStyle::Single,
            1,
            Align::Left,
            true,
        )
        .unwrap();
        assert!(!out.contains("\r\n"));
    }

    #[test]
    fn stream_output_uses_crlf_between_lines() {
        let out = render_frame(
            RenderContext::stream(20),
            &[FrameLine::new("hi")],
            FrameStyle::Single,
            1,
            Align::Left,
            true,
        )
        .unwrap();
        assert_eq!(out.matches("\r\n").count(), out.lines().count() - 1);
    }

    #[test]
    fn web_output_is_ansi_free() {
        let out = render_frame(
            RenderContext::web(20),
            &[FrameLine::new("hi").with_color(PaletteColor::Red.into())],
            FrameStyle::Single,
            1,
            Align::Left,
            true,
        )
        .unwrap();
        assert!(!out.contains('\x1b'));
    }

    /// Scenario D (spec §8): a 200-char content line in an 80-column
    /// context fails with `WidthExceeded`.
    #[test]
    fn scenario_d_overlong_line_fails_width_exceeded() {
        let err = render_frame(
            RenderContext::terminal(80),
            &[FrameLine::new("a".repeat(200))],
            FrameStyle::Single,
            1,
            Align::Left,
            true,
        )
        .unwrap_err();
        match err {
            RenderError::WidthExceeded { actual, max } => {
                assert!(actual >= 200);
                assert_eq!(max, 80);
            }
            other => panic!("expected WidthExceeded, got {other:?}"),
        }
    }

    #[test]
    fn render_text_colorizes_then_htmlifies_on_web() {
        let out = render_text(RenderContext::web(80), "hi", Some(PaletteColor::Blue.into()));
        assert!(out.contains("<span"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn render_template_rejects_missing_variables() {
        let tpl = Template {
            name: "welcome".into(),
            width: 40,
            style: FrameStyle::Single,
            align: Align::Left,
            padding: 1,
            content: vec![FrameLine::new("Hi {{name}}")],
            variables: vec!["name".into()],
        };
        let err = render_template(&tpl, &HashMap::new(), RenderContext::terminal(40), true)
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingVariable(_)));
    }

    #[test]
    fn render_template_substitutes_and_renders() {
        let tpl = Template {
            name: "welcome".into(),
            width: 40,
            style: FrameStyle::Single,
            align: Align::Left,
            padding: 1,
            content: vec![FrameLine::new("Hi {{name}}")],
            variables: vec!["name".into()],
        };
        let vars = HashMap::from([("name".to_string(), "Ada".to_string())]);
        let out =
            render_template(&tpl, &vars, RenderContext::terminal(40), true).unwrap();
        assert!(out.contains("Hi Ada"));
        // All lines must have equal visual width (testable property 6).
        let widths: Vec<usize> = out.lines().map(visual_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
