// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashMap;

use crate::frame::{Align, FrameLine, FrameStyle, RenderError};

/// `{name, width, style, content, variables}` (spec §4.E).
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub width: usize,
    pub style: FrameStyle,
    pub align: Align,
    pub padding: usize,
    pub content: Vec<FrameLine>,
    /// Declared variable names; every one must have a supplied value
    /// before substitution runs.
    pub variables: Vec<String>,
}

/// Substitutes `{{name}}` placeholders in `content` with the supplied
/// values.
///
/// This uses a literal (non-regex) string replace, so unlike a
/// regex-based substitution it never interprets a `$` in a replacement
/// value as a capture-group back-reference — placeholder and replacement
/// text are both treated as-is, satisfying the "treated as literal"
/// requirement in spec §4.E without needing explicit escaping.
pub fn substitute(
    content: &[FrameLine],
    vars: &HashMap<String, String>,
    declared: &[String],
) -> Result<Vec<FrameLine>, RenderError> {
    for name in declared {
        if !vars.contains_key(name) {
            return Err(RenderError::MissingVariable(name.clone()));
        }
    }

    Ok(content
        .iter()
        .map(|line| {
            let mut text = line.text.clone();
            for (name, value) in vars {
                text = text.replace(&format!("{{{{{name}}}}}"), value);
            }
            FrameLine {
                text,
                align: line.align,
                color: line.color.clone(),
            }
        })
        .collect())
}
