// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Rendering error taxonomy (spec §7 "Rendering"). Shared by the frame
//! builder/validator (components C, D) and the rendering service
//! (component E), which adds [`RenderError::MissingVariable`] for
//! template substitution failures.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum RenderError {
    #[error("frame width {width} exceeds configured maximum {max_width}")]
    #[diagnostic(code(board_core::render::invalid_dimensions))]
    InvalidDimensions { width: usize, max_width: usize },

    #[error("line width {actual} exceeds maximum {max}")]
    #[diagnostic(code(board_core::render::width_exceeded))]
    WidthExceeded { actual: usize, max: usize },

    #[error("frame failed validation: {issues:?}")]
    #[diagnostic(code(board_core::render::frame_invalid))]
    FrameInvalid { issues: Vec<String> },

    #[error("template variable \"{0}\" was not supplied")]
    #[diagnostic(code(board_core::render::missing_variable))]
    MissingVariable(String),
}
