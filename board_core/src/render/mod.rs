// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Rendering service (spec §4.E / component E).

pub mod context;
pub mod service;
pub mod template;

pub use context::{line_ending, ContextType, RenderContext};
pub use service::{render_frame, render_frame_with_title, render_template, render_text};
pub use template::{substitute, Template};
