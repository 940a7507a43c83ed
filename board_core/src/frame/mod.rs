// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Frame builder and validator (spec §4.C, §4.D / components C, D).

pub mod builder;
pub mod error;
pub mod line;
pub mod style;
pub mod validator;

pub use builder::FrameBuilder;
pub use error::RenderError;
pub use line::{Align, FrameLine};
pub use style::FrameStyle;
pub use validator::{validate, validate_borders, validate_max_width, validate_multiple, ValidationResult};
