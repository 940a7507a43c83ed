// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Binary-boundary error type: wraps every `board_core` error taxonomy
//! plus the process-level failures specific to running the server (spec's
//! Ambient Stack "Error handling" — `miette::Diagnostic` paired with
//! `thiserror::Error` at the CLI boundary).

use board_core::ai::AiError;
use board_core::door::DoorError;
use board_core::frame::RenderError;
use board_core::broker::NotificationError;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum BoarddError {
    #[error("configuration error: {0}")]
    #[diagnostic(code(boardd::config))]
    Config(String),

    #[error("io error: {0}")]
    #[diagnostic(code(boardd::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(boardd::render))]
    Render(#[from] RenderError),

    #[error(transparent)]
    #[diagnostic(code(boardd::ai))]
    Ai(#[from] AiError),

    #[error(transparent)]
    #[diagnostic(code(boardd::door))]
    Door(#[from] DoorError),

    #[error(transparent)]
    #[diagnostic(code(boardd::notification))]
    Notification(#[from] NotificationError),
}
