// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Broker error taxonomy (spec §7 "State").

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum NotificationError {
    #[error("no client registered with id \"{0}\"")]
    #[diagnostic(code(board_core::broker::no_client))]
    NoClient(String),

    #[error("subscription request rate limit exceeded")]
    #[diagnostic(code(board_core::broker::rate_limit_exceeded))]
    RateLimitExceeded,
}
