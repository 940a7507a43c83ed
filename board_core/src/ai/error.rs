// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Typed AI error taxonomy (spec §4.F, §7 "External AI").

/// The kind half of the façade's typed error shape `{message, kind, cause?}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiErrorKind {
    RateLimited,
    Timeout,
    Network,
    Configuration,
    /// "Unknown/API" in spec §4.F: anything the provider surfaces that
    /// doesn't fit the other buckets.
    Api,
}

impl AiErrorKind {
    /// `isRetryable(kind)` (spec §4.F).
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, AiErrorKind::RateLimited | AiErrorKind::Timeout | AiErrorKind::Network)
    }

    /// `isConfigurationError(kind)` (spec §4.F).
    #[must_use]
    pub fn is_configuration_error(self) -> bool { matches!(self, AiErrorKind::Configuration) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(board_core::ai::error))]
pub struct AiError {
    pub message: String,
    pub kind: AiErrorKind,
    pub cause: Option<String>,
}

impl AiError {
    #[must_use]
    pub fn new(kind: AiErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            cause: None,
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool { self.kind.is_retryable() }

    #[must_use]
    pub fn is_configuration_error(&self) -> bool { self.kind.is_configuration_error() }
}
