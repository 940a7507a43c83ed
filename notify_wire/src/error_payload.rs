// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

/// Wire-level error codes (spec §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ErrorCode {
    #[serde(rename = "CONNECTION_ERROR")]
    #[strum(serialize = "CONNECTION_ERROR")]
    ConnectionError,
    #[serde(rename = "SUBSCRIPTION_ERROR")]
    #[strum(serialize = "SUBSCRIPTION_ERROR")]
    SubscriptionError,
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    #[strum(serialize = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded,
    #[serde(rename = "AUTHENTICATION_REQUIRED")]
    #[strum(serialize = "AUTHENTICATION_REQUIRED")]
    AuthenticationRequired,
    #[serde(rename = "INVALID_EVENT_TYPE")]
    #[strum(serialize = "INVALID_EVENT_TYPE")]
    InvalidEventType,
    #[serde(rename = "INTERNAL_ERROR")]
    #[strum(serialize = "INTERNAL_ERROR")]
    InternalError,
}

/// `{code, message, details?}` (spec §6.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorPayload {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
