// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The AI service façade (spec §4.F / component F).

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::ai::error::{AiError, AiErrorKind};
use crate::ai::provider::{AIProvider, CompletionOptions};

/// Retry policy for `generateCompletion` (spec §4.F: "default 2 retries").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    pub retry_attempts: usize,
    pub retry_delay: Duration,
    pub fallbacks_enabled: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 2,
            retry_delay: Duration::from_millis(500),
            fallbacks_enabled: true,
        }
    }
}

#[derive(Clone)]
pub struct AiFacade {
    provider: Arc<dyn AIProvider>,
    config: RetryConfig,
}

impl AiFacade {
    #[must_use]
    pub fn new(provider: Arc<dyn AIProvider>, config: RetryConfig) -> Self {
        Self { provider, config }
    }

    /// `generateCompletion(prompt, opts?, fallback?)` (spec §4.F): attempts
    /// up to `retryAttempts + 1` times. A configuration error stops
    /// immediately; a retryable error with attempts remaining sleeps
    /// `retryDelay` then retries; anything else stops. After exhausting
    /// attempts, returns the supplied fallback if fallbacks are enabled,
    /// else surfaces the last typed error.
    pub async fn generate_completion(
        &self,
        prompt: &str,
        opts: &CompletionOptions,
        fallback: Option<&str>,
    ) -> Result<String, AiError> {
        let total_attempts = self.config.retry_attempts + 1;
        let mut last_err: Option<AiError> = None;

        for attempt in 0..total_attempts {
            match self.provider.generate_completion(prompt, opts).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    let stop_now = err.is_configuration_error()
                        || !err.is_retryable()
                        || attempt + 1 == total_attempts;
                    last_err = Some(err);
                    if stop_now {
                        break;
                    }
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }

        let last_err = last_err.expect("loop runs at least once");
        if self.config.fallbacks_enabled {
            if let Some(text) = fallback {
                return Ok(text.to_string());
            }
        }
        Err(last_err)
    }

    /// `generateStructured<T>` (spec §4.F): a single call, no retries. A
    /// typed error is logged and yields `None`; any other failure is
    /// wrapped as an API error and also yields `None`.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        opts: &CompletionOptions,
    ) -> Option<T> {
        match self.provider.generate_structured(prompt, schema, opts).await {
            Ok(value) => match serde_json::from_value(value) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(error = %err, "structured AI response did not match the requested shape");
                    None
                }
            },
            Err(err) => {
                warn!(kind = ?err.kind, message = %err.message, "structured AI call failed");
                None
            }
        }
    }

    /// Health probe (spec §4.F): a short completion with a small token
    /// limit; reports whether it succeeded.
    pub async fn health_probe(&self) -> bool {
        let opts = CompletionOptions::default().with_max_tokens(8);
        self.provider.generate_completion("ping", &opts).await.is_ok()
    }
}

/// Wraps a non-[`AiError`] failure (e.g. a transport-layer error) as the
/// façade's API error kind, for collaborator implementations that need to
/// bridge foreign error types.
#[must_use]
pub fn wrap_as_api_error(message: impl Into<String>, cause: impl Into<String>) -> AiError {
    AiError::new(AiErrorKind::Api, message).with_cause(cause)
}
