// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A `reqwest`-backed `AIProvider` (spec's Supplemented Features: "HTTP-
//! backed via `reqwest` against a configurable completion endpoint").

use serde::{Deserialize, Serialize};

use board_core::ai::{AiError, AiErrorKind, CompletionOptions, AIProvider};

pub struct HttpAiProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAiProvider {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    schema: Option<&'a serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct StructuredResponse {
    data: serde_json::Value,
}

/// Maps transport-level failures onto §4.F's typed taxonomy: connect/send
/// failures are `Network`, client timeouts are `Timeout`, HTTP 429 is
/// `RateLimited`, 401/403 are `Configuration`, anything else is `Api`.
fn classify_reqwest_error(err: &reqwest::Error) -> AiErrorKind {
    if err.is_timeout() {
        AiErrorKind::Timeout
    } else if err.is_connect() {
        AiErrorKind::Network
    } else if let Some(status) = err.status() {
        match status.as_u16() {
            429 => AiErrorKind::RateLimited,
            401 | 403 => AiErrorKind::Configuration,
            _ => AiErrorKind::Api,
        }
    } else {
        AiErrorKind::Network
    }
}

#[async_trait::async_trait]
impl AIProvider for HttpAiProvider {
    async fn generate_completion(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, AiError> {
        let body = CompletionRequest {
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            schema: None,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::new(classify_reqwest_error(&e), "completion request failed").with_cause(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let kind = match status.as_u16() {
                429 => AiErrorKind::RateLimited,
                401 | 403 => AiErrorKind::Configuration,
                _ => AiErrorKind::Api,
            };
            return Err(AiError::new(kind, format!("provider returned status {status}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::new(AiErrorKind::Api, "malformed completion response").with_cause(e.to_string()))?;
        Ok(parsed.text)
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        options: &CompletionOptions,
    ) -> Result<serde_json::Value, AiError> {
        let body = CompletionRequest {
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            schema: Some(schema),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::new(classify_reqwest_error(&e), "structured completion request failed").with_cause(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let kind = match status.as_u16() {
                429 => AiErrorKind::RateLimited,
                401 | 403 => AiErrorKind::Configuration,
                _ => AiErrorKind::Api,
            };
            return Err(AiError::new(kind, format!("provider returned status {status}")));
        }

        let parsed: StructuredResponse = response
            .json()
            .await
            .map_err(|e| AiError::new(AiErrorKind::Api, "malformed structured response").with_cause(e.to_string()))?;
        Ok(parsed.data)
    }
}
