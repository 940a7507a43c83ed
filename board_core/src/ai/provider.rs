// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `AIProvider` collaborator interface (spec §6.3).

use crate::ai::error::AiError;

/// Knobs passed through to the underlying model call. Every field is
/// optional: a provider implementation supplies its own defaults for
/// anything left unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// `{generateCompletion(prompt, options) → text, generateStructured<T>(prompt,
/// schema, options) → T}` (spec §4.F, §6.3). `generate_structured` returns a
/// [`serde_json::Value`] rather than a generic type so the trait stays
/// object-safe; [`crate::ai::AiFacade::generate_structured`] deserializes
/// it into the caller's type.
#[async_trait::async_trait]
pub trait AIProvider: Send + Sync {
    async fn generate_completion(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, AiError>;

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        options: &CompletionOptions,
    ) -> Result<serde_json::Value, AiError>;
}
