// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The Oracle door (spec §4.H).

use std::sync::Arc;

use crate::ai::{canned_fallback, AiFacade, CompletionOptions, FallbackContext};
use crate::door::{Door, TurnOutcome};
use crate::width::{truncate, visual_width};

const ORACLE_EMOJIS: [char; 4] = ['🔮', '✨', '🌙', '⭐'];
const MAX_CELLS: usize = 150;

/// A door whose turn function asks the AI for a mystical response to the
/// user's question (spec §4.H). Enforces a response ≤150 visual cells
/// containing at least one oracle emoji and one pause marker.
pub struct OracleDoor {
    facade: Arc<AiFacade>,
}

impl OracleDoor {
    #[must_use]
    pub fn new(facade: Arc<AiFacade>) -> Self { Self { facade } }

    fn enforce_constraints(text: &str) -> String {
        let body = truncate(text, MAX_CELLS, "...");
        let has_emoji = ORACLE_EMOJIS.iter().any(|e| body.contains(*e));
        let has_marker = body.contains("...");
        if has_emoji && has_marker {
            return body;
        }

        let mut suffix = String::new();
        if !has_emoji {
            suffix.push(' ');
            suffix.push(ORACLE_EMOJIS[0]);
        }
        if !has_marker {
            suffix.push_str("...");
        }

        let budget = MAX_CELLS.saturating_sub(visual_width(&suffix));
        let body = truncate(text, budget, "");
        format!("{body}{suffix}")
    }
}

#[async_trait::async_trait]
impl Door for OracleDoor {
    fn id(&self) -> &str { "oracle" }

    async fn introduce(&self) -> (serde_json::Value, String) {
        (
            serde_json::json!({}),
            "The Oracle awakens. Ask, and perhaps you shall know... 🔮".to_string(),
        )
    }

    async fn turn(&self, _state: &mut serde_json::Value, input: &str) -> Result<TurnOutcome, String> {
        let prompt = format!("Answer this question mystically and briefly: {input}");
        let fallback = canned_fallback(FallbackContext::Error);
        let text = self
            .facade
            .generate_completion(&prompt, &CompletionOptions::default(), Some(&fallback))
            .await
            .map_err(|e| e.message)?;
        Ok(TurnOutcome::continuing(Self::enforce_constraints(&text)))
    }
}
