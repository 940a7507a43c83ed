// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The AI SysOp page endpoint (spec §4.H).

use std::sync::Arc;
use std::time::Duration;

use crate::ai::{canned_fallback, AiError, AiErrorKind, AiFacade, CompletionOptions, FallbackContext};
use crate::color::{colorize, PaletteColor};
use crate::width::truncate;

const PAGE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CELLS: usize = 500;

/// Races the AI call against a 5-second timer and responds with ≤500
/// visual cells of ANSI-colored text (spec §4.H).
pub struct AiSysOp {
    facade: Arc<AiFacade>,
}

impl AiSysOp {
    #[must_use]
    pub fn new(facade: Arc<AiFacade>) -> Self { Self { facade } }

    pub async fn page(&self, prompt: &str) -> String {
        let fallback = canned_fallback(FallbackContext::Error);
        let opts = CompletionOptions::default();

        let result: Result<String, AiError> = tokio::select! {
            res = self.facade.generate_completion(prompt, &opts, Some(&fallback)) => res,
            () = tokio::time::sleep(PAGE_TIMEOUT) => {
                Err(AiError::new(AiErrorKind::Timeout, "sysop page timed out"))
            }
        };

        let text = result.unwrap_or(fallback);
        let truncated = truncate(&text, MAX_CELLS, "...");
        colorize(&truncated, PaletteColor::Magenta)
    }
}
