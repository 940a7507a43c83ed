// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// The result of feeding one line of input to a door's turn function
/// (spec §4.G state machine: "input --> ACTIVE" or "input with exit-signal
/// --> TERMINATED").
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub output: String,
    pub exit: bool,
}

impl TurnOutcome {
    #[must_use]
    pub fn continuing(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit: false,
        }
    }

    #[must_use]
    pub fn exiting(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            exit: true,
        }
    }
}

/// A door game (spec §4.G, §4.H). State is an opaque JSON blob so the
/// manager never needs to know a door's internal shape.
#[async_trait::async_trait]
pub trait Door: Send + Sync {
    fn id(&self) -> &str;

    /// Creates fresh state and an introduction banner for a new session
    /// (spec §4.G: "enter without either creates fresh state via the door
    /// implementation's introduction routine").
    async fn introduce(&self) -> (serde_json::Value, String);

    /// Advances the door by one turn of input. The error is a human-
    /// readable cause; the manager wraps it as [`crate::door::DoorError::DoorFailure`].
    async fn turn(&self, state: &mut serde_json::Value, input: &str) -> Result<TurnOutcome, String>;

    /// The banner shown when a `SAVED` session is restored (spec §4.G:
    /// "enter-with-resume ... emits resume banner").
    fn resume_banner(&self, _state: &serde_json::Value) -> String {
        "Welcome back. Resuming your session.".to_string()
    }
}
