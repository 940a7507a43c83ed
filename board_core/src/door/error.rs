// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Door session error taxonomy (spec §4.G, §7 "State").

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum DoorError {
    #[error("user already has an active session in this door")]
    #[diagnostic(code(board_core::door::already_in_session))]
    AlreadyInSession,

    #[error("no session exists for this user and door")]
    #[diagnostic(code(board_core::door::no_session))]
    NoSession,

    #[error("unknown door id \"{0}\"")]
    #[diagnostic(code(board_core::door::unknown_door))]
    UnknownDoor(String),

    #[error("door turn function failed: {0}")]
    #[diagnostic(code(board_core::door::door_failure))]
    DoorFailure(String),

    #[error("session idle timeout exceeded")]
    #[diagnostic(code(board_core::door::timeout))]
    Timeout,
}
