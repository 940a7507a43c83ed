// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Core runtime subsystems for the bbs server: ANSI-aware rendering, the
//! AI service façade, door-game sessions, and the notification broker.
//!
//! Every subsystem here depends only on the narrow collaborator traits in
//! [`ai::AIProvider`], [`door::DoorSessionRepository`], and
//! [`broker::Connection`] — never on a concrete transport or HTTP client.
//! The `boardd` binary crate supplies real implementations of those and
//! wires the subsystems together.

pub mod ai;
mod ansi;
pub mod broker;
pub mod color;
pub mod door;
pub mod frame;
pub mod render;
pub mod sysop;
pub mod width;
