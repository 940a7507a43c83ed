// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `boardd` server: a thin TCP line-oriented listener that wires
//! `board_core`'s rendering, AI façade, door manager, and notification
//! broker together into a runnable bulletin-board server.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod pong_tracker;
pub mod server;
