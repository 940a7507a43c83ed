// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Door session manager (spec §4.G / component G).

pub mod door_trait;
pub mod error;
pub mod manager;
pub mod repository;
pub mod session;

pub use door_trait::{Door, TurnOutcome};
pub use error::DoorError;
pub use manager::{DoorManager, EnterOutcome, StepOutcome};
pub use repository::DoorSessionRepository;
pub use session::DoorSessionRecord;
