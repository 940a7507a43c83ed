// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A door session's persisted shape (spec §4.G "Persistence contract"). The
/// `state` blob is opaque to the manager; only the owning [`super::Door`]
/// implementation interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub door_id: String,
    pub state: serde_json::Value,
    pub last_activity_at: DateTime<Utc>,
}
