// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The door-session repository collaborator interface (spec §6.3).

use crate::door::session::DoorSessionRecord;

/// `{save(sessionId, record), loadByUserAndDoor(userId, doorId) → record?,
/// delete(sessionId)}` (spec §4.G, §6.3). Opaque to the manager; may be
/// in-memory or backed by storage.
#[async_trait::async_trait]
pub trait DoorSessionRepository: Send + Sync {
    async fn save(&self, session_id: &str, record: DoorSessionRecord);
    async fn load_by_user_and_door(&self, user_id: &str, door_id: &str) -> Option<DoorSessionRecord>;
    async fn delete(&self, session_id: &str);
}
