// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! An in-memory `DoorSessionRepository` (spec §6.3, §6.4: "door sessions
//! persist only via the session repository"). Reference implementation —
//! a real deployment would back this with a database or file store.

use std::collections::HashMap;
use std::sync::Mutex;

use board_core::door::{DoorSessionRecord, DoorSessionRepository};

#[derive(Default)]
pub struct InMemoryDoorSessionRepository {
    records: Mutex<HashMap<String, DoorSessionRecord>>,
}

#[async_trait::async_trait]
impl DoorSessionRepository for InMemoryDoorSessionRepository {
    async fn save(&self, session_id: &str, record: DoorSessionRecord) {
        self.records.lock().unwrap().insert(session_id.to_string(), record);
    }

    async fn load_by_user_and_door(&self, user_id: &str, door_id: &str) -> Option<DoorSessionRecord> {
        self.records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.user_id == user_id && r.door_id == door_id)
            .cloned()
    }

    async fn delete(&self, session_id: &str) {
        self.records.lock().unwrap().remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn record(session_id: &str, user_id: &str, door_id: &str) -> DoorSessionRecord {
        DoorSessionRecord {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            door_id: door_id.to_string(),
            state: serde_json::json!({}),
            last_activity_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_then_load_by_user_and_door_round_trips() {
        let repo = InMemoryDoorSessionRepository::default();
        repo.save("oracle:alice", record("oracle:alice", "alice", "oracle")).await;
        let loaded = repo.load_by_user_and_door("alice", "oracle").await.unwrap();
        assert_eq!(loaded.session_id, "oracle:alice");
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repo = InMemoryDoorSessionRepository::default();
        repo.save("oracle:alice", record("oracle:alice", "alice", "oracle")).await;
        repo.delete("oracle:alice").await;
        assert!(repo.load_by_user_and_door("alice", "oracle").await.is_none());
    }
}
