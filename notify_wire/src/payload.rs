// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Per-event payload records (spec §4.I, §6.1, scenario A).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageNewPayload {
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(rename = "messageBaseId")]
    pub message_base_id: String,
    #[serde(rename = "messageBaseName")]
    pub message_base_name: String,
    pub subject: String,
    #[serde(rename = "authorHandle")]
    pub author_handle: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReplyPayload {
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(rename = "messageBaseId")]
    pub message_base_id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    pub subject: String,
    #[serde(rename = "authorHandle")]
    pub author_handle: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserJoinedPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLeftPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAnnouncementPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemShutdownPayload {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorUpdatePayload {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "doorId")]
    pub door_id: String,
    /// Door-specific state snapshot; the door's own serialization, opaque
    /// to the broker (spec §3 door session `state (JSON-like)`).
    pub state: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorEnteredPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub handle: String,
    #[serde(rename = "doorId")]
    pub door_id: String,
    #[serde(rename = "doorName")]
    pub door_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorExitedPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub handle: String,
    #[serde(rename = "doorId")]
    pub door_id: String,
    #[serde(rename = "doorName")]
    pub door_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSuccessPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthErrorPayload {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSuccessPayload {
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionErrorPayload {
    pub error: String,
    #[serde(rename = "failedEvents")]
    pub failed_events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeartbeatPayload {}
