// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_payload::ErrorPayload;
use crate::event_type::EventType;
use crate::payload::{
    AuthErrorPayload, AuthSuccessPayload, DoorEnteredPayload, DoorExitedPayload,
    DoorUpdatePayload, HeartbeatPayload, MessageNewPayload, MessageReplyPayload,
    SubscriptionErrorPayload, SubscriptionSuccessPayload, SystemAnnouncementPayload,
    SystemShutdownPayload, UserJoinedPayload, UserLeftPayload,
};

/// The event-type-specific payload (spec §3 "data"), represented as a
/// closed sum type per the design note in §9 rather than an open map.
///
/// `#[serde(untagged)]` deliberately omits its own discriminant: the
/// discriminant already lives in the enclosing [`NotificationEvent`]'s
/// `type` field, so `data` serializes as a bare object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventData {
    MessageNew(MessageNewPayload),
    MessageReply(MessageReplyPayload),
    UserJoined(UserJoinedPayload),
    UserLeft(UserLeftPayload),
    SystemAnnouncement(SystemAnnouncementPayload),
    SystemShutdown(SystemShutdownPayload),
    DoorUpdate(DoorUpdatePayload),
    DoorEntered(DoorEnteredPayload),
    DoorExited(DoorExitedPayload),
    AuthSuccess(AuthSuccessPayload),
    AuthError(AuthErrorPayload),
    SubscriptionSuccess(SubscriptionSuccessPayload),
    SubscriptionError(SubscriptionErrorPayload),
    Heartbeat(HeartbeatPayload),
    Error(ErrorPayload),
}

impl EventData {
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            EventData::MessageNew(_) => EventType::MessageNew,
            EventData::MessageReply(_) => EventType::MessageReply,
            EventData::UserJoined(_) => EventType::UserJoined,
            EventData::UserLeft(_) => EventType::UserLeft,
            EventData::SystemAnnouncement(_) => EventType::SystemAnnouncement,
            EventData::SystemShutdown(_) => EventType::SystemShutdown,
            EventData::DoorUpdate(_) => EventType::DoorUpdate,
            EventData::DoorEntered(_) => EventType::DoorEntered,
            EventData::DoorExited(_) => EventType::DoorExited,
            EventData::AuthSuccess(_) => EventType::AuthSuccess,
            EventData::AuthError(_) => EventType::AuthError,
            EventData::SubscriptionSuccess(_) => EventType::SubscriptionSuccess,
            EventData::SubscriptionError(_) => EventType::SubscriptionError,
            EventData::Heartbeat(_) => EventType::Heartbeat,
            EventData::Error(_) => EventType::Error,
        }
    }

    /// The payload as a [`serde_json::Value`], used by the broker to
    /// evaluate subscription filters against arbitrary field names
    /// without each filter site needing to match on every variant.
    ///
    /// # Panics
    ///
    /// Never: every payload variant here is a plain serde struct with no
    /// non-JSON-representable fields.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("payload variants always serialize to JSON")
    }
}

/// A notification event: `{type, timestamp, data}` (spec §3). Immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

impl NotificationEvent {
    /// The event factory (spec §4.I): attaches a fresh ISO-8601 UTC
    /// timestamp at the moment of creation.
    #[must_use]
    pub fn new(data: EventData) -> Self {
        Self {
            event_type: data.event_type(),
            timestamp: Utc::now(),
            data,
        }
    }
}
