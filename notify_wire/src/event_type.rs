// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The closed enumeration of notification event types (spec §3, §4.I).
///
/// Serializes to and from the dotted wire form (`"message.new"`, not
/// `"MessageNew"`) so the JSON on the wire matches §6.1 exactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum EventType {
    #[serde(rename = "message.new")]
    #[strum(serialize = "message.new")]
    MessageNew,
    #[serde(rename = "message.reply")]
    #[strum(serialize = "message.reply")]
    MessageReply,
    #[serde(rename = "user.joined")]
    #[strum(serialize = "user.joined")]
    UserJoined,
    #[serde(rename = "user.left")]
    #[strum(serialize = "user.left")]
    UserLeft,
    #[serde(rename = "system.announcement")]
    #[strum(serialize = "system.announcement")]
    SystemAnnouncement,
    #[serde(rename = "system.shutdown")]
    #[strum(serialize = "system.shutdown")]
    SystemShutdown,
    #[serde(rename = "door.update")]
    #[strum(serialize = "door.update")]
    DoorUpdate,
    #[serde(rename = "door.entered")]
    #[strum(serialize = "door.entered")]
    DoorEntered,
    #[serde(rename = "door.exited")]
    #[strum(serialize = "door.exited")]
    DoorExited,
    #[serde(rename = "auth.success")]
    #[strum(serialize = "auth.success")]
    AuthSuccess,
    #[serde(rename = "auth.error")]
    #[strum(serialize = "auth.error")]
    AuthError,
    #[serde(rename = "subscription.success")]
    #[strum(serialize = "subscription.success")]
    SubscriptionSuccess,
    #[serde(rename = "subscription.error")]
    #[strum(serialize = "subscription.error")]
    SubscriptionError,
    #[serde(rename = "heartbeat")]
    #[strum(serialize = "heartbeat")]
    Heartbeat,
    #[serde(rename = "error")]
    #[strum(serialize = "error")]
    Error,
}

/// Whether an event type may be subscribed to and, if so, whether it is
/// delivered to every authenticated client regardless of filter (spec
/// §4.I's "Broadcast?" column) or is gated by subscriber filters.
///
/// Connection-lifecycle events (`auth.*`, `subscription.*`, `heartbeat`,
/// `error`) are never subscribable — the broker only ever sends them
/// directly to the client they concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Broadcast,
    Filterable,
    ConnectionLifecycle,
}

impl EventType {
    /// `isValidEventType` from spec §4.I: any enum member is valid, by
    /// construction there is no invalid `EventType` value, so this exists
    /// for parsing untrusted wire strings.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        use std::str::FromStr;
        Self::from_str(s).ok()
    }

    #[must_use]
    pub fn category(self) -> EventCategory {
        match self {
            EventType::UserJoined
            | EventType::UserLeft
            | EventType::SystemAnnouncement
            | EventType::SystemShutdown
            | EventType::DoorEntered
            | EventType::DoorExited => EventCategory::Broadcast,
            EventType::MessageNew | EventType::MessageReply | EventType::DoorUpdate => {
                EventCategory::Filterable
            }
            EventType::AuthSuccess
            | EventType::AuthError
            | EventType::SubscriptionSuccess
            | EventType::SubscriptionError
            | EventType::Heartbeat
            | EventType::Error => EventCategory::ConnectionLifecycle,
        }
    }

    /// Whether a client may issue a `subscribe` request for this type.
    #[must_use]
    pub fn is_subscribable(self) -> bool {
        self.category() != EventCategory::ConnectionLifecycle
    }
}
