// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event_type::EventType;

/// A subscription filter: a set of key/value constraints drawn from the
/// filter-field registry for the subscription's event type (spec §3, §4.J
/// filter semantics).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter(pub HashMap<String, Value>);

impl Filter {
    #[must_use]
    pub fn new(fields: HashMap<String, Value>) -> Self { Self(fields) }

    /// The filter-field registry (spec §4.I table): which payload keys
    /// may appear in a filter for a given event type. Lives beside the
    /// enum per the design note in §9.
    #[must_use]
    pub fn allowed_fields(event_type: EventType) -> &'static [&'static str] {
        match event_type {
            EventType::MessageNew => &["messageBaseId"],
            EventType::MessageReply => &["messageBaseId", "parentId"],
            EventType::DoorUpdate => &["sessionId", "doorId"],
            EventType::UserJoined
            | EventType::UserLeft
            | EventType::SystemAnnouncement
            | EventType::SystemShutdown
            | EventType::DoorEntered
            | EventType::DoorExited
            | EventType::AuthSuccess
            | EventType::AuthError
            | EventType::SubscriptionSuccess
            | EventType::SubscriptionError
            | EventType::Heartbeat
            | EventType::Error => &[],
        }
    }

    /// Validates that every key in `self` is a member of `event_type`'s
    /// filter-field registry. Empty filters are always valid.
    #[must_use]
    pub fn is_valid_for(&self, event_type: EventType) -> bool {
        let allowed = Self::allowed_fields(event_type);
        self.0.keys().all(|k| allowed.contains(&k.as_str()))
    }

    /// Filter semantics (spec §4.J): matches a payload iff for every key
    /// in the filter, the payload has a field of that key with an equal
    /// value. An absent filter (`None` at the call site) matches every
    /// payload; an empty filter here also matches every payload.
    #[must_use]
    pub fn matches(&self, payload: &Value) -> bool {
        self.0.iter().all(|(k, v)| payload.get(k) == Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_everything() {
        let f = Filter::default();
        assert!(f.matches(&json!({"messageBaseId": "b1"})));
    }

    #[test]
    fn filter_matches_iff_field_equal() {
        let f = Filter::new(HashMap::from([("messageBaseId".into(), json!("b1"))]));
        assert!(f.matches(&json!({"messageBaseId": "b1", "subject": "hi"})));
        assert!(!f.matches(&json!({"messageBaseId": "b2"})));
        assert!(!f.matches(&json!({"subject": "hi"})));
    }

    #[test]
    fn rejects_fields_outside_the_registry() {
        let f = Filter::new(HashMap::from([("bogus".into(), json!("x"))]));
        assert!(!f.is_valid_for(EventType::MessageNew));
    }

    #[test]
    fn accepts_registered_fields() {
        let f = Filter::new(HashMap::from([
            ("messageBaseId".into(), json!("b1")),
            ("parentId".into(), json!("m1")),
        ]));
        assert!(f.is_valid_for(EventType::MessageReply));
    }

    #[test]
    fn broadcast_events_have_no_filterable_fields() {
        assert_eq!(Filter::allowed_fields(EventType::UserJoined), &[] as &[&str]);
    }
}
