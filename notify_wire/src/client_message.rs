// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single entry in a `subscribe` request's `events` array (spec §6.1):
/// either a bare event-type name, or `{type, filter}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscribeRequest {
    Simple(String),
    Filtered {
        #[serde(rename = "type")]
        event_type: String,
        #[serde(default)]
        filter: Option<HashMap<String, Value>>,
    },
}

impl SubscribeRequest {
    #[must_use]
    pub fn event_type_str(&self) -> &str {
        match self {
            SubscribeRequest::Simple(s) => s,
            SubscribeRequest::Filtered { event_type, .. } => event_type,
        }
    }

    #[must_use]
    pub fn filter(&self) -> Option<&HashMap<String, Value>> {
        match self {
            SubscribeRequest::Simple(_) => None,
            SubscribeRequest::Filtered { filter, .. } => filter.as_ref(),
        }
    }
}

/// Client-to-server messages (spec §6.1): `{action, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    Authenticate { token: String },
    Subscribe { events: Vec<SubscribeRequest> },
    Unsubscribe { events: Vec<String> },
    Pong,
}
