// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use rustc_hash::FxHashMap;

use notify_wire::EventType;

/// Broker statistics (spec §4.J): client count, authenticated count, total
/// subscriptions, event-type count, per-type subscriber count, active
/// event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerStats {
    pub client_count: usize,
    pub authenticated_count: usize,
    pub total_subscriptions: usize,
    pub event_type_count: usize,
    pub subscribers_per_type: FxHashMap<EventType, usize>,
    pub active_event_types: Vec<EventType>,
}
