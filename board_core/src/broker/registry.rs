// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use notify_wire::EventType;

use crate::broker::connection::Connection;
use crate::broker::limits::RateWindow;

pub(crate) struct ClientRecord {
    pub(crate) connection: Arc<dyn Connection>,
    pub(crate) user_id: Option<String>,
    pub(crate) authenticated: bool,
    pub(crate) subscription_count: usize,
    pub(crate) subscribe_window: RateWindow,
    pub(crate) send_window: RateWindow,
}

pub(crate) struct Subscription {
    pub(crate) client_id: String,
    pub(crate) filter: Option<notify_wire::Filter>,
}

/// Both maps share a single mutex (spec §5 item 1: "guarded by a single
/// mutex held for the whole of any registry-mutating operation").
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) clients: FxHashMap<String, ClientRecord>,
    pub(crate) subscriptions: FxHashMap<EventType, Vec<Subscription>>,
}
