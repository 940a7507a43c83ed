// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The notification broker (spec §4.J / component J).

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::Mutex;
use tracing::warn;

use notify_wire::{
    ErrorCode, ErrorPayload, EventData, EventType, Filter, NotificationEvent, SubscribeRequest,
};

use crate::broker::connection::Connection;
use crate::broker::error::NotificationError;
use crate::broker::limits::{
    RateWindow, EVENTS_PER_CLIENT_PER_MINUTE, PER_CLIENT_SUBSCRIPTION_CAP,
    SUBSCRIBE_REQUESTS_PER_MINUTE,
};
use crate::broker::registry::{ClientRecord, Registry, Subscription};
use crate::broker::stats::BrokerStats;

/// `{success[], failed[]}` (spec §4.J `subscribe`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeOutcome {
    pub success: Vec<EventType>,
    pub failed: Vec<String>,
}

/// Client registry, subscription index, and broadcast operations (spec
/// §4.J). Send failures are isolated per client and never block delivery
/// to others (spec §5: "the broker must not hold its registry lock across
/// sends").
pub struct NotificationBroker {
    registry: Mutex<Registry>,
    per_client_cap: usize,
}

impl Default for NotificationBroker {
    fn default() -> Self { Self::new() }
}

impl NotificationBroker {
    #[must_use]
    pub fn new() -> Self { Self::with_cap(PER_CLIENT_SUBSCRIPTION_CAP) }

    /// Builds a broker with a configured per-client subscription cap
    /// instead of [`PER_CLIENT_SUBSCRIPTION_CAP`] (spec §5 "recommended
    /// defaults, not hard cores").
    #[must_use]
    pub fn with_cap(per_client_cap: usize) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            per_client_cap,
        }
    }

    /// `registerClient(connection, userId?)` (spec §4.J). The close hook
    /// named in the spec is the transport task's own responsibility: it
    /// calls [`Self::unregister_client`] when the connection ends (see
    /// `DESIGN.md`).
    pub async fn register_client(&self, connection: Arc<dyn Connection>, user_id: Option<String>) {
        let id = connection.id().to_string();
        let mut registry = self.registry.lock().await;
        registry.clients.insert(
            id,
            ClientRecord {
                connection,
                user_id,
                authenticated: false,
                subscription_count: 0,
                subscribe_window: RateWindow::new(),
                send_window: RateWindow::new(),
            },
        );
    }

    /// `unregisterClient(id)` (spec §4.J): idempotent; garbage-collects
    /// emptied subscription lists.
    pub async fn unregister_client(&self, id: &str) {
        let mut registry = self.registry.lock().await;
        if registry.clients.remove(id).is_none() {
            return;
        }
        for subs in registry.subscriptions.values_mut() {
            subs.retain(|s| s.client_id != id);
        }
        registry.subscriptions.retain(|_, subs| !subs.is_empty());
    }

    /// `authenticateClient(id, userId)` (spec §4.J).
    pub async fn authenticate_client(&self, id: &str, user_id: impl Into<String>) {
        let mut registry = self.registry.lock().await;
        match registry.clients.get_mut(id) {
            Some(client) => {
                client.user_id = Some(user_id.into());
                client.authenticated = true;
            }
            None => warn!(client_id = %id, "authenticate_client: unknown client id"),
        }
    }

    /// `subscribe(id, requests[])` (spec §4.J). Rate-limited to
    /// [`SUBSCRIBE_REQUESTS_PER_MINUTE`] calls/minute per client.
    pub async fn subscribe(
        &self,
        id: &str,
        requests: &[SubscribeRequest],
    ) -> Result<SubscribeOutcome, NotificationError> {
        let mut registry = self.registry.lock().await;
        let client = registry
            .clients
            .get_mut(id)
            .ok_or_else(|| NotificationError::NoClient(id.to_string()))?;

        if !client.subscribe_window.tick(SUBSCRIBE_REQUESTS_PER_MINUTE) {
            return Err(NotificationError::RateLimitExceeded);
        }

        let current_count = client.subscription_count;
        if current_count + requests.len() > self.per_client_cap {
            return Ok(SubscribeOutcome {
                success: Vec::new(),
                failed: requests.iter().map(|r| r.event_type_str().to_string()).collect(),
            });
        }

        let mut success = Vec::new();
        let mut failed = Vec::new();
        for req in requests {
            let type_str = req.event_type_str();
            let Some(event_type) = EventType::parse(type_str) else {
                failed.push(type_str.to_string());
                continue;
            };
            if !event_type.is_subscribable() {
                failed.push(type_str.to_string());
                continue;
            }
            let filter = req.filter().cloned().map(Filter::new);
            if let Some(f) = &filter {
                if !f.is_valid_for(event_type) {
                    failed.push(type_str.to_string());
                    continue;
                }
            }
            registry
                .subscriptions
                .entry(event_type)
                .or_default()
                .push(Subscription {
                    client_id: id.to_string(),
                    filter,
                });
            success.push(event_type);
        }

        if let Some(client) = registry.clients.get_mut(id) {
            client.subscription_count += success.len();
        }

        Ok(SubscribeOutcome { success, failed })
    }

    /// `unsubscribe(id, eventTypes[])` (spec §4.J).
    pub async fn unsubscribe(&self, id: &str, event_types: &[EventType]) {
        let mut registry = self.registry.lock().await;
        let mut removed = 0usize;
        for ty in event_types {
            if let Some(list) = registry.subscriptions.get_mut(ty) {
                let before = list.len();
                list.retain(|s| s.client_id != id);
                removed += before - list.len();
                if list.is_empty() {
                    registry.subscriptions.remove(ty);
                }
            }
        }
        if let Some(client) = registry.clients.get_mut(id) {
            client.subscription_count = client.subscription_count.saturating_sub(removed);
        }
    }

    /// Takes each eligible client's rate-limit budget under the registry
    /// lock and returns its live connection handle; the caller sends
    /// after the lock is released (spec §5: "sends occur after release").
    fn collect_targets(registry: &mut Registry, ids: impl Iterator<Item = String>) -> Vec<Arc<dyn Connection>> {
        let mut out = Vec::new();
        for id in ids {
            if let Some(client) = registry.clients.get_mut(&id) {
                if !client.connection.is_open() {
                    continue;
                }
                if client.send_window.tick(EVENTS_PER_CLIENT_PER_MINUTE) {
                    out.push(client.connection.clone());
                } else {
                    warn!(client_id = %id, "rate limit exceeded, dropping notification");
                }
            }
        }
        out
    }

    async fn send_to_all(wire: Arc<str>, targets: Vec<Arc<dyn Connection>>) {
        let mut set = tokio::task::JoinSet::new();
        for conn in targets {
            let wire = wire.clone();
            set.spawn(async move {
                if let Err(err) = conn.send(&wire).await {
                    warn!(client_id = conn.id(), error = %err, "failed to deliver notification");
                }
            });
        }
        while set.join_next().await.is_some() {}
    }

    /// `broadcast(event)` (spec §4.J): delivers to every subscription on
    /// `event`'s type whose filter matches the payload.
    pub async fn broadcast(&self, event: &NotificationEvent) {
        let payload_json = event.data.to_json();
        let wire: Arc<str> = Arc::from(serde_json::to_string(event).expect("NotificationEvent always serializes").as_str());

        let targets = {
            let mut registry = self.registry.lock().await;
            let matching_ids: Vec<String> = match registry.subscriptions.get(&event.event_type) {
                None => return,
                Some(subs) => subs
                    .iter()
                    .filter(|s| s.filter.as_ref().is_none_or(|f| f.matches(&payload_json)))
                    .map(|s| s.client_id.clone())
                    .collect(),
            };
            Self::collect_targets(&mut registry, matching_ids.into_iter())
        };

        Self::send_to_all(wire, targets).await;
    }

    /// `broadcastToClient(id, event)` (spec §4.J): bypasses subscription
    /// matching.
    pub async fn broadcast_to_client(&self, id: &str, event: &NotificationEvent) {
        let wire: Arc<str> = Arc::from(serde_json::to_string(event).expect("NotificationEvent always serializes").as_str());
        let targets = {
            let mut registry = self.registry.lock().await;
            Self::collect_targets(&mut registry, std::iter::once(id.to_string()))
        };
        Self::send_to_all(wire, targets).await;
    }

    /// `broadcastToClients(ids, event)` (spec §4.J): bypasses subscription
    /// matching.
    pub async fn broadcast_to_clients(&self, ids: &[String], event: &NotificationEvent) {
        let wire: Arc<str> = Arc::from(serde_json::to_string(event).expect("NotificationEvent always serializes").as_str());
        let targets = {
            let mut registry = self.registry.lock().await;
            Self::collect_targets(&mut registry, ids.iter().cloned())
        };
        Self::send_to_all(wire, targets).await;
    }

    /// Delivers to every registered client regardless of authentication or
    /// subscription state. Used for connection-lifecycle events such as
    /// `heartbeat`, which spec §4.I says "are never subscribed to".
    pub async fn broadcast_to_all(&self, event: &NotificationEvent) {
        let wire: Arc<str> = Arc::from(serde_json::to_string(event).expect("NotificationEvent always serializes").as_str());
        let targets = {
            let mut registry = self.registry.lock().await;
            let ids: Vec<String> = registry.clients.keys().cloned().collect();
            Self::collect_targets(&mut registry, ids.into_iter())
        };
        Self::send_to_all(wire, targets).await;
    }

    /// `broadcastToAuthenticated(event)` (spec §4.J): bypasses subscription
    /// matching.
    pub async fn broadcast_to_authenticated(&self, event: &NotificationEvent) {
        let wire: Arc<str> = Arc::from(serde_json::to_string(event).expect("NotificationEvent always serializes").as_str());
        let targets = {
            let mut registry = self.registry.lock().await;
            let ids: Vec<String> = registry
                .clients
                .iter()
                .filter(|(_, c)| c.authenticated)
                .map(|(id, _)| id.clone())
                .collect();
            Self::collect_targets(&mut registry, ids.into_iter())
        };
        Self::send_to_all(wire, targets).await;
    }

    /// `sendError(id, code, message, details?)` (spec §4.J).
    pub async fn send_error(
        &self,
        id: &str,
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) {
        let mut payload = ErrorPayload::new(code, message);
        if let Some(d) = details {
            payload = payload.with_details(d);
        }
        let event = NotificationEvent::new(EventData::Error(payload));
        self.broadcast_to_client(id, &event).await;
    }

    /// Statistics (spec §4.J).
    pub async fn stats(&self) -> BrokerStats {
        let registry = self.registry.lock().await;
        let subscribers_per_type: FxHashMap<EventType, usize> =
            registry.subscriptions.iter().map(|(k, v)| (*k, v.len())).collect();
        BrokerStats {
            client_count: registry.clients.len(),
            authenticated_count: registry.clients.values().filter(|c| c.authenticated).count(),
            total_subscriptions: registry.subscriptions.values().map(Vec::len).sum(),
            event_type_count: registry.subscriptions.len(),
            active_event_types: registry.subscriptions.keys().copied().collect(),
            subscribers_per_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::connection::ConnectionError;
    use notify_wire::UserJoinedPayload;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeConnection {
        id: String,
        open: AtomicBool,
        received: StdMutex<Vec<String>>,
    }

    impl FakeConnection {
        fn new(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                open: AtomicBool::new(true),
                received: StdMutex::new(Vec::new()),
            })
        }

        fn messages(&self) -> Vec<String> { self.received.lock().unwrap().clone() }
    }

    #[async_trait::async_trait]
    impl Connection for FakeConnection {
        fn id(&self) -> &str { &self.id }

        fn is_open(&self) -> bool { self.open.load(Ordering::SeqCst) }

        async fn send(&self, message: &str) -> Result<(), ConnectionError> {
            self.received.lock().unwrap().push(message.to_string());
            Ok(())
        }

        async fn close(&self) { self.open.store(false, Ordering::SeqCst); }
    }

    fn user_joined_event() -> NotificationEvent {
        NotificationEvent::new(EventData::UserJoined(UserJoinedPayload {
            user_id: "u1".into(),
            handle: "nazmul".into(),
        }))
    }

    #[tokio::test]
    async fn subscribe_then_broadcast_delivers_to_the_subscriber() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;

        let outcome = broker
            .subscribe(&conn.id, &[SubscribeRequest::Simple("user.joined".to_string())])
            .await
            .unwrap();
        assert_eq!(outcome.success, vec![EventType::UserJoined]);
        assert!(outcome.failed.is_empty());

        broker.broadcast(&user_joined_event()).await;
        assert_eq!(conn.messages().len(), 1);
    }

    #[tokio::test]
    async fn unsubscribed_event_type_reaches_nobody() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker.broadcast(&user_joined_event()).await;
        assert!(conn.messages().is_empty());
    }

    #[tokio::test]
    async fn invalid_event_type_string_is_reported_as_failed() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        let outcome = broker
            .subscribe(&conn.id, &[SubscribeRequest::Simple("not.a.type".to_string())])
            .await
            .unwrap();
        assert!(outcome.success.is_empty());
        assert_eq!(outcome.failed, vec!["not.a.type".to_string()]);
    }

    #[tokio::test]
    async fn filter_field_outside_registry_is_reported_as_failed() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        let request = SubscribeRequest::Filtered {
            event_type: "message.new".to_string(),
            filter: Some(std::collections::HashMap::from([("bogus".to_string(), serde_json::json!("x"))])),
        };
        let outcome = broker.subscribe(&conn.id, &[request]).await.unwrap();
        assert!(outcome.success.is_empty());
        assert_eq!(outcome.failed, vec!["message.new".to_string()]);
    }

    #[tokio::test]
    async fn filter_isolates_subscribers_by_payload_field() {
        let broker = NotificationBroker::new();
        let conn_a = FakeConnection::new("a");
        let conn_b = FakeConnection::new("b");
        broker.register_client(conn_a.clone(), None).await;
        broker.register_client(conn_b.clone(), None).await;

        let request_for_base_1 = SubscribeRequest::Filtered {
            event_type: "message.new".to_string(),
            filter: Some(std::collections::HashMap::from([(
                "messageBaseId".to_string(),
                serde_json::json!("base-1"),
            )])),
        };
        broker.subscribe(&conn_a.id, &[request_for_base_1]).await.unwrap();
        broker
            .subscribe(&conn_b.id, &[SubscribeRequest::Simple("message.new".to_string())])
            .await
            .unwrap();

        let event = NotificationEvent::new(EventData::MessageNew(notify_wire::MessageNewPayload {
            message_id: "m1".into(),
            message_base_id: "base-2".into(),
            message_base_name: "Off-Topic".into(),
            subject: "hi".into(),
            author_handle: "x".into(),
            created_at: chrono::Utc::now(),
        }));
        broker.broadcast(&event).await;

        assert!(conn_a.messages().is_empty());
        assert_eq!(conn_b.messages().len(), 1);
    }

    #[tokio::test]
    async fn subscription_cap_rejects_the_whole_batch() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        let requests: Vec<SubscribeRequest> = (0..60)
            .map(|_| SubscribeRequest::Simple("user.joined".to_string()))
            .collect();
        let outcome = broker.subscribe(&conn.id, &requests).await.unwrap();
        assert!(outcome.success.is_empty());
        assert_eq!(outcome.failed.len(), 60);
    }

    #[tokio::test]
    async fn unsubscribe_removes_from_both_indices() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker
            .subscribe(&conn.id, &[SubscribeRequest::Simple("user.joined".to_string())])
            .await
            .unwrap();
        broker.unsubscribe(&conn.id, &[EventType::UserJoined]).await;
        broker.broadcast(&user_joined_event()).await;
        assert!(conn.messages().is_empty());
        let stats = broker.stats().await;
        assert_eq!(stats.total_subscriptions, 0);
    }

    #[tokio::test]
    async fn unregister_is_idempotent_and_cleans_up_subscriptions() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker
            .subscribe(&conn.id, &[SubscribeRequest::Simple("user.joined".to_string())])
            .await
            .unwrap();
        broker.unregister_client(&conn.id).await;
        broker.unregister_client(&conn.id).await;
        let stats = broker.stats().await;
        assert_eq!(stats.client_count, 0);
        assert_eq!(stats.total_subscriptions, 0);
    }

    #[tokio::test]
    async fn broadcast_to_authenticated_bypasses_subscriptions() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker.authenticate_client(&conn.id, "u1").await;
        broker.broadcast_to_authenticated(&user_joined_event()).await;
        assert_eq!(conn.messages().len(), 1);
    }

    #[tokio::test]
    async fn closed_connections_are_skipped() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker
            .subscribe(&conn.id, &[SubscribeRequest::Simple("user.joined".to_string())])
            .await
            .unwrap();
        conn.close().await;
        broker.broadcast(&user_joined_event()).await;
        assert!(conn.messages().is_empty());
    }

    #[tokio::test]
    async fn send_error_reaches_only_the_named_client() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker
            .send_error(&conn.id, ErrorCode::InvalidEventType, "bad type", None)
            .await;
        assert_eq!(conn.messages().len(), 1);
        assert!(conn.messages()[0].contains("INVALID_EVENT_TYPE"));
    }

    #[tokio::test]
    async fn stats_reflect_registered_and_subscribed_clients() {
        let broker = NotificationBroker::new();
        let conn = FakeConnection::new("c1");
        broker.register_client(conn.clone(), None).await;
        broker.authenticate_client(&conn.id, "u1").await;
        broker
            .subscribe(&conn.id, &[SubscribeRequest::Simple("user.joined".to_string())])
            .await
            .unwrap();
        let stats = broker.stats().await;
        assert_eq!(stats.client_count, 1);
        assert_eq!(stats.authenticated_count, 1);
        assert_eq!(stats.total_subscriptions, 1);
        assert_eq!(stats.event_type_count, 1);
        assert!(stats.active_event_types.contains(&EventType::UserJoined));
    }
}
