// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End-to-end scenarios over the notification broker and door manager
//! (spec §8 properties 10-15, scenarios A/B/F).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;

use board_core::broker::{Connection, ConnectionError, NotificationBroker};
use board_core::door::{Door, DoorManager, DoorSessionRecord, DoorSessionRepository, EnterOutcome, StepOutcome, TurnOutcome};
use notify_wire::{EventData, MessageNewPayload, NotificationEvent, SubscribeRequest};

struct RecordingConnection {
    id: String,
    open: AtomicBool,
    inbox: StdMutex<Vec<String>>,
}

impl RecordingConnection {
    fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            open: AtomicBool::new(true),
            inbox: StdMutex::new(Vec::new()),
        })
    }

    fn received(&self) -> Vec<String> { self.inbox.lock().unwrap().clone() }
}

#[async_trait]
impl Connection for RecordingConnection {
    fn id(&self) -> &str { &self.id }

    fn is_open(&self) -> bool { self.open.load(Ordering::SeqCst) }

    async fn send(&self, message: &str) -> Result<(), ConnectionError> {
        self.inbox.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn close(&self) { self.open.store(false, Ordering::SeqCst); }
}

fn message_event(base_id: &str) -> NotificationEvent {
    NotificationEvent::new(EventData::MessageNew(MessageNewPayload {
        message_id: "m1".into(),
        message_base_id: base_id.into(),
        message_base_name: "General".into(),
        subject: "hello".into(),
        author_handle: "alice".into(),
        created_at: Utc::now(),
    }))
}

/// Property 10/11: two clients subscribed to the same event type but with
/// different filters are isolated from each other by filter, and a client
/// with no subscription receives nothing.
#[tokio::test]
async fn subscription_filters_isolate_delivery_per_client() {
    let broker = NotificationBroker::new();

    let sub_a = RecordingConnection::new("a");
    let sub_b = RecordingConnection::new("b");
    let unsubscribed = RecordingConnection::new("c");
    broker.register_client(sub_a.clone(), None).await;
    broker.register_client(sub_b.clone(), None).await;
    broker.register_client(unsubscribed.clone(), None).await;

    broker
        .subscribe(
            "a",
            &[SubscribeRequest::Filtered {
                event_type: "message.new".into(),
                filter: Some(HashMap::from([("messageBaseId".to_string(), serde_json::json!("general"))])),
            }],
        )
        .await
        .unwrap();
    broker
        .subscribe(
            "b",
            &[SubscribeRequest::Filtered {
                event_type: "message.new".into(),
                filter: Some(HashMap::from([("messageBaseId".to_string(), serde_json::json!("offtopic"))])),
            }],
        )
        .await
        .unwrap();

    broker.broadcast(&message_event("general")).await;

    assert_eq!(sub_a.received().len(), 1);
    assert!(sub_b.received().is_empty());
    assert!(unsubscribed.received().is_empty());
}

/// Property 11: a filter referencing a field outside the event type's
/// registry is rejected at subscribe time, not silently ignored.
#[tokio::test]
async fn subscribe_rejects_filters_outside_the_field_registry() {
    let broker = NotificationBroker::new();
    let conn = RecordingConnection::new("a");
    broker.register_client(conn.clone(), None).await;

    let outcome = broker
        .subscribe(
            "a",
            &[SubscribeRequest::Filtered {
                event_type: "message.new".into(),
                filter: Some(HashMap::from([("bogus".to_string(), serde_json::json!("x"))])),
            }],
        )
        .await
        .unwrap();

    assert!(outcome.success.is_empty());
    assert_eq!(outcome.failed, vec!["message.new".to_string()]);
}

/// Property 10 variant: a disconnected (closed) connection is skipped by
/// delivery rather than erroring the whole broadcast.
#[tokio::test]
async fn closed_connections_are_skipped_without_failing_the_broadcast() {
    let broker = NotificationBroker::new();
    let closed = RecordingConnection::new("closed");
    let open = RecordingConnection::new("open");
    broker.register_client(closed.clone(), None).await;
    broker.register_client(open.clone(), None).await;
    broker
        .subscribe("closed", &[SubscribeRequest::Simple("user.joined".into())])
        .await
        .unwrap();
    broker
        .subscribe("open", &[SubscribeRequest::Simple("user.joined".into())])
        .await
        .unwrap();
    closed.close().await;

    let event = NotificationEvent::new(EventData::UserJoined(notify_wire::UserJoinedPayload {
        user_id: "u1".into(),
        handle: "bob".into(),
    }));
    broker.broadcast(&event).await;

    assert!(closed.received().is_empty());
    assert_eq!(open.received().len(), 1);
}

/// `broadcastToAuthenticated` only reaches clients that have authenticated
/// (spec §4.J), regardless of subscription state.
#[tokio::test]
async fn broadcast_to_authenticated_skips_unauthenticated_clients() {
    let broker = NotificationBroker::new();
    let authed = RecordingConnection::new("authed");
    let anon = RecordingConnection::new("anon");
    broker.register_client(authed.clone(), None).await;
    broker.register_client(anon.clone(), None).await;
    broker.authenticate_client("authed", "user-1").await;

    let event = NotificationEvent::new(EventData::SystemAnnouncement(
        notify_wire::SystemAnnouncementPayload { message: "maintenance soon".into() },
    ));
    broker.broadcast_to_authenticated(&event).await;

    assert_eq!(authed.received().len(), 1);
    assert!(anon.received().is_empty());
}

/// `broadcastToAll` (heartbeat's delivery path) reaches every registered
/// client, authenticated or not, subscribed or not.
#[tokio::test]
async fn broadcast_to_all_reaches_every_registered_client() {
    let broker = NotificationBroker::new();
    let one = RecordingConnection::new("one");
    let two = RecordingConnection::new("two");
    broker.register_client(one.clone(), None).await;
    broker.register_client(two.clone(), None).await;

    let event = NotificationEvent::new(EventData::Heartbeat(Default::default()));
    broker.broadcast_to_all(&event).await;

    assert_eq!(one.received().len(), 1);
    assert_eq!(two.received().len(), 1);
}

struct EchoDoor;

#[async_trait]
impl Door for EchoDoor {
    fn id(&self) -> &str { "echo" }

    async fn introduce(&self) -> (serde_json::Value, String) {
        (serde_json::json!({"turns": 0}), "Welcome to Echo.".to_string())
    }

    async fn turn(&self, state: &mut serde_json::Value, input: &str) -> Result<TurnOutcome, String> {
        if input == "quit" {
            return Ok(TurnOutcome::exiting("Goodbye."));
        }
        let turns = state["turns"].as_i64().unwrap_or(0) + 1;
        state["turns"] = serde_json::json!(turns);
        Ok(TurnOutcome::continuing(format!("echo: {input}")))
    }
}

#[derive(Default)]
struct InMemoryRepo {
    records: StdMutex<HashMap<String, DoorSessionRecord>>,
}

#[async_trait]
impl DoorSessionRepository for InMemoryRepo {
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

    async fn delete(&self, session_id: &str) { self.records.lock().unwrap().remove(session_id); }
}

/// Scenario F (spec §8): one user holds two sessions in two different
/// doors simultaneously without interference, while a second user can
/// hold their own independent session in the same door as the first.
#[tokio::test]
async fn concurrent_sessions_across_users_and_doors_do_not_interfere() {
    let repo = Arc::new(InMemoryRepo::default());
    let mut mgr = DoorManager::new(repo, std::time::Duration::from_secs(60));
    mgr.register_door(Arc::new(EchoDoor));
    let mgr = Arc::new(mgr);

    let alice = mgr.enter("alice", "echo").await.unwrap();
    let bob = mgr.enter("bob", "echo").await.unwrap();
    assert_ne!(alice.session_id(), bob.session_id());

    let alice_step = mgr.step(alice.session_id(), "hi").await.unwrap();
    let bob_step = mgr.step(bob.session_id(), "yo").await.unwrap();
    assert_eq!(alice_step, StepOutcome::Continuing { output: "echo: hi".to_string() });
    assert_eq!(bob_step, StepOutcome::Continuing { output: "echo: yo".to_string() });

    // Single-occupancy still holds per (user, door) pair (property 13).
    let err = mgr.enter("alice", "echo").await.unwrap_err();
    assert_eq!(err, board_core::door::DoorError::AlreadyInSession);

    // Disconnect-then-resume round trip (property 14).
    mgr.disconnect(alice.session_id()).await.unwrap();
    let resumed = mgr.enter("alice", "echo").await.unwrap();
    assert!(matches!(resumed, EnterOutcome::Resumed { .. }));
}
