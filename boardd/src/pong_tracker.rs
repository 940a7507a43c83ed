// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracks each client's most recent `pong` so the heartbeat task can
//! disconnect clients that miss two consecutive intervals (spec's
//! Supplemented Features: "disconnecting clients that don't `pong`
//! within two intervals").

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::warn;

use board_core::broker::{Connection, NotificationBroker};

struct Entry {
    connection: Arc<dyn Connection>,
    last_pong: Instant,
}

#[derive(Default)]
pub struct PongTracker {
    entries: Mutex<HashMap<String, Entry>>,
}

impl PongTracker {
    pub async fn register(&self, client_id: &str, connection: Arc<dyn Connection>) {
        self.entries.lock().await.insert(
            client_id.to_string(),
            Entry { connection, last_pong: Instant::now() },
        );
    }

    pub async fn touch(&self, client_id: &str) {
        if let Some(entry) = self.entries.lock().await.get_mut(client_id) {
            entry.last_pong = Instant::now();
        }
    }

    pub async fn remove(&self, client_id: &str) { self.entries.lock().await.remove(client_id); }

    /// Closes and unregisters every client whose last `pong` is older
    /// than `grace` (two heartbeat intervals, per the caller).
    pub async fn disconnect_stale(&self, grace: Duration, broker: &NotificationBroker) {
        let stale: Vec<(String, Arc<dyn Connection>)> = {
            let entries = self.entries.lock().await;
            let now = Instant::now();
            entries
                .iter()
                .filter(|(_, entry)| now.duration_since(entry.last_pong) > grace)
                .map(|(id, entry)| (id.clone(), entry.connection.clone()))
                .collect()
        };

        for (id, connection) in stale {
            warn!(client_id = %id, "client missed heartbeat window, disconnecting");
            connection.close().await;
            broker.unregister_client(&id).await;
            self.remove(&id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::broker::ConnectionError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeConnection {
        open: AtomicBool,
    }

    #[async_trait::async_trait]
    impl Connection for FakeConnection {
        fn id(&self) -> &str { "fake" }

        fn is_open(&self) -> bool { self.open.load(Ordering::SeqCst) }

        async fn send(&self, _message: &str) -> Result<(), ConnectionError> { Ok(()) }

        async fn close(&self) { self.open.store(false, Ordering::SeqCst); }
    }

    fn fake() -> Arc<FakeConnection> { Arc::new(FakeConnection { open: AtomicBool::new(true) }) }

    #[tokio::test]
    async fn a_client_within_grace_is_left_alone() {
        let tracker = PongTracker::default();
        let broker = NotificationBroker::new();
        let conn = fake();
        broker.register_client(conn.clone(), None).await;
        tracker.register("c1", conn.clone()).await;

        tracker.disconnect_stale(Duration::from_secs(60), &broker).await;

        assert!(conn.is_open());
        assert_eq!(broker.stats().await.client_count, 1);
    }

    #[tokio::test]
    async fn a_stale_client_is_closed_and_unregistered() {
        let tracker = PongTracker::default();
        let broker = NotificationBroker::new();
        let conn = fake();
        broker.register_client(conn.clone(), None).await;
        tracker.register("c1", conn.clone()).await;

        tracker.disconnect_stale(Duration::from_millis(0), &broker).await;

        assert!(!conn.is_open());
        assert_eq!(broker.stats().await.client_count, 0);
    }

    #[tokio::test]
    async fn touch_resets_the_grace_window() {
        let tracker = PongTracker::default();
        let broker = NotificationBroker::new();
        let conn = fake();
        broker.register_client(conn.clone(), None).await;
        tracker.register("c1", conn.clone()).await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        tracker.touch("c1").await;
        tracker.disconnect_stale(Duration::from_millis(10), &broker).await;

        assert!(conn.is_open());
        assert_eq!(broker.stats().await.client_count, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let tracker = PongTracker::default();
        tracker.register("c1", fake()).await;
        tracker.remove("c1").await;
        tracker.remove("c1").await;
    }
}
