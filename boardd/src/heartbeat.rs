// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The broker's recommended 30-second heartbeat (spec §5), run as a
//! background `tokio::time::interval` task owned by `boardd` (spec's
//! Supplemented Features). Clients that miss two consecutive intervals
//! without replying `pong` are disconnected.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use board_core::broker::NotificationBroker;
use notify_wire::{EventData, HeartbeatPayload, NotificationEvent};

use crate::pong_tracker::PongTracker;

/// Sends a `heartbeat` event to every connected client on a fixed
/// interval, forever, and disconnects clients that haven't replied
/// `pong` within two intervals. Intended to be spawned as its own task.
pub async fn run(broker: Arc<NotificationBroker>, pong_tracker: Arc<PongTracker>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let event = NotificationEvent::new(EventData::Heartbeat(HeartbeatPayload::default()));
        broker.broadcast_to_all(&event).await;
        pong_tracker.disconnect_stale(interval * 2, &broker).await;
        debug!("sent heartbeat to all connected clients");
    }
}
