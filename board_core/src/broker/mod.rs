// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Notification broker (spec §4.J / component J).

#[allow(clippy::module_inception)]
mod broker;
pub mod connection;
pub mod error;
pub mod limits;
mod registry;
pub mod stats;

pub use broker::{NotificationBroker, SubscribeOutcome};
pub use connection::{Connection, ConnectionError};
pub use error::NotificationError;
pub use limits::{
    RateWindow, CLIENT_IDLE_TIMEOUT_SECS, EVENTS_PER_CLIENT_PER_MINUTE, HEARTBEAT_INTERVAL_SECS,
    PER_CLIENT_SUBSCRIPTION_CAP, SUBSCRIBE_REQUESTS_PER_MINUTE,
};
pub use stats::BrokerStats;
