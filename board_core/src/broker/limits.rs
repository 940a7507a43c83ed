// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Rate-limit defaults (spec §5 "Rate limits (recommended defaults, not
//! hard cores)"). Implemented as fixed 60-second windows per `DESIGN.md`'s
//! Open Question decision.

use chrono::{DateTime, Utc};

pub const PER_CLIENT_SUBSCRIPTION_CAP: usize = 50;
pub const SUBSCRIBE_REQUESTS_PER_MINUTE: u32 = 10;
pub const EVENTS_PER_CLIENT_PER_MINUTE: u32 = 100;
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;
pub const CLIENT_IDLE_TIMEOUT_SECS: u64 = 60;

/// A fixed 60-second counting window.
#[derive(Debug, Clone, Copy)]
pub struct RateWindow {
    window_start: DateTime<Utc>,
    count: u32,
}

impl RateWindow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            window_start: Utc::now(),
            count: 0,
        }
    }

    /// Consumes one unit of budget against `limit`; returns whether the
    /// call is allowed. Resets the window once 60 seconds have elapsed
    /// since it opened.
    pub fn tick(&mut self, limit: u32) -> bool {
        let now = Utc::now();
        if now.signed_duration_since(self.window_start) >= chrono::Duration::seconds(60) {
            self.window_start = now;
            self.count = 0;
        }
        if self.count >= limit {
            false
        } else {
            self.count += 1;
            true
        }
    }
}

impl Default for RateWindow {
    fn default() -> Self { Self::new() }
}
