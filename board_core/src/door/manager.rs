// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Door session manager (spec §4.G / component G).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::door::door_trait::Door;
use crate::door::error::DoorError;
use crate::door::repository::DoorSessionRepository;
use crate::door::session::DoorSessionRecord;

/// What happened on an `enter` call (spec §4.G: fresh vs. resumed).
#[derive(Debug, Clone, PartialEq)]
pub enum EnterOutcome {
    Fresh { session_id: String, banner: String },
    Resumed { session_id: String, banner: String },
}

impl EnterOutcome {
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            EnterOutcome::Fresh { session_id, .. } | EnterOutcome::Resumed { session_id, .. } => session_id,
        }
    }

    #[must_use]
    pub fn banner(&self) -> &str {
        match self {
            EnterOutcome::Fresh { banner, .. } | EnterOutcome::Resumed { banner, .. } => banner,
        }
    }
}

/// `step` either keeps the session active or reports that the door
/// terminated it (spec §4.G state machine).
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Continuing { output: String },
    Terminated { output: String },
}

/// Per-session state kept in memory while a session is `ACTIVE` (spec §5.2:
/// "a single session is mutated only by one input call at a time").
struct ActiveSession {
    user_id: String,
    door_id: String,
    state: serde_json::Value,
    last_activity_at: chrono::DateTime<Utc>,
}

/// Enter, step, exit, resume-on-reconnect, idle timeout, single-occupancy
/// (spec §4.G). Access to the session map is serialized by one async
/// mutex, held for the duration of each mutating operation including the
/// door's turn function, per spec §5 item 2.
pub struct DoorManager {
    doors: HashMap<String, Arc<dyn Door>>,
    repository: Arc<dyn DoorSessionRepository>,
    sessions: Mutex<HashMap<String, ActiveSession>>,
    idle_timeout: Duration,
}

fn session_id_for(user_id: &str, door_id: &str) -> String { format!("{door_id}:{user_id}") }

impl DoorManager {
    #[must_use]
    pub fn new(repository: Arc<dyn DoorSessionRepository>, idle_timeout: Duration) -> Self {
        Self {
            doors: HashMap::new(),
            repository,
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn register_door(&mut self, door: Arc<dyn Door>) { self.doors.insert(door.id().to_string(), door); }

    fn door(&self, door_id: &str) -> Result<&Arc<dyn Door>, DoorError> {
        self.doors.get(door_id).ok_or_else(|| DoorError::UnknownDoor(door_id.to_string()))
    }

    /// `enter` (spec §4.G). Rejects a second concurrent entry into the same
    /// (user, door) with `AlreadyInSession`; restores a `SAVED` session if
    /// the repository has one; otherwise starts fresh via the door's
    /// introduction routine.
    pub async fn enter(&self, user_id: &str, door_id: &str) -> Result<EnterOutcome, DoorError> {
        let door = self.door(door_id)?.clone();
        let session_id = session_id_for(user_id, door_id);
        let mut sessions = self.sessions.lock().await;

        if sessions.contains_key(&session_id) {
            return Err(DoorError::AlreadyInSession);
        }

        if let Some(record) = self.repository.load_by_user_and_door(user_id, door_id).await {
            let banner = door.resume_banner(&record.state);
            sessions.insert(
                session_id.clone(),
                ActiveSession {
                    user_id: record.user_id,
                    door_id: record.door_id,
                    state: record.state,
                    last_activity_at: Utc::now(),
                },
            );
            info!(%session_id, "resumed door session");
            return Ok(EnterOutcome::Resumed { session_id, banner });
        }

        let (state, banner) = door.introduce().await;
        sessions.insert(
            session_id.clone(),
            ActiveSession {
                user_id: user_id.to_string(),
                door_id: door_id.to_string(),
                state,
                last_activity_at: Utc::now(),
            },
        );
        info!(%session_id, "started fresh door session");
        Ok(EnterOutcome::Fresh { session_id, banner })
    }

    /// `step` (spec §4.G): evaluates the idle timeout lazily, then runs the
    /// door's turn function. `TERMINATED` deletes any persisted save.
    pub async fn step(&self, session_id: &str, input: &str) -> Result<StepOutcome, DoorError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(session_id).ok_or(DoorError::NoSession)?;

        let idle_for = Utc::now().signed_duration_since(session.last_activity_at);
        if idle_for.to_std().unwrap_or(Duration::ZERO) > self.idle_timeout {
            let door_id = session.door_id.clone();
            sessions.remove(session_id);
            drop(sessions);
            self.repository.delete(session_id).await;
            warn!(%session_id, %door_id, "door session timed out");
            return Err(DoorError::Timeout);
        }

        let door = self.door(&session.door_id)?.clone();
        let outcome = door
            .turn(&mut session.state, input)
            .await
            .map_err(DoorError::DoorFailure)?;
        session.last_activity_at = Utc::now();

        if outcome.exit {
            sessions.remove(session_id);
            drop(sessions);
            self.repository.delete(session_id).await;
            return Ok(StepOutcome::Terminated { output: outcome.output });
        }

        Ok(StepOutcome::Continuing { output: outcome.output })
    }

    /// Explicit exit (spec §4.G): terminates and deletes any persisted
    /// save. Persistence across explicit exit is prohibited.
    pub async fn exit(&self, session_id: &str) -> Result<(), DoorError> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id).ok_or(DoorError::NoSession)?;
        drop(sessions);
        self.repository.delete(session_id).await;
        Ok(())
    }

    /// Disconnect (spec §4.G): persists the session externally with its
    /// current state rather than terminating it.
    pub async fn disconnect(&self, session_id: &str) -> Result<(), DoorError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.remove(session_id).ok_or(DoorError::NoSession)?;
        drop(sessions);
        self.repository
            .save(
                session_id,
                DoorSessionRecord {
                    session_id: session_id.to_string(),
                    user_id: session.user_id,
                    door_id: session.door_id,
                    state: session.state,
                    last_activity_at: session.last_activity_at,
                },
            )
            .await;
        Ok(())
    }
}
