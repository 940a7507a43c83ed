// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The TCP line-oriented listener (spec's Supplemented Features: "a thin
//! process entry point... behind a minimal TCP line-oriented listener").
//! Each accepted connection owns its own cooperative task (spec §5
//! "Execution model") that reads newline-delimited JSON commands, drives
//! the board's subsystems, and writes JSON events back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use board_core::ai::AiFacade;
use board_core::broker::{Connection, NotificationBroker};
use board_core::door::DoorManager;
use board_core::sysop::AiSysOp;
use notify_wire::{
    AuthSuccessPayload, DoorEnteredPayload, DoorExitedPayload, DoorUpdatePayload, ErrorCode,
    EventData, EventType, NotificationEvent, SubscribeRequest, SubscriptionErrorPayload,
    SubscriptionSuccessPayload, SystemAnnouncementPayload,
};

use crate::collaborators::TcpConnection;
use crate::pong_tracker::PongTracker;

/// The bbs-specific client-to-server protocol (spec §6.1's four notify
/// actions, plus the door/SysOp actions this demo server adds on top).
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum IncomingMessage {
    Authenticate { token: String },
    Subscribe { events: Vec<SubscribeRequest> },
    Unsubscribe { events: Vec<String> },
    Pong,
    Enter {
        #[serde(rename = "doorId")]
        door_id: String,
    },
    Step { input: String },
    Exit,
    Page { prompt: String },
}

/// Everything a connection task needs to serve one client (spec §5:
/// "each connection owns its own cooperative task").
pub struct BoardServices {
    pub broker: Arc<NotificationBroker>,
    pub door_manager: Arc<DoorManager>,
    pub ai_sysop: Arc<AiSysOp>,
    pub ai_facade: Arc<AiFacade>,
    pub pong_tracker: Arc<PongTracker>,
}

/// Per-connection state mutated only by that connection's own task, so it
/// needs no synchronization (spec §5 item 2 is about door session state,
/// not this bookkeeping).
#[derive(Default)]
struct ClientState {
    user_id: Option<String>,
    active_session_id: Option<String>,
    active_door_id: Option<String>,
}

/// Runs the accept loop until the listener is closed. Spawns one task per
/// connection; never returns under normal operation.
pub async fn run(listener: TcpListener, services: Arc<BoardServices>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let services = services.clone();
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, services).await {
                warn!(%peer, error = %err, "connection task ended with an error");
            }
        });
    }
}

async fn serve_connection(stream: tokio::net::TcpStream, services: Arc<BoardServices>) -> std::io::Result<()> {
    let peer = stream.peer_addr()?;
    let client_id = peer.to_string();
    let (read_half, write_half) = stream.into_split();

    let open = Arc::new(AtomicBool::new(true));
    let connection: Arc<dyn Connection> = Arc::new(TcpConnection::new(client_id.clone(), write_half, open.clone()));

    services.broker.register_client(connection.clone(), None).await;
    services.pong_tracker.register(&client_id, connection.clone()).await;
    info!(client_id = %client_id, "client connected");

    let state = Mutex::new(ClientState::default());
    let mut lines = BufReader::new(read_half).lines();

    let result = async {
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<IncomingMessage>(&line) {
                Ok(message) => handle_message(&client_id, message, &services, &state).await,
                Err(err) => {
                    debug!(client_id = %client_id, error = %err, "malformed client message");
                    services
                        .broker
                        .send_error(&client_id, ErrorCode::InternalError, format!("malformed message: {err}"), None)
                        .await;
                }
            }
        }
        Ok::<(), std::io::Error>(())
    }
    .await;

    open.store(false, Ordering::Release);
    services.broker.unregister_client(&client_id).await;
    services.pong_tracker.remove(&client_id).await;
    if let Some(session_id) = state.into_inner().active_session_id {
        let _ = services.door_manager.disconnect(&session_id).await;
    }
    info!(client_id = %client_id, "client disconnected");
    result
}

async fn handle_message(
    client_id: &str,
    message: IncomingMessage,
    services: &BoardServices,
    state: &Mutex<ClientState>,
) {
    match message {
        IncomingMessage::Authenticate { token } => handle_authenticate(client_id, token, services, state).await,
        IncomingMessage::Subscribe { events } => handle_subscribe(client_id, &events, services).await,
        IncomingMessage::Unsubscribe { events } => handle_unsubscribe(client_id, &events, services).await,
        IncomingMessage::Pong => {
            services.pong_tracker.touch(client_id).await;
            debug!(client_id, "received pong");
        }
        IncomingMessage::Enter { door_id } => handle_enter(client_id, &door_id, services, state).await,
        IncomingMessage::Step { input } => handle_step(client_id, &input, services, state).await,
        IncomingMessage::Exit => handle_exit(client_id, services, state).await,
        IncomingMessage::Page { prompt } => handle_page(client_id, &prompt, services, state).await,
    }
}

/// A pre-validated `userId` passthrough (spec's Supplemented Features:
/// "accepts a pre-validated `userId` on its authenticate action rather
/// than verifying a real JWT").
async fn handle_authenticate(client_id: &str, token: String, services: &BoardServices, state: &Mutex<ClientState>) {
    if token.trim().is_empty() {
        services
            .broker
            .send_error(client_id, ErrorCode::AuthenticationRequired, "empty token", None)
            .await;
        return;
    }
    let user_id = token;
    services.broker.authenticate_client(client_id, user_id.clone()).await;
    state.lock().await.user_id = Some(user_id.clone());

    let event = NotificationEvent::new(EventData::AuthSuccess(AuthSuccessPayload {
        handle: user_id.clone(),
        user_id,
    }));
    services.broker.broadcast_to_client(client_id, &event).await;
}

async fn handle_subscribe(client_id: &str, events: &[SubscribeRequest], services: &BoardServices) {
    match services.broker.subscribe(client_id, events).await {
        Ok(outcome) => {
            if !outcome.success.is_empty() {
                let event = NotificationEvent::new(EventData::SubscriptionSuccess(SubscriptionSuccessPayload {
                    events: outcome.success.iter().map(std::string::ToString::to_string).collect(),
                }));
                services.broker.broadcast_to_client(client_id, &event).await;
            }
            if !outcome.failed.is_empty() {
                let event = NotificationEvent::new(EventData::SubscriptionError(SubscriptionErrorPayload {
                    error: "one or more event types were rejected".to_string(),
                    failed_events: outcome.failed,
                }));
                services.broker.broadcast_to_client(client_id, &event).await;
            }
        }
        Err(err) => {
            services
                .broker
                .send_error(client_id, ErrorCode::SubscriptionError, err.to_string(), None)
                .await;
        }
    }
}

async fn handle_unsubscribe(client_id: &str, events: &[String], services: &BoardServices) {
    let types: Vec<EventType> = events.iter().filter_map(|s| EventType::parse(s)).collect();
    services.broker.unsubscribe(client_id, &types).await;
}

async fn handle_enter(client_id: &str, door_id: &str, services: &BoardServices, state: &Mutex<ClientState>) {
    let user_id = {
        let guard = state.lock().await;
        guard.user_id.clone()
    };
    let Some(user_id) = user_id else {
        services
            .broker
            .send_error(client_id, ErrorCode::AuthenticationRequired, "authenticate before entering a door", None)
            .await;
        return;
    };

    match services.door_manager.enter(&user_id, door_id).await {
        Ok(outcome) => {
            {
                let mut guard = state.lock().await;
                guard.active_session_id = Some(outcome.session_id().to_string());
                guard.active_door_id = Some(door_id.to_string());
            }
            let entered = NotificationEvent::new(EventData::DoorEntered(DoorEnteredPayload {
                user_id: user_id.clone(),
                handle: user_id,
                door_id: door_id.to_string(),
                door_name: door_id.to_string(),
            }));
            services.broker.broadcast_to_client(client_id, &entered).await;

            let update = NotificationEvent::new(EventData::DoorUpdate(DoorUpdatePayload {
                session_id: outcome.session_id().to_string(),
                door_id: door_id.to_string(),
                state: serde_json::json!({ "banner": outcome.banner() }),
            }));
            services.broker.broadcast_to_client(client_id, &update).await;
        }
        Err(err) => {
            services
                .broker
                .send_error(client_id, ErrorCode::InternalError, err.to_string(), None)
                .await;
        }
    }
}

async fn handle_step(client_id: &str, input: &str, services: &BoardServices, state: &Mutex<ClientState>) {
    let (session_id, door_id) = {
        let guard = state.lock().await;
        (guard.active_session_id.clone(), guard.active_door_id.clone())
    };
    let (Some(session_id), Some(door_id)) = (session_id, door_id) else {
        services
            .broker
            .send_error(client_id, ErrorCode::InternalError, "no active door session", None)
            .await;
        return;
    };

    match services.door_manager.step(&session_id, input).await {
        Ok(board_core::door::StepOutcome::Continuing { output }) => {
            let event = NotificationEvent::new(EventData::DoorUpdate(DoorUpdatePayload {
                session_id,
                door_id,
                state: serde_json::json!({ "output": output }),
            }));
            services.broker.broadcast_to_client(client_id, &event).await;
        }
        Ok(board_core::door::StepOutcome::Terminated { output }) => {
            let update = NotificationEvent::new(EventData::DoorUpdate(DoorUpdatePayload {
                session_id: session_id.clone(),
                door_id: door_id.clone(),
                state: serde_json::json!({ "output": output }),
            }));
            services.broker.broadcast_to_client(client_id, &update).await;

            let user_id = state.lock().await.user_id.clone().unwrap_or_default();
            let exited = NotificationEvent::new(EventData::DoorExited(DoorExitedPayload {
                user_id: user_id.clone(),
                handle: user_id,
                door_id: door_id.clone(),
                door_name: door_id,
            }));
            services.broker.broadcast_to_client(client_id, &exited).await;

            let mut guard = state.lock().await;
            guard.active_session_id = None;
            guard.active_door_id = None;
        }
        Err(err) => {
            let mut guard = state.lock().await;
            guard.active_session_id = None;
            guard.active_door_id = None;
            drop(guard);
            services
                .broker
                .send_error(client_id, ErrorCode::InternalError, err.to_string(), None)
                .await;
        }
    }
}

async fn handle_exit(client_id: &str, services: &BoardServices, state: &Mutex<ClientState>) {
    let (session_id, door_id, user_id) = {
        let guard = state.lock().await;
        (guard.active_session_id.clone(), guard.active_door_id.clone(), guard.user_id.clone())
    };
    let Some(session_id) = session_id else { return };

    if let Err(err) = services.door_manager.exit(&session_id).await {
        services
            .broker
            .send_error(client_id, ErrorCode::InternalError, err.to_string(), None)
            .await;
        return;
    }

    let door_id = door_id.unwrap_or_default();
    let user_id = user_id.unwrap_or_default();
    let exited = NotificationEvent::new(EventData::DoorExited(DoorExitedPayload {
        user_id: user_id.clone(),
        handle: user_id,
        door_id: door_id.clone(),
        door_name: door_id,
    }));
    services.broker.broadcast_to_client(client_id, &exited).await;

    let mut guard = state.lock().await;
    guard.active_session_id = None;
    guard.active_door_id = None;
}

async fn handle_page(client_id: &str, prompt: &str, services: &BoardServices, state: &Mutex<ClientState>) {
    let authenticated = state.lock().await.user_id.is_some();
    if !authenticated {
        services
            .broker
            .send_error(client_id, ErrorCode::AuthenticationRequired, "authenticate before paging the SysOp", None)
            .await;
        return;
    }

    let reply = services.ai_sysop.page(prompt).await;
    let event = NotificationEvent::new(EventData::SystemAnnouncement(SystemAnnouncementPayload { message: reply }));
    services.broker.broadcast_to_client(client_id, &event).await;
}
