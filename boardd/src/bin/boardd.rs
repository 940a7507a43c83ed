// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Process entry point: parses CLI flags, loads layered configuration,
//! installs the `tracing` subscriber, then wires the four `board_core`
//! subsystems behind a TCP listener (spec's Supplemented Features
//! "`boardd` binary", grounded in `r3bl_cmdr`'s `src/bin/*.rs`).

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use board_core::ai::{AiFacade, RetryConfig};
use board_core::broker::NotificationBroker;
use board_core::door::DoorManager;
use board_core::sysop::{AiSysOp, OracleDoor};

use boardd::collaborators::{HttpAiProvider, InMemoryDoorSessionRepository};
use boardd::config::{BoardSettings, Cli};
use boardd::pong_tracker::PongTracker;
use boardd::server::{self, BoardServices};
use boardd::{error::BoarddError, heartbeat};

fn init_tracing(verbose: bool, log_dir: Option<&std::path::Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "boardd.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false);
            tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    let settings = BoardSettings::load(cli.config_file.as_ref(), &cli.overrides)?;
    info!(?settings, "loaded configuration");

    run(settings).await.map_err(|e| miette::miette!("{e}"))
}

async fn run(settings: BoardSettings) -> Result<(), BoarddError> {
    let ai_provider = Arc::new(HttpAiProvider::new(settings.ai_endpoint.clone()));
    let retry_config = RetryConfig {
        retry_attempts: settings.ai_retry_attempts,
        retry_delay: Duration::from_millis(settings.ai_retry_delay_ms),
        fallbacks_enabled: true,
    };
    let ai_facade = Arc::new(AiFacade::new(ai_provider, retry_config));
    let ai_sysop = Arc::new(AiSysOp::new(ai_facade.clone()));

    let door_repository = Arc::new(InMemoryDoorSessionRepository::default());
    let mut door_manager = DoorManager::new(door_repository, Duration::from_secs(settings.door_idle_timeout_secs));
    door_manager.register_door(Arc::new(OracleDoor::new(ai_facade.clone())));
    let door_manager = Arc::new(door_manager);

    let broker = Arc::new(NotificationBroker::with_cap(settings.broker_subscription_cap));
    let pong_tracker = Arc::new(PongTracker::default());

    let services = Arc::new(BoardServices {
        broker: broker.clone(),
        door_manager,
        ai_sysop,
        ai_facade,
        pong_tracker: pong_tracker.clone(),
    });

    let heartbeat_interval = Duration::from_secs(settings.heartbeat_interval_secs);
    tokio::spawn(heartbeat::run(broker, pong_tracker, heartbeat_interval));

    let listener = TcpListener::bind(&settings.listen_addr).await?;
    info!(addr = %settings.listen_addr, "boardd listening");
    server::run(listener, services).await?;
    Ok(())
}
