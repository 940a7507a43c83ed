// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A TCP-backed `Connection` (spec §6.3): one per accepted client socket,
//! writing newline-delimited JSON. `onData`/`onClose`/`onError` are owned
//! by the accept loop's read task rather than this type (see
//! `DESIGN.md`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

use board_core::broker::{Connection, ConnectionError};

pub struct TcpConnection {
    id: String,
    writer: Mutex<OwnedWriteHalf>,
    open: Arc<AtomicBool>,
}

impl TcpConnection {
    #[must_use]
    pub fn new(id: String, writer: OwnedWriteHalf, open: Arc<AtomicBool>) -> Self {
        Self {
            id,
            writer: Mutex::new(writer),
            open,
        }
    }
}

#[async_trait::async_trait]
impl Connection for TcpConnection {
    fn id(&self) -> &str { &self.id }

    fn is_open(&self) -> bool { self.open.load(Ordering::Acquire) }

    async fn send(&self, message: &str) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError(format!("connection {} is closed", self.id)));
        }
        let mut writer = self.writer.lock().await;
        writer
            .write_all(message.as_bytes())
            .await
            .map_err(|e| ConnectionError(e.to_string()))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| ConnectionError(e.to_string()))?;
        writer.flush().await.map_err(|e| ConnectionError(e.to_string()))
    }

    async fn close(&self) {
        self.open.store(false, Ordering::Release);
        let mut writer = self.writer.lock().await;
        let _ = writer.shutdown().await;
    }
}
