// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `Connection` collaborator interface (spec §6.3). The broker and
//! door manager depend only on this surface, never on a concrete
//! transport.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConnectionError(pub String);

/// `{id, isOpen, send(string) → (), close() → ()}` (spec §6.3). The
/// `onData`/`onClose`/`onError` hooks named in the spec are registered by
/// the transport-owning task at construction time rather than through
/// this trait (see `DESIGN.md`); the broker only ever needs to query and
/// write to an established connection.
#[async_trait::async_trait]
pub trait Connection: Send + Sync {
    fn id(&self) -> &str;

    fn is_open(&self) -> bool;

    async fn send(&self, message: &str) -> Result<(), ConnectionError>;

    async fn close(&self);
}
