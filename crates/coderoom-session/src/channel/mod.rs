//! Session Channel: the client's connection to a room on the relay.
//!
//! The editor only depends on [`ChannelSink`]; [`ChannelClient`] is the
//! WebSocket implementation with a background connection task, reconnect
//! with backoff, and origin tagging of every outbound message.

mod client;
mod connection;
mod handler;
mod types;

use async_trait::async_trait;
use coderoom_common::{EventKind, OriginId};

pub use client::ChannelClient;
pub use types::{ChannelClientConfig, ChannelEvent};

/// Outbound side of a room connection, as seen by an editor session.
///
/// `emit` is fire-and-forget: no acknowledgement is awaited and messages
/// emitted while disconnected are dropped.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Identity stamped on every outbound message.
    fn origin(&self) -> &OriginId;

    async fn emit(&self, event: EventKind, data: String);

    async fn is_connected(&self) -> bool;

    /// Close the connection. No handshake; further emits are dropped.
    async fn close(&self);
}
