//! Public handle for the room connection.

use std::sync::Arc;

use async_trait::async_trait;
use coderoom_common::{Envelope, EventKind, OriginId};
use tokio::sync::{mpsc, RwLock};
use tracing::warn;

use super::connection::connection_loop;
use super::types::{ChannelClientConfig, ChannelCommand, ChannelEvent};
use super::ChannelSink;

/// Handle for interacting with a room on the relay.
///
/// All methods are non-blocking and send commands to the background
/// connection task.
pub struct ChannelClient {
    command_tx: mpsc::Sender<ChannelCommand>,
    connected: Arc<RwLock<bool>>,
    origin: OriginId,
}

impl ChannelClient {
    /// Create a new client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: ChannelClientConfig) -> (Self, mpsc::Receiver<ChannelEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(256);
        let connected = Arc::new(RwLock::new(false));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
            origin: config.origin.clone(),
        };

        tokio::spawn(connection_loop(config, connected, event_tx, command_rx));

        (client, event_rx)
    }
}

#[async_trait]
impl ChannelSink for ChannelClient {
    fn origin(&self) -> &OriginId {
        &self.origin
    }

    async fn emit(&self, event: EventKind, data: String) {
        if !event.is_client_event() {
            warn!(event = event.as_str(), "Refusing to emit a delivery-only event");
            return;
        }
        let envelope = Envelope::new(event, self.origin.clone(), data);
        let _ = self.command_tx.send(ChannelCommand::Emit(envelope)).await;
    }

    async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    async fn close(&self) {
        let _ = self.command_tx.send(ChannelCommand::Disconnect).await;
    }
}
