//! Configuration and event/command enums for the channel client.

use std::time::Duration;

use coderoom_common::{Envelope, OriginId};
use coderoom_config::ChannelConfig;

/// Connection settings for one room.
#[derive(Debug, Clone)]
pub struct ChannelClientConfig {
    /// Relay WebSocket URL.
    pub url: String,
    pub room: String,
    pub origin: OriginId,
    pub connect_timeout: Duration,
    /// Reconnect base delay.
    pub reconnect_delay: Duration,
    /// Maximum reconnect delay.
    pub max_reconnect_delay: Duration,
}

impl ChannelClientConfig {
    pub fn from_config(config: &ChannelConfig, origin: OriginId) -> Self {
        Self {
            url: config.url.clone(),
            room: config.room.clone(),
            origin,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            reconnect_delay: Duration::from_secs(config.reconnect_delay_secs),
            max_reconnect_delay: Duration::from_secs(config.max_reconnect_delay_secs),
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Next backoff delay after `current`, doubled and capped.
    pub(crate) fn next_delay(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_reconnect_delay)
    }
}

/// Events emitted by the channel client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// WebSocket connection established and join sent.
    Connected,
    /// The relay accepted the join.
    Joined { room: String, peers: usize },
    /// WebSocket connection lost or closed.
    Disconnected,
    /// A peer's edit (or the room snapshot on join).
    CodeReceived { origin: OriginId, text: String },
    /// A peer's execution result.
    OutputReceived { origin: OriginId, text: String },
    Error(String),
}

/// Commands sent from the handle to the connection task.
#[derive(Debug)]
pub(crate) enum ChannelCommand {
    Emit(Envelope),
    Disconnect,
}
