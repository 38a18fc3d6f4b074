//! Room wire protocol shared by the relay and its clients.
//!
//! Every frame is a JSON text frame. The first client frame is a
//! [`RoomHello`]; after that both directions carry [`Envelope`]s, and the
//! relay may also send [`RoomReply`] control frames.

use serde::{Deserialize, Serialize};

use crate::id::OriginId;

/// Named message kinds carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Local edit, client → room.
    #[serde(rename = "send-code")]
    SendCode,
    /// Edit delivery, room → client.
    #[serde(rename = "receive-code")]
    ReceiveCode,
    /// Periodic re-broadcast of the buffer, client → room.
    #[serde(rename = "save-code")]
    SaveCode,
    /// Execution result, client → room.
    #[serde(rename = "send-output")]
    SendOutput,
    /// Execution result delivery, room → client.
    #[serde(rename = "receive-output")]
    ReceiveOutput,
}

impl EventKind {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SendCode => "send-code",
            EventKind::ReceiveCode => "receive-code",
            EventKind::SaveCode => "save-code",
            EventKind::SendOutput => "send-output",
            EventKind::ReceiveOutput => "receive-output",
        }
    }

    /// Kinds a client may send.
    pub fn is_client_event(&self) -> bool {
        matches!(
            self,
            EventKind::SendCode | EventKind::SaveCode | EventKind::SendOutput
        )
    }

    /// The kind peers receive when the relay forwards this one, if it is
    /// forwarded at all.
    pub fn delivered_as(&self) -> Option<EventKind> {
        match self {
            EventKind::SendCode => Some(EventKind::ReceiveCode),
            EventKind::SendOutput => Some(EventKind::ReceiveOutput),
            _ => None,
        }
    }
}

/// A tagged message travelling through a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: EventKind,
    pub origin: OriginId,
    pub data: String,
}

impl Envelope {
    pub fn new(event: EventKind, origin: OriginId, data: impl Into<String>) -> Self {
        Self {
            event,
            origin,
            data: data.into(),
        }
    }

    pub fn to_json(&self) -> String {
        // An envelope is plain strings; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// First frame a client sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomHello {
    Join { room: String, origin: OriginId },
}

/// Control frames the relay sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomReply {
    Joined { room: String, peers: usize },
    Error { message: String },
}

impl RoomReply {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Any frame a client can receive from the relay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Envelope(Envelope),
    Reply(RoomReply),
}
