//! Incoming frame parsing.

use coderoom_common::{EventKind, OriginId, RoomReply, ServerFrame};
use tracing::debug;

use super::types::ChannelEvent;

/// Translate one text frame from the relay into a channel event.
///
/// Frames carrying our own origin are dropped, as are kinds a client never
/// receives.
pub(crate) fn parse_frame(text: &str, own_origin: &OriginId) -> Option<ChannelEvent> {
    let frame = match serde_json::from_str::<ServerFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(error = %e, "Unrecognized frame from relay");
            return None;
        }
    };

    match frame {
        ServerFrame::Envelope(envelope) => {
            if &envelope.origin == own_origin {
                debug!(event = envelope.event.as_str(), "Dropping self-originated message");
                return None;
            }
            match envelope.event {
                EventKind::ReceiveCode => Some(ChannelEvent::CodeReceived {
                    origin: envelope.origin,
                    text: envelope.data,
                }),
                EventKind::ReceiveOutput => Some(ChannelEvent::OutputReceived {
                    origin: envelope.origin,
                    text: envelope.data,
                }),
                other => {
                    debug!(event = other.as_str(), "Ignoring client-side event kind");
                    None
                }
            }
        }
        ServerFrame::Reply(RoomReply::Joined { room, peers }) => {
            Some(ChannelEvent::Joined { room, peers })
        }
        ServerFrame::Reply(RoomReply::Error { message }) => Some(ChannelEvent::Error(message)),
    }
}
