//! Background WebSocket connection loop with auto-reconnect.

use std::sync::Arc;
use std::time::Duration;

use coderoom_common::{OriginId, RoomHello};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, error, info, warn};

use super::handler::parse_frame;
use super::types::{ChannelClientConfig, ChannelCommand, ChannelEvent};

/// Why a connected session ended.
enum PumpEnd {
    /// The handle asked to disconnect, or every handle was dropped.
    Closed,
    /// The socket failed or the relay went away.
    Lost,
}

/// Background task managing the room connection with auto-reconnect.
pub(crate) async fn connection_loop(
    config: ChannelClientConfig,
    connected: Arc<RwLock<bool>>,
    event_tx: mpsc::Sender<ChannelEvent>,
    mut command_rx: mpsc::Receiver<ChannelCommand>,
) {
    let mut reconnect_delay = config.reconnect_delay;

    loop {
        info!(url = %config.url, room = %config.room, "Connecting to room relay");

        let attempt = tokio::time::timeout(
            config.connect_timeout,
            tokio_tungstenite::connect_async(config.url.as_str()),
        );
        tokio::pin!(attempt);

        let result = loop {
            tokio::select! {
                result = &mut attempt => break result,
                command = command_rx.recv() => {
                    if discard_unless_stop(command, "connecting") {
                        info!(room = %config.room, "Left room before connecting");
                        return;
                    }
                }
            }
        };

        match result {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay;
                let (mut ws_write, mut ws_read) = ws_stream.split();

                let hello = RoomHello::Join {
                    room: config.room.clone(),
                    origin: config.origin.clone(),
                };
                let hello = serde_json::to_string(&hello).unwrap_or_default();

                if let Err(e) = ws_write.send(WsMessage::Text(hello.into())).await {
                    warn!(error = %e, "Failed to send join");
                } else {
                    *connected.write().await = true;
                    let _ = event_tx.send(ChannelEvent::Connected).await;

                    let end = pump(
                        &mut ws_write,
                        &mut ws_read,
                        &mut command_rx,
                        &event_tx,
                        &config.origin,
                    )
                    .await;

                    *connected.write().await = false;
                    let _ = event_tx.send(ChannelEvent::Disconnected).await;

                    if let PumpEnd::Closed = end {
                        info!(room = %config.room, "Left room");
                        return;
                    }
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to room relay");
                let _ = event_tx
                    .send(ChannelEvent::Error(format!("Connection failed: {e}")))
                    .await;
            }
            Err(_elapsed) => {
                error!(
                    timeout_secs = config.connect_timeout.as_secs(),
                    "Room relay connection timed out"
                );
                let _ = event_tx
                    .send(ChannelEvent::Error(format!(
                        "Connection timed out after {}s",
                        config.connect_timeout.as_secs()
                    )))
                    .await;
            }
        }

        info!(
            delay_ms = reconnect_delay.as_millis() as u64,
            "Reconnecting to room relay"
        );
        if wait_or_disconnect(reconnect_delay, &mut command_rx).await {
            return;
        }
        reconnect_delay = config.next_delay(reconnect_delay);
    }
}

/// Shuttle commands to the socket and frames to the event channel until
/// either side ends.
async fn pump<S, R>(
    ws_write: &mut S,
    ws_read: &mut R,
    command_rx: &mut mpsc::Receiver<ChannelCommand>,
    event_tx: &mpsc::Sender<ChannelEvent>,
    origin: &OriginId,
) -> PumpEnd
where
    S: Sink<WsMessage> + Unpin,
    R: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    loop {
        tokio::select! {
            command = command_rx.recv() => match command {
                Some(ChannelCommand::Emit(envelope)) => {
                    debug!(event = envelope.event.as_str(), bytes = envelope.data.len(), "Emit");
                    if ws_write.send(WsMessage::Text(envelope.to_json().into())).await.is_err() {
                        return PumpEnd::Lost;
                    }
                }
                Some(ChannelCommand::Disconnect) | None => {
                    let _ = ws_write.send(WsMessage::Close(None)).await;
                    return PumpEnd::Closed;
                }
            },

            frame = ws_read.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Some(event) = parse_frame(&text, origin) {
                        let _ = event_tx.send(event).await;
                    }
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = ws_write.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!("Room relay closed connection");
                    return PumpEnd::Lost;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    return PumpEnd::Lost;
                }
                _ => {}
            },
        }
    }
}

/// Sleep for `delay`, dropping emits meanwhile. Returns `true` if a
/// disconnect arrived before the delay ran out.
async fn wait_or_disconnect(
    delay: Duration,
    command_rx: &mut mpsc::Receiver<ChannelCommand>,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            command = command_rx.recv() => {
                if discard_unless_stop(command, "disconnected") {
                    return true;
                }
            }
        }
    }
}

/// Drop an emit that arrived with no socket to carry it. Returns `true` for
/// a disconnect or a closed command channel.
fn discard_unless_stop(command: Option<ChannelCommand>, state: &str) -> bool {
    match command {
        Some(ChannelCommand::Emit(envelope)) => {
            debug!(event = envelope.event.as_str(), state, "Dropping emit without a socket");
            false
        }
        Some(ChannelCommand::Disconnect) | None => true,
    }
}
