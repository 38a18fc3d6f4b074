//! Per-connection handler: join a room, then forward messages.

use std::net::SocketAddr;

use coderoom_common::{Envelope, EventKind, OriginId, RoomHello, RoomReply};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::room::RoomStore;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsStream = SplitStream<WebSocketStream<TcpStream>>;

/// Handle a single WebSocket connection.
pub async fn handle_connection(ws: WebSocketStream<TcpStream>, addr: SocketAddr, store: RoomStore) {
    let (mut sink, mut stream) = ws.split();

    // 1. Read the join hello.
    let (room, origin) = match read_hello(&mut stream, addr).await {
        Ok(v) => v,
        Err(message) => {
            let _ = send_reply(&mut sink, &RoomReply::Error { message }).await;
            return;
        }
    };

    // 2. Register. The room owns our only sender.
    let joined = store.join(&room, &origin).await;
    let conn = joined.conn;
    let mut rx = joined.rx;

    tracing::info!(
        peer = %addr,
        room = %room,
        origin = %origin,
        peers = joined.peers,
        "Client joined"
    );

    // 3. Confirm, then hand over the room's current code.
    let mut ready = send_reply(
        &mut sink,
        &RoomReply::Joined {
            room: room.clone(),
            peers: joined.peers,
        },
    )
    .await
    .is_ok();
    if ready {
        if let Some(snapshot) = joined.snapshot {
            let envelope = Envelope::new(EventKind::ReceiveCode, snapshot.origin, snapshot.code);
            ready = sink.send(Message::Text(envelope.to_json().into())).await.is_ok();
        }
    }

    // 4. Forwarding loop.
    while ready {
        tokio::select! {
            msg = rx.recv() => {
                let Some(msg) = msg else {
                    // Evicted as too slow, or replaced by a rejoin.
                    tracing::info!(peer = %addr, room = %room, origin = %origin, "Member dropped by room");
                    break;
                };
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(message) = forward(&store, &room, &origin, &text).await {
                            tracing::debug!(room = %room, origin = %origin, error = %message, "Rejected frame");
                            if send_reply(&mut sink, &RoomReply::Error { message }).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 5. Cleanup.
    let removed = store.leave(&room, &origin, conn).await;
    let rooms = store.count().await;
    tracing::info!(
        peer = %addr,
        room = %room,
        origin = %origin,
        room_closed = removed,
        rooms = rooms,
        "Client left"
    );
}

/// Apply one client envelope to the room.
///
/// The envelope's origin is replaced with the one the member joined under,
/// so a client cannot speak for another.
async fn forward(store: &RoomStore, room: &str, origin: &OriginId, text: &str) -> Result<(), String> {
    let envelope: Envelope =
        serde_json::from_str(text).map_err(|e| format!("invalid envelope: {e}"))?;
    if !envelope.event.is_client_event() {
        return Err(format!("clients may not send {}", envelope.event.as_str()));
    }

    match envelope.event {
        EventKind::SendCode | EventKind::SaveCode => {
            store.update_snapshot(room, origin, envelope.data.clone()).await;
        }
        _ => {}
    }

    let Some(delivered) = envelope.event.delivered_as() else {
        return Ok(());
    };
    let json = Envelope::new(delivered, origin.clone(), envelope.data).to_json();
    for evicted in store.broadcast_except(room, origin, &json).await {
        tracing::warn!(room = %room, origin = %evicted, "Evicted member with full queue");
    }
    Ok(())
}

/// Read and parse the first message as a join hello.
async fn read_hello(stream: &mut WsStream, addr: SocketAddr) -> Result<(String, OriginId), String> {
    // Wait up to 10 seconds for the hello message.
    let frame = tokio::time::timeout(std::time::Duration::from_secs(10), stream.next()).await;

    match frame {
        Ok(Some(Ok(Message::Text(text)))) => match serde_json::from_str::<RoomHello>(&text) {
            Ok(RoomHello::Join { room, origin }) => {
                if room.trim().is_empty() {
                    tracing::warn!(peer = %addr, "Join with empty room name");
                    return Err("room name must not be empty".into());
                }
                if origin.as_str().is_empty() {
                    tracing::warn!(peer = %addr, "Join with empty origin");
                    return Err("origin must not be empty".into());
                }
                Ok((room, origin))
            }
            Err(e) => {
                tracing::warn!(peer = %addr, error = %e, "Invalid hello message");
                Err(format!("invalid join: {e}"))
            }
        },
        Ok(Some(Ok(_))) => {
            tracing::warn!(peer = %addr, "Expected text hello, got binary");
            Err("expected a text join frame".into())
        }
        Ok(Some(Err(e))) => {
            tracing::warn!(peer = %addr, error = %e, "WS error during hello");
            Err(e.to_string())
        }
        Ok(None) => {
            tracing::debug!(peer = %addr, "Connection closed before hello");
            Err("closed before join".into())
        }
        Err(_) => {
            tracing::warn!(peer = %addr, "Hello timeout (10s)");
            Err("join timeout".into())
        }
    }
}

/// Send a RoomReply as a JSON text frame.
async fn send_reply(sink: &mut WsSink, reply: &RoomReply) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    sink.send(Message::Text(reply.to_json().into())).await
}
