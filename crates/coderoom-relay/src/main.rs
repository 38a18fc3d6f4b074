//! coderoom-relay: WebSocket relay that hosts collaborative coding rooms.
//!
//! Clients join a room by name and tag every message with their origin id.
//! The relay forwards edits and execution output to the other members of the
//! room and keeps the latest code of each live room in memory so late
//! joiners start from the current buffer. Nothing is persisted.

mod connection;
mod room;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;
use crate::room::RoomStore;

#[derive(Parser)]
#[command(name = "coderoom-relay", about = "WebSocket relay for coderoom rooms")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coderoom_relay=info".into()),
        )
        .init();

    let args = Args::parse();
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    tracing::info!("coderoom-relay listening on {}", addr);
    serve(listener, RoomStore::new()).await;
}

/// Accept connections forever, one task per client.
async fn serve(listener: TcpListener, store: RoomStore) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let store = store.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, store).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
