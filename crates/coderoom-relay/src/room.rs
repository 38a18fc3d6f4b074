//! Room store: maps room names to their members and latest code.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use coderoom_common::OriginId;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Outbound frames buffered per member before it counts as stalled.
pub const MEMBER_QUEUE: usize = 256;

/// Last code written to a room, with the member who wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub origin: OriginId,
    pub code: String,
}

/// One live connection in a room. The room holds the only sender, so
/// removing the member closes its queue and ends its connection task.
struct Member {
    conn: u64,
    tx: mpsc::Sender<String>,
}

#[derive(Default)]
struct Room {
    members: HashMap<OriginId, Member>,
    snapshot: Option<Snapshot>,
}

/// What a member gets on joining.
#[derive(Debug)]
pub struct Joined {
    /// Identifies this connection for [`RoomStore::leave`].
    pub conn: u64,
    /// Members in the room, the joiner included.
    pub peers: usize,
    pub snapshot: Option<Snapshot>,
    pub rx: mpsc::Receiver<String>,
}

/// Thread-safe room store.
#[derive(Clone)]
pub struct RoomStore {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
    next_conn: Arc<AtomicU64>,
    queue: usize,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::with_queue(MEMBER_QUEUE)
    }

    pub fn with_queue(queue: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            next_conn: Arc::new(AtomicU64::new(1)),
            queue: queue.max(1),
        }
    }

    /// Add a member, creating the room if needed.
    ///
    /// A member that rejoins under the same origin (a reconnect racing the
    /// old socket's cleanup) replaces its previous connection, which then
    /// sees its queue close.
    pub async fn join(&self, room: &str, origin: &OriginId) -> Joined {
        let (tx, rx) = mpsc::channel(self.queue);
        let conn = self.next_conn.fetch_add(1, Ordering::Relaxed);

        let mut map = self.rooms.write().await;
        let entry = map.entry(room.to_string()).or_default();
        entry.members.insert(origin.clone(), Member { conn, tx });
        Joined {
            conn,
            peers: entry.members.len(),
            snapshot: entry.snapshot.clone(),
            rx,
        }
    }

    /// Remove a member if `conn` is still its registered connection.
    /// Returns true if the room was removed (last member gone).
    pub async fn leave(&self, room: &str, origin: &OriginId, conn: u64) -> bool {
        let mut map = self.rooms.write().await;
        let Some(entry) = map.get_mut(room) else {
            return false;
        };
        if entry.members.get(origin).is_some_and(|m| m.conn == conn) {
            entry.members.remove(origin);
        }
        if entry.members.is_empty() {
            map.remove(room);
            return true;
        }
        false
    }

    /// Queue `frame` for every member except `origin`, without waiting.
    ///
    /// A member whose queue is full is evicted: its sender is dropped, so its
    /// connection task drains what is buffered and then closes. Returns the
    /// evicted origins.
    pub async fn broadcast_except(&self, room: &str, origin: &OriginId, frame: &str) -> Vec<OriginId> {
        let mut map = self.rooms.write().await;
        let Some(entry) = map.get_mut(room) else {
            return Vec::new();
        };

        let mut evicted = Vec::new();
        entry.members.retain(|id, member| {
            if id == origin {
                return true;
            }
            match member.tx.try_send(frame.to_string()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    evicted.push(id.clone());
                    false
                }
                // Its task is already on the way out and will call `leave`.
                Err(TrySendError::Closed(_)) => true,
            }
        });
        evicted
    }

    /// Record the room's latest code.
    pub async fn update_snapshot(&self, room: &str, origin: &OriginId, code: String) {
        let mut map = self.rooms.write().await;
        if let Some(entry) = map.get_mut(room) {
            entry.snapshot = Some(Snapshot {
                origin: origin.clone(),
                code,
            });
        }
    }

    /// Number of live rooms.
    pub async fn count(&self) -> usize {
        self.rooms.read().await.len()
    }

    #[cfg(test)]
    pub async fn snapshot(&self, room: &str) -> Option<Snapshot> {
        self.rooms.read().await.get(room)?.snapshot.clone()
    }

    #[cfg(test)]
    pub async fn member_count(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map_or(0, |entry| entry.members.len())
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}
