use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::session::EditorSession;

/// Re-broadcast the session buffer every `period` until teardown.
///
/// The task holds only a weak reference, so dropping the last session
/// handle also ends it.
pub fn spawn_autosave(session: &Arc<EditorSession>, period: Duration) -> JoinHandle<()> {
    let weak = Arc::downgrade(session);
    let cancel = session.cancellation();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(session) = weak.upgrade() else {
                        break;
                    };
                    session.on_autosave_tick().await;
                }
            }
        }
        debug!("Autosave stopped");
    })
}
