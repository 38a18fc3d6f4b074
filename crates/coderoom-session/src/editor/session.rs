//! Editor session operations.

use std::sync::Arc;

use coderoom_common::{CoderoomError, EventKind, Notification, NotificationQueue, OriginId};
use coderoom_exec::{ExecuteRequest, Executor};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::state::EditorState;
use crate::catalog::{LanguageDescriptor, LanguageKey, LanguageTable};
use crate::channel::{ChannelEvent, ChannelSink};

/// Result of a run request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing to run, or a run is already in flight.
    Skipped,
    /// The service answered; the output was stored and broadcast.
    Completed { output: String, is_error: bool },
    /// The request itself failed; a notification was raised.
    Failed(String),
    /// The session was torn down while the request was in flight.
    Discarded,
}

/// One participant's view of the room's code.
///
/// Every mutation is last-writer-wins: local edits, remote edits and
/// language switches all overwrite the buffer in arrival order.
pub struct EditorSession {
    languages: Arc<LanguageTable>,
    state: RwLock<EditorState>,
    notifications: Mutex<NotificationQueue>,
    channel: Arc<dyn ChannelSink>,
    executor: Arc<dyn Executor>,
    cancel: CancellationToken,
}

impl EditorSession {
    pub fn new(
        languages: Arc<LanguageTable>,
        initial_language: LanguageKey,
        channel: Arc<dyn ChannelSink>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let source = languages.get(initial_language).default_source;
        Self {
            state: RwLock::new(EditorState::new(initial_language, source)),
            languages,
            notifications: Mutex::new(NotificationQueue::default()),
            channel,
            executor,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the notification queue (e.g. to apply a configured capacity).
    pub fn with_notifications(mut self, queue: NotificationQueue) -> Self {
        self.notifications = Mutex::new(queue);
        self
    }

    pub fn origin(&self) -> &OriginId {
        self.channel.origin()
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    /// `false` once [`teardown`](Self::teardown) has run.
    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Token cancelled on teardown; background tasks tied to this session
    /// stop when it fires.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn snapshot(&self) -> EditorState {
        self.state.read().await.clone()
    }

    pub async fn source(&self) -> String {
        self.state.read().await.source.clone()
    }

    pub async fn language(&self) -> &LanguageDescriptor {
        let key = self.state.read().await.language;
        self.languages.get(key)
    }

    /// Drain pending toasts for display.
    pub async fn take_notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.drain_visible()
    }

    /// Apply a keystroke-level change and broadcast it as-is.
    ///
    /// `None` (the editor reporting no value) is ignored.
    pub async fn on_local_edit(&self, text: Option<String>) {
        let Some(text) = text else {
            return;
        };
        self.state.write().await.source = text.clone();
        self.channel.emit(EventKind::SendCode, text).await;
    }

    /// Apply a peer's edit, discarding any unsent local change.
    pub async fn on_remote_edit(&self, text: String) {
        self.state.write().await.source = text;
    }

    /// Re-broadcast the current buffer. Skipped after teardown, while the
    /// channel is down, or when the buffer is empty.
    pub async fn on_autosave_tick(&self) {
        if !self.is_live() || !self.channel.is_connected().await {
            return;
        }
        let source = self.state.read().await.source.clone();
        if source.is_empty() {
            return;
        }
        debug!(bytes = source.len(), "Autosave");
        self.channel.emit(EventKind::SaveCode, source).await;
    }

    /// Switch language and reset the buffer to its starter source.
    /// Local only; peers are not told.
    pub async fn on_language_change(&self, key: LanguageKey) {
        let descriptor = self.languages.get(key);
        let mut state = self.state.write().await;
        state.language = key;
        state.source = descriptor.default_source.to_string();
        info!(language = %key, "Language changed");
    }

    /// Switch language by user-supplied name.
    pub async fn select_language(&self, name: &str) -> Result<LanguageKey, CoderoomError> {
        let key = self.languages.lookup(name)?.key;
        self.on_language_change(key).await;
        Ok(key)
    }

    /// Run the current buffer on the execution service.
    ///
    /// The buffer is snapshotted up front; edits arriving while the request
    /// is in flight do not affect it.
    pub async fn on_run_requested(&self) -> RunOutcome {
        let (source, language) = {
            let mut state = self.state.write().await;
            if state.source.is_empty() || state.running {
                return RunOutcome::Skipped;
            }
            state.running = true;
            (state.source.clone(), state.language)
        };

        let descriptor = self.languages.get(language);
        let request = ExecuteRequest::single_file(descriptor.execution_id, source);
        info!(language = descriptor.execution_id, "Running code");

        let result = self.executor.execute(request).await;

        if !self.is_live() {
            debug!("Session torn down during run; discarding result");
            return RunOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                let output = response.display_output().to_string();
                let is_error = response.is_error();
                {
                    let mut state = self.state.write().await;
                    state.output = Some(output.clone());
                    state.is_error = is_error;
                    state.running = false;
                }
                self.channel.emit(EventKind::SendOutput, output.clone()).await;
                RunOutcome::Completed { output, is_error }
            }
            Err(e) => {
                error!(error = %e, "Run request failed");
                self.state.write().await.running = false;
                let message = e.to_string();
                self.notifications
                    .lock()
                    .await
                    .push(Notification::error("An error occurred.", message.clone()));
                RunOutcome::Failed(message)
            }
        }
    }

    /// Show a peer's execution result. Relayed output is never flagged as
    /// an error.
    pub async fn on_remote_output(&self, text: String) {
        let mut state = self.state.write().await;
        state.output = Some(text);
        state.is_error = false;
    }

    /// Dispatch one channel event.
    pub async fn handle_event(&self, event: ChannelEvent) {
        match event {
            ChannelEvent::CodeReceived { origin, text } => {
                if &origin == self.origin() {
                    return;
                }
                self.on_remote_edit(text).await;
            }
            ChannelEvent::OutputReceived { origin, text } => {
                if &origin == self.origin() {
                    return;
                }
                self.on_remote_output(text).await;
            }
            ChannelEvent::Connected => info!("Connected to room"),
            ChannelEvent::Joined { room, peers } => info!(room = %room, peers, "Joined room"),
            ChannelEvent::Disconnected => warn!("Disconnected from room"),
            ChannelEvent::Error(message) => warn!(error = %message, "Channel error"),
        }
    }

    /// Apply channel events until teardown or until the channel stops.
    pub async fn pump_events(self: Arc<Self>, mut events: mpsc::Receiver<ChannelEvent>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
            }
        }
    }

    /// Unmount: stop autosave, guard in-flight runs, close the channel.
    pub async fn teardown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.channel.close().await;
        info!("Editor session torn down");
    }
}
