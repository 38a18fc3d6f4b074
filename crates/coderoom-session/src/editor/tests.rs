use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use coderoom_common::{EventKind, NotificationLevel, NotificationQueue, OriginId};
use coderoom_exec::{ExecError, ExecuteRequest, ExecuteResponse, Executor, RunResult};
use tokio::sync::{mpsc, Notify};

use super::*;
use crate::catalog::{LanguageKey, LanguageTable};
use crate::channel::{ChannelEvent, ChannelSink};

struct RecordingSink {
    origin: OriginId,
    connected: AtomicBool,
    closed: AtomicBool,
    emitted: StdMutex<Vec<(EventKind, String)>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: OriginId::from("me"),
            connected: AtomicBool::new(true),
            closed: AtomicBool::new(false),
            emitted: StdMutex::new(Vec::new()),
        })
    }

    fn emitted(&self) -> Vec<(EventKind, String)> {
        self.emitted.lock().unwrap().clone()
    }

    fn count(&self, kind: EventKind) -> usize {
        self.emitted().iter().filter(|(k, _)| *k == kind).count()
    }
}

#[async_trait]
impl ChannelSink for RecordingSink {
    fn origin(&self) -> &OriginId {
        &self.origin
    }

    async fn emit(&self, event: EventKind, data: String) {
        self.emitted.lock().unwrap().push((event, data));
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Returns a canned result, optionally waiting on a gate first.
struct MockExecutor {
    reply: Result<ExecuteResponse, String>,
    requests: StdMutex<Vec<ExecuteRequest>>,
    gate: Option<Arc<Notify>>,
}

impl MockExecutor {
    fn ok(output: &str, stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(ExecuteResponse {
                run: RunResult {
                    output: output.into(),
                    stderr: stderr.into(),
                },
            }),
            requests: StdMutex::new(Vec::new()),
            gate: None,
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.into()),
            requests: StdMutex::new(Vec::new()),
            gate: None,
        })
    }

    fn gated(output: &str, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(ExecuteResponse {
                run: RunResult {
                    output: output.into(),
                    stderr: String::new(),
                },
            }),
            requests: StdMutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse, ExecError> {
        self.requests.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply.clone().map_err(ExecError::NetworkError)
    }
}

fn session_with(sink: &Arc<RecordingSink>, executor: &Arc<MockExecutor>) -> Arc<EditorSession> {
    Arc::new(EditorSession::new(
        Arc::new(LanguageTable::builtin()),
        LanguageKey::Javascript,
        Arc::clone(sink) as Arc<dyn ChannelSink>,
        Arc::clone(executor) as Arc<dyn Executor>,
    ))
}

#[tokio::test]
async fn starts_with_javascript_snippet() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    let state = session.snapshot().await;
    assert_eq!(state.language, LanguageKey::Javascript);
    assert_eq!(state.source, "console.log('Hello, From javascript!');");
    assert_eq!(state.output, None);
    assert!(!state.is_error);
    assert!(!state.running);
}

#[tokio::test]
async fn local_edit_updates_buffer_and_broadcasts_once() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));

    session.on_local_edit(Some("let a = 1;".into())).await;

    assert_eq!(session.source().await, "let a = 1;");
    assert_eq!(
        sink.emitted(),
        vec![(EventKind::SendCode, "let a = 1;".to_string())]
    );
}

#[tokio::test]
async fn absent_local_edit_is_ignored() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    let before = session.source().await;

    session.on_local_edit(None).await;

    assert_eq!(session.source().await, before);
    assert!(sink.emitted().is_empty());
}

#[tokio::test]
async fn remote_edit_overwrites_without_broadcast() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    session.on_local_edit(Some("mine".into())).await;

    session.on_remote_edit("theirs".into()).await;

    assert_eq!(session.source().await, "theirs");
    assert_eq!(sink.count(EventKind::SendCode), 1);
}

#[tokio::test]
async fn self_originated_events_are_ignored() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    let before = session.snapshot().await;

    session
        .handle_event(ChannelEvent::CodeReceived {
            origin: OriginId::from("me"),
            text: "echo".into(),
        })
        .await;
    session
        .handle_event(ChannelEvent::OutputReceived {
            origin: OriginId::from("me"),
            text: "echo".into(),
        })
        .await;
    assert_eq!(session.snapshot().await, before);

    session
        .handle_event(ChannelEvent::CodeReceived {
            origin: OriginId::from("peer"),
            text: "x = 2".into(),
        })
        .await;
    assert_eq!(session.source().await, "x = 2");
}

#[tokio::test]
async fn language_change_resets_buffer_locally() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    session.on_local_edit(Some("typed".into())).await;

    session.on_language_change(LanguageKey::Rust).await;

    let state = session.snapshot().await;
    assert_eq!(state.language, LanguageKey::Rust);
    assert_eq!(
        state.source,
        "fn main() {\n    println!(\"Hello, World from rust!\");\n}"
    );
    // Only the edit was broadcast, never the switch.
    assert_eq!(sink.emitted().len(), 1);
}

#[tokio::test]
async fn every_language_resets_buffer_and_switches_execution_id() {
    let table = LanguageTable::builtin();
    for key in LanguageKey::ALL {
        let sink = RecordingSink::new();
        let executor = MockExecutor::ok("ok\n", "");
        let session = session_with(&sink, &executor);

        session.on_language_change(key).await;
        assert_eq!(session.source().await, table.get(key).default_source);

        session.on_run_requested().await;
        let requests = executor.requests();
        assert_eq!(requests[0].language, table.get(key).execution_id);
        assert_eq!(requests[0].files[0].content, table.get(key).default_source);
    }
}

#[tokio::test]
async fn select_language_rejects_unknown_names() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));

    assert!(session.select_language("Cobol").await.is_err());
    assert_eq!(session.snapshot().await.language, LanguageKey::Javascript);

    assert_eq!(
        session.select_language("cpp").await.unwrap(),
        LanguageKey::Cpp
    );
    assert_eq!(session.language().await.display_name, "C++");
}

#[tokio::test]
async fn python_run_shows_and_broadcasts_output() {
    let sink = RecordingSink::new();
    let executor = MockExecutor::ok("hello\n", "");
    let session = session_with(&sink, &executor);

    session.on_language_change(LanguageKey::Python).await;
    assert_eq!(session.source().await, "print('Hello, world from python!')");

    let outcome = session.on_run_requested().await;

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            output: "hello\n".into(),
            is_error: false
        }
    );
    let requests = executor.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].language, "python");
    assert_eq!(requests[0].version, "*");
    assert_eq!(requests[0].files[0].name, "main");
    assert_eq!(
        requests[0].files[0].content,
        "print('Hello, world from python!')"
    );

    let state = session.snapshot().await;
    assert_eq!(state.output.as_deref(), Some("hello\n"));
    assert!(!state.is_error);
    assert!(!state.running);
    assert_eq!(
        sink.emitted(),
        vec![(EventKind::SendOutput, "hello\n".to_string())]
    );
}

#[tokio::test]
async fn cpp_run_uses_main_cpp() {
    let sink = RecordingSink::new();
    let executor = MockExecutor::ok("Hello, world!\n", "");
    let session = session_with(&sink, &executor);
    session.on_language_change(LanguageKey::Cpp).await;

    session.on_run_requested().await;

    let requests = executor.requests();
    assert_eq!(requests[0].language, "cpp");
    assert_eq!(requests[0].files[0].name, "main.cpp");
}

#[tokio::test]
async fn stderr_marks_output_as_error() {
    let sink = RecordingSink::new();
    let executor = MockExecutor::ok("", "SyntaxError: bad\n");
    let session = session_with(&sink, &executor);

    let outcome = session.on_run_requested().await;

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            output: "SyntaxError: bad\n".into(),
            is_error: true
        }
    );
    let state = session.snapshot().await;
    assert!(state.is_error);
    assert_eq!(state.output.as_deref(), Some("SyntaxError: bad\n"));
}

#[tokio::test]
async fn remote_output_clears_error_flag() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", "boom"));
    session.on_run_requested().await;
    assert!(session.snapshot().await.is_error);

    session
        .handle_event(ChannelEvent::OutputReceived {
            origin: OriginId::from("peer"),
            text: "42\n".into(),
        })
        .await;

    let state = session.snapshot().await;
    assert_eq!(state.output.as_deref(), Some("42\n"));
    assert!(!state.is_error);
}

#[tokio::test]
async fn failed_run_raises_notification_and_keeps_output() {
    let sink = RecordingSink::new();
    let session = Arc::new(
        EditorSession::new(
            Arc::new(LanguageTable::builtin()),
            LanguageKey::Javascript,
            Arc::clone(&sink) as Arc<dyn ChannelSink>,
            MockExecutor::failing("connection refused") as Arc<dyn Executor>,
        )
        .with_notifications(NotificationQueue::new(4)),
    );
    let before = session.snapshot().await;

    let outcome = session.on_run_requested().await;

    assert!(matches!(outcome, RunOutcome::Failed(ref m) if m.contains("connection refused")));
    assert_eq!(session.snapshot().await, before);
    assert!(sink.emitted().is_empty());

    let notifications = session.take_notifications().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].title, "An error occurred.");
    assert!(session.take_notifications().await.is_empty());
}

#[tokio::test]
async fn empty_buffer_skips_run() {
    let sink = RecordingSink::new();
    let executor = MockExecutor::ok("x", "");
    let session = session_with(&sink, &executor);
    session.on_local_edit(Some(String::new())).await;

    assert_eq!(session.on_run_requested().await, RunOutcome::Skipped);
    assert!(executor.requests().is_empty());
}

#[tokio::test]
async fn run_uses_buffer_snapshot_and_rejects_overlap() {
    let sink = RecordingSink::new();
    let gate = Arc::new(Notify::new());
    let executor = MockExecutor::gated("done\n", Arc::clone(&gate));
    let session = session_with(&sink, &executor);
    session.on_local_edit(Some("first".into())).await;

    let running = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.on_run_requested().await }
    });
    while executor.requests().is_empty() {
        tokio::task::yield_now().await;
    }

    assert!(session.snapshot().await.running);
    assert_eq!(session.on_run_requested().await, RunOutcome::Skipped);
    session.on_remote_edit("second".into()).await;

    gate.notify_one();
    let outcome = running.await.unwrap();

    assert!(matches!(outcome, RunOutcome::Completed { .. }));
    assert_eq!(executor.requests()[0].files[0].content, "first");
    let state = session.snapshot().await;
    assert_eq!(state.source, "second");
    assert!(!state.running);
}

#[tokio::test]
async fn teardown_discards_in_flight_result() {
    let sink = RecordingSink::new();
    let gate = Arc::new(Notify::new());
    let executor = MockExecutor::gated("late\n", Arc::clone(&gate));
    let session = session_with(&sink, &executor);

    let running = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.on_run_requested().await }
    });
    while executor.requests().is_empty() {
        tokio::task::yield_now().await;
    }

    session.teardown().await;
    assert!(!session.is_live());
    assert!(sink.closed.load(Ordering::SeqCst));

    gate.notify_one();
    assert_eq!(running.await.unwrap(), RunOutcome::Discarded);
    assert_eq!(session.snapshot().await.output, None);
    assert_eq!(sink.count(EventKind::SendOutput), 0);
}

#[tokio::test]
async fn autosave_tick_requires_connection_and_content() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));

    session.on_autosave_tick().await;
    assert_eq!(sink.count(EventKind::SaveCode), 1);

    sink.connected.store(false, Ordering::SeqCst);
    session.on_autosave_tick().await;
    assert_eq!(sink.count(EventKind::SaveCode), 1);

    sink.connected.store(true, Ordering::SeqCst);
    session.on_local_edit(Some(String::new())).await;
    session.on_autosave_tick().await;
    assert_eq!(sink.count(EventKind::SaveCode), 1);
}

#[tokio::test(start_paused = true)]
async fn autosave_fires_each_period_until_teardown() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    let handle = spawn_autosave(&session, Duration::from_millis(2000));

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert_eq!(sink.count(EventKind::SaveCode), 0);

    tokio::time::sleep(Duration::from_millis(4200)).await;
    assert_eq!(sink.count(EventKind::SaveCode), 3);
    assert_eq!(
        sink.emitted()[0],
        (
            EventKind::SaveCode,
            "console.log('Hello, From javascript!');".to_string()
        )
    );

    session.teardown().await;
    handle.await.unwrap();
    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(sink.count(EventKind::SaveCode), 3);
}

#[tokio::test]
async fn pump_events_applies_until_teardown() {
    let sink = RecordingSink::new();
    let session = session_with(&sink, &MockExecutor::ok("", ""));
    let (tx, rx) = mpsc::channel(8);
    let pump = tokio::spawn(Arc::clone(&session).pump_events(rx));

    tx.send(ChannelEvent::Connected).await.unwrap();
    tx.send(ChannelEvent::CodeReceived {
        origin: OriginId::from("peer"),
        text: "shared".into(),
    })
    .await
    .unwrap();
    while session.source().await != "shared" {
        tokio::task::yield_now().await;
    }

    session.teardown().await;
    pump.await.unwrap();
}
