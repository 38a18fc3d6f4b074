//! Interactive room client over stdin.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use coderoom_common::{CoderoomError, NotificationQueue, OriginId};
use coderoom_config::CoderoomConfig;
use coderoom_exec::Executor;
use coderoom_session::{
    spawn_autosave, CallShell, ChannelClient, ChannelClientConfig, ChannelSink, EditorSession,
    LanguageKey, LanguageTable, ProblemCatalog, ProblemCursor, RunOutcome, ToolbarIcon,
};
use tokio::sync::mpsc;

use crate::commands::{load_catalog, piston_client};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Lang(Option<String>),
    Langs,
    Run,
    Load(Option<PathBuf>),
    Code,
    Output,
    Problem,
    Next,
    Prev,
    Video,
    Leave,
    /// Anything else: appended to the buffer.
    Edit(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let (head, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest.trim().to_string()).filter(|s| !s.is_empty())),
            None => (trimmed, None),
        };
        match head {
            ":lang" => ReplCommand::Lang(arg),
            ":langs" => ReplCommand::Langs,
            ":run" => ReplCommand::Run,
            ":load" => ReplCommand::Load(arg.map(PathBuf::from)),
            ":code" => ReplCommand::Code,
            ":output" => ReplCommand::Output,
            ":problem" => ReplCommand::Problem,
            ":next" => ReplCommand::Next,
            ":prev" => ReplCommand::Prev,
            ":video" => ReplCommand::Video,
            ":leave" => ReplCommand::Leave,
            _ => ReplCommand::Edit(line.to_string()),
        }
    }
}

/// Buffer after appending one typed line.
fn append_line(source: &str, line: &str) -> String {
    if source.is_empty() {
        line.to_string()
    } else {
        format!("{source}\n{line}")
    }
}

/// Read stdin lines on a plain thread. A blocked read must not hold up
/// runtime shutdown after `:leave`.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        use std::io::BufRead;
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });
    rx
}

fn initial_language(config: &CoderoomConfig) -> LanguageKey {
    config
        .editor
        .default_language
        .parse()
        .unwrap_or_else(|e| {
            tracing::warn!("{e}; falling back to {}", LanguageKey::default());
            LanguageKey::default()
        })
}

struct Repl {
    session: Arc<EditorSession>,
    catalog: ProblemCatalog,
    cursor: ProblemCursor,
    shell: CallShell,
    prompt: String,
}

pub async fn run(
    config: &CoderoomConfig,
    room: Option<String>,
    name: Option<String>,
) -> Result<ExitCode, CoderoomError> {
    let catalog = load_catalog(config)?;
    let executor: Arc<dyn Executor> = Arc::new(piston_client(config)?);

    let mut channel_config = ChannelClientConfig::from_config(&config.channel, OriginId::new());
    if let Some(room) = room {
        channel_config = channel_config.with_room(room);
    }
    let room = channel_config.room.clone();
    tracing::info!(room = %room, url = %channel_config.url, origin = %channel_config.origin, "Joining room");

    let (client, events) = ChannelClient::connect(channel_config);
    let channel: Arc<dyn ChannelSink> = Arc::new(client);

    let session = Arc::new(
        EditorSession::new(
            Arc::new(LanguageTable::builtin()),
            initial_language(config),
            channel,
            executor,
        )
        .with_notifications(NotificationQueue::new(config.editor.notification_capacity as usize)),
    );

    let autosave = spawn_autosave(
        &session,
        Duration::from_millis(config.editor.autosave_interval_ms),
    );
    let pump = tokio::spawn(Arc::clone(&session).pump_events(events));

    let prompt = match name {
        Some(name) => format!("{name}@{room}> "),
        None => format!("{room}> "),
    };
    let mut repl = Repl {
        session,
        cursor: ProblemCursor::new(&catalog),
        catalog,
        shell: CallShell::new(),
        prompt,
    };

    println!("Joined {room}. Type code lines, or :run, :code, :lang <key>, :leave.");
    repl.show_problem();
    repl.print_prompt();

    let mut lines = spawn_stdin_reader();
    while let Some(line) = lines.recv().await {
        if !repl.dispatch(ReplCommand::parse(&line)).await {
            break;
        }
        repl.flush_notifications().await;
        repl.print_prompt();
    }

    repl.shell.leave(&repl.session).await;
    let _ = autosave.await;
    let _ = pump.await;
    Ok(ExitCode::SUCCESS)
}

impl Repl {
    /// Handle one command. Returns `false` when the user leaves.
    async fn dispatch(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Lang(Some(name)) => match self.session.select_language(&name).await {
                Ok(key) => println!("Language: {key}"),
                Err(e) => println!("{e}"),
            },
            ReplCommand::Lang(None) => {
                println!("Usage: :lang <key>");
            }
            ReplCommand::Langs => {
                let current = self.session.snapshot().await.language;
                for descriptor in self.session.languages().iter() {
                    let marker = if descriptor.key == current { "*" } else { " " };
                    println!("{marker} {} ({})", descriptor.key, descriptor.display_name);
                }
            }
            ReplCommand::Run => {
                println!("Running...");
                match self.session.on_run_requested().await {
                    RunOutcome::Completed { output, is_error } => print_output(&output, is_error),
                    RunOutcome::Skipped => println!("Nothing to run."),
                    RunOutcome::Failed(_) | RunOutcome::Discarded => {}
                }
            }
            ReplCommand::Load(Some(path)) => match std::fs::read_to_string(&path) {
                Ok(contents) => {
                    self.session.on_local_edit(Some(contents)).await;
                    println!("Loaded {}", path.display());
                }
                Err(e) => println!("Cannot read {}: {e}", path.display()),
            },
            ReplCommand::Load(None) => {
                println!("Usage: :load <file>");
            }
            ReplCommand::Code => {
                self.shell.click(ToolbarIcon::Code);
                let state = self.session.snapshot().await;
                println!("--- {} ---", state.language);
                println!("{}", state.source);
                println!("---");
            }
            ReplCommand::Output => {
                let state = self.session.snapshot().await;
                match state.output {
                    Some(output) => print_output(&output, state.is_error),
                    None => println!("No output yet."),
                }
            }
            ReplCommand::Problem => self.show_problem(),
            ReplCommand::Next => {
                if self.cursor.next() {
                    self.show_problem();
                } else {
                    println!("Already at the last problem.");
                }
            }
            ReplCommand::Prev => {
                if self.cursor.previous() {
                    self.show_problem();
                } else {
                    println!("Already at the first problem.");
                }
            }
            ReplCommand::Video => {
                self.shell.click(ToolbarIcon::Video);
                println!("Toolbar: {:?}", self.shell.toolbar_mode());
            }
            ReplCommand::Leave => return false,
            ReplCommand::Edit(line) => {
                let source = self.session.source().await;
                self.session
                    .on_local_edit(Some(append_line(&source, &line)))
                    .await;
            }
        }
        true
    }

    fn show_problem(&self) {
        let problem = self.cursor.current(&self.catalog);
        println!(
            "[{}/{}] {}",
            self.cursor.index() + 1,
            self.catalog.len(),
            problem.title
        );
        println!("{}", problem.description);
        println!("  Input:    {}", problem.input_text());
        println!("  Expected: {}", problem.expected_output_text());
    }

    async fn flush_notifications(&self) {
        for notification in self.session.take_notifications().await {
            eprintln!("! {}: {}", notification.title, notification.body);
        }
    }

    fn print_prompt(&self) {
        use std::io::Write;
        print!("{}", self.prompt);
        let _ = std::io::stdout().flush();
    }
}

fn print_output(output: &str, is_error: bool) {
    if is_error {
        println!("--- output (error) ---");
    } else {
        println!("--- output ---");
    }
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
}
