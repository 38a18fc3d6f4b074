mod cli;
mod commands;
mod repl;

use std::process::ExitCode;

use coderoom_config::CoderoomConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

/// Turn a `--log-level` value into a filter directive. A bare level applies
/// to the coderoom crates; anything containing `=` is taken as-is.
fn log_directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("coderoom={level}")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Load config before logging so its level can seed the filter; report
    // the failure once the subscriber is up.
    let loaded = coderoom_config::load_config(args.config.as_deref());

    let level = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.as_directive().to_string(),
        (None, Err(_)) => "info".to_string(),
    };
    let directive = log_directive(&level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Coderoom v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            CoderoomConfig::default()
        }
    };

    let result = match args.command {
        Command::Join { room, name } => repl::run(&config, room, name).await,
        Command::Run { file, language } => commands::run_file(&config, &file, language.as_deref()).await,
        Command::Runtimes => commands::list_runtimes(&config).await,
        Command::Problems => commands::list_problems(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_targets_coderoom_crates() {
        assert_eq!(log_directive("debug"), "coderoom=debug");
    }

    #[test]
    fn full_directive_is_kept() {
        assert_eq!(log_directive("coderoom_session=trace"), "coderoom_session=trace");
    }
}
