//! One-shot subcommands.

use std::path::Path;
use std::process::ExitCode;

use coderoom_common::CoderoomError;
use coderoom_config::CoderoomConfig;
use coderoom_exec::{ExecError, ExecuteRequest, Executor, PistonClient, PistonConfig};
use coderoom_session::{LanguageKey, LanguageTable, ProblemCatalog};

pub fn piston_client(config: &CoderoomConfig) -> Result<PistonClient, CoderoomError> {
    PistonClient::new(PistonConfig::from(&config.execution)).map_err(exec_error)
}

pub fn exec_error(e: ExecError) -> CoderoomError {
    CoderoomError::Execution(e.to_string())
}

/// Problem catalog from `[problems] catalog_path`, or the built-in one.
pub fn load_catalog(config: &CoderoomConfig) -> Result<ProblemCatalog, CoderoomError> {
    match &config.problems.catalog_path {
        Some(path) => ProblemCatalog::load(path),
        None => ProblemCatalog::builtin(),
    }
}

/// Language for a file: the explicit key if given, else the extension.
pub fn resolve_language(file: &Path, language: Option<&str>) -> Result<LanguageKey, CoderoomError> {
    if let Some(name) = language {
        return name.parse();
    }
    let ext = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
    LanguageKey::from_extension(ext).ok_or_else(|| {
        CoderoomError::UnknownLanguage(format!(
            "cannot infer language of {}; pass --language",
            file.display()
        ))
    })
}

pub async fn run_file(
    config: &CoderoomConfig,
    file: &Path,
    language: Option<&str>,
) -> Result<ExitCode, CoderoomError> {
    let key = resolve_language(file, language)?;
    let source = std::fs::read_to_string(file)?;
    if source.is_empty() {
        tracing::warn!(file = %file.display(), "Nothing to run");
        return Ok(ExitCode::SUCCESS);
    }

    let table = LanguageTable::builtin();
    let descriptor = table.get(key);
    let client = piston_client(config)?;
    let response = client
        .execute(ExecuteRequest::single_file(descriptor.execution_id, source))
        .await
        .map_err(exec_error)?;

    if response.is_error() {
        eprint!("{}", response.display_output());
        Ok(ExitCode::FAILURE)
    } else {
        print!("{}", response.display_output());
        Ok(ExitCode::SUCCESS)
    }
}

pub async fn list_runtimes(config: &CoderoomConfig) -> Result<ExitCode, CoderoomError> {
    let client = piston_client(config)?;
    let runtimes = client.runtimes().await.map_err(exec_error)?;
    for runtime in runtimes {
        if runtime.aliases.is_empty() {
            println!("{} {}", runtime.language, runtime.version);
        } else {
            println!(
                "{} {} ({})",
                runtime.language,
                runtime.version,
                runtime.aliases.join(", ")
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn list_problems(config: &CoderoomConfig) -> Result<ExitCode, CoderoomError> {
    let catalog = load_catalog(config)?;
    for (i, problem) in catalog.iter().enumerate() {
        println!("{:>2}. {}", i + 1, problem.title);
    }
    Ok(ExitCode::SUCCESS)
}
