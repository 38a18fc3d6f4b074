//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::CoderoomConfig;
use coderoom_common::ConfigError;

use helpers::validate_range;
pub(crate) use helpers::validate_ws_url;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CoderoomConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_channel(&mut errors, config);
    validate_execution(&mut errors, config);
    validate_editor(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_channel(errors: &mut Vec<String>, config: &CoderoomConfig) {
    let channel = &config.channel;
    validate_ws_url(errors, "channel.url", &channel.url);
    if channel.room.trim().is_empty() {
        errors.push("channel.room must not be empty".into());
    }
    validate_range(errors, "channel.connect_timeout_secs", channel.connect_timeout_secs, 1, 120);
    validate_range(errors, "channel.reconnect_delay_secs", channel.reconnect_delay_secs, 1, 60);
    validate_range(
        errors,
        "channel.max_reconnect_delay_secs",
        channel.max_reconnect_delay_secs,
        channel.reconnect_delay_secs,
        600,
    );
}

fn validate_execution(errors: &mut Vec<String>, config: &CoderoomConfig) {
    let execution = &config.execution;
    if !(execution.base_url.starts_with("http://") || execution.base_url.starts_with("https://")) {
        errors.push(format!(
            "execution.base_url = {:?} must start with http:// or https://",
            execution.base_url
        ));
    }
    validate_range(errors, "execution.connect_timeout_secs", execution.connect_timeout_secs, 1, 120);
    validate_range(errors, "execution.request_timeout_secs", execution.request_timeout_secs, 1, 600);
}

fn validate_editor(errors: &mut Vec<String>, config: &CoderoomConfig) {
    let editor = &config.editor;
    validate_range(errors, "editor.autosave_interval_ms", editor.autosave_interval_ms, 250, 60_000);
    validate_range(
        errors,
        "editor.notification_capacity",
        u64::from(editor.notification_capacity),
        1,
        64,
    );
    if editor.default_language.trim().is_empty() {
        errors.push("editor.default_language must not be empty".into());
    }
}
