//! Environment overrides applied on top of the parsed config file.

use tracing::{info, warn};

use crate::schema::CoderoomConfig;
use crate::validation::validate_ws_url;

/// Environment variable holding the Session Channel endpoint.
pub const BACKEND_URL_ENV: &str = "CODEROOM_BACKEND_URL";

/// Apply overrides using `lookup` to resolve variable names.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// the configured URL. A value that is not a ws:// or wss:// URL is rejected
/// with a warning and the file value is kept.
pub fn apply_overrides_from<F>(config: &mut CoderoomConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        let mut errors = Vec::new();
        validate_ws_url(&mut errors, BACKEND_URL_ENV, url);
        if let Some(error) = errors.first() {
            warn!(
                error = %error,
                kept = %config.channel.url,
                "Ignoring invalid {BACKEND_URL_ENV}"
            );
            return;
        }
        info!(url = %url, "channel url overridden from {BACKEND_URL_ENV}");
        config.channel.url = url.to_string();
    }
}
