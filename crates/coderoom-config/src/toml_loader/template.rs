//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Coderoom Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[channel]
# WebSocket URL of the room relay. CODEROOM_BACKEND_URL overrides this.
url = "ws://127.0.0.1:8080"
room = "lobby"
# connect_timeout_secs = 15        # 1-120
# reconnect_delay_secs = 1         # 1-60
# max_reconnect_delay_secs = 30    # >= reconnect_delay_secs, <= 600

[execution]
base_url = "https://emkc.org/api/v2/piston"
# connect_timeout_secs = 10        # 1-120
# request_timeout_secs = 60        # 1-600

[editor]
# autosave_interval_ms = 2000      # 250-60000
# default_language = "Javascript"  # Cpp, Javascript, Typescript, Python, Java, Rust
# notification_capacity = 8        # 1-64

[problems]
# catalog_path = "/path/to/problems.toml"

[logging]
# level = "info"                   # trace, debug, info, warn, error
"##
    .to_string()
}
