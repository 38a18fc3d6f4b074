use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&CoderoomConfig::default()).is_ok());
}

#[test]
fn autosave_interval_out_of_range() {
    let mut config = CoderoomConfig::default();
    config.editor.autosave_interval_ms = 100;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("editor.autosave_interval_ms"));
}

#[test]
fn channel_url_must_be_websocket() {
    let mut config = CoderoomConfig::default();
    config.channel.url = "http://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("channel.url"));

    config.channel.url = "wss://".into();
    assert!(validate(&config).is_err());

    config.channel.url = "wss://rooms.example.com/socket".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn max_reconnect_delay_must_not_be_below_base() {
    let mut config = CoderoomConfig::default();
    config.channel.reconnect_delay_secs = 10;
    config.channel.max_reconnect_delay_secs = 5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("channel.max_reconnect_delay_secs"));
}

#[test]
fn execution_base_url_must_be_http() {
    let mut config = CoderoomConfig::default();
    config.execution.base_url = "emkc.org/api/v2/piston".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("execution.base_url"));
}

#[test]
fn all_errors_are_collected() {
    let mut config = CoderoomConfig::default();
    config.channel.room = " ".into();
    config.editor.notification_capacity = 0;
    config.editor.default_language = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("channel.room"));
    assert!(err.contains("editor.notification_capacity"));
    assert!(err.contains("editor.default_language"));
    assert_eq!(err.matches("; ").count(), 2);
}
