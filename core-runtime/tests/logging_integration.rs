//! Integration tests for logging system

use bridge_traits::time::LogLevel;
use core_runtime::logging::{
    init_logging, mask_email, redact_if_sensitive, LogFormat, LoggingConfig,
};

#[test]
fn test_logging_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

#[test]
fn test_pii_redaction_credentials() {
    assert_eq!(redact_if_sensitive("access_token", "ya29.a0"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("refresh_token", "1//0g"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Bearer x"), "[REDACTED]");
}

#[test]
fn test_pii_redaction_emails() {
    let redacted = redact_if_sensitive("email", "riley@example.com");

    assert!(redacted.starts_with('r'));
    assert!(redacted.contains("[REDACTED]"));
    assert!(!redacted.contains("example.com"));
    assert_eq!(redacted, mask_email("riley@example.com"));
}

#[test]
fn test_pii_redaction_normal_values() {
    assert_eq!(redact_if_sensitive("status", "403"), "403");
    assert_eq!(redact_if_sensitive("display_name", "Riley"), "Riley");
}

#[test]
fn test_init_logging_twice_fails() {
    // The global subscriber can only be installed once per process
    let config = LoggingConfig::default().with_format(LogFormat::Compact);
    assert!(init_logging(config.clone()).is_ok());
    assert!(init_logging(config).is_err());
}
