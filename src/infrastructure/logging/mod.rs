//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, with an
//! optional rolling JSON file through tracing-appender.

pub mod config;
pub mod logger;
pub mod redact;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::{parse_log_level, LoggerImpl};
pub use redact::{redact_secret, scrub_secret};
