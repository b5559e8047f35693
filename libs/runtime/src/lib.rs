//! Runtime support for the inventory client: layered configuration and
//! logging setup. Everything here is front-end plumbing; the resource and
//! auth crates never read configuration themselves.

pub mod config;
pub mod logging;

pub use config::{ApiConfig, AppConfig, CliArgs, LoggingConfig, Section, SessionConfig};
