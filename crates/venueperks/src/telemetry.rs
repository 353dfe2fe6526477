//! Tracing setup for the loyalty service.
//!
//! An explicit `RUST_LOG` always wins; otherwise the configured level from
//! `TelemetryConfig` applies. Targets stay on so ladder-misconfiguration
//! warnings can be traced back to the module that raised them.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInitialized(Box<dyn std::error::Error + Send + Sync>),
}

pub(crate) fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        value: config.log_level.clone(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn config(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
        }
    }

    #[test]
    fn configured_level_builds_a_filter() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        build_filter(&config("debug")).expect("plain level parses");
        build_filter(&config("venueperks=warn,info")).expect("directive list parses");
    }

    #[test]
    fn malformed_level_is_a_typed_error() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let err = build_filter(&config("!!nonsense!!")).expect_err("garbage rejected");
        match err {
            TelemetryError::Filter { value, .. } => assert_eq!(value, "!!nonsense!!"),
            other => panic!("expected filter error, got {other:?}"),
        }
    }

    #[test]
    fn rust_log_overrides_the_configured_level() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("RUST_LOG", "trace");
        // Even a malformed configured level is irrelevant once RUST_LOG is set.
        build_filter(&config("!!nonsense!!")).expect("RUST_LOG wins");
        env::remove_var("RUST_LOG");
    }
}
