//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use crate::context;
use crate::errors::{io_error, PaladinError, Result};
use paladin_core_types::schema::CONTEXT_TRACE;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Logger settings this profile stands for
    pub fn config(&self) -> LogConfig {
        match self {
            Profile::Development => LogConfig {
                level: "DEBUG".to_string(),
                ..LogConfig::default()
            },
            Profile::Production => LogConfig {
                json: true,
                ..LogConfig::default()
            },
            Profile::Test => LogConfig::default(),
        }
    }
}

/// Logger settings (`[log]` section of the application config)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level, case-insensitive (`TRACE`, `DEBUG`, `INFO`, `WARNING`, `ERROR`)
    pub level: String,
    /// Append to this file instead of writing to stderr
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
    /// Force ANSI colors on or off; defaults to on for the console, off for files
    pub colorize: Option<bool>,
    /// Context variables printed after `trace` in every line
    pub custom_extra: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: None,
            json: false,
            colorize: None,
            custom_extra: Vec::new(),
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directive for the configured level
    pub fn level_directive(&self) -> Result<&'static str> {
        let directive = match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" | "success" => "info",
            "warn" | "warning" => "warn",
            "error" | "critical" => "error",
            other => {
                return Err(PaladinError::Config {
                    message: format!("unknown log level {:?}", other),
                }
                .into())
            }
        };
        Ok(directive)
    }

    /// Keys rendered in the context column
    pub fn context_keys(&self) -> Vec<String> {
        std::iter::once(CONTEXT_TRACE.to_string())
            .chain(self.custom_extra.iter().cloned())
            .collect()
    }
}

/// Prefixes every line with the `[trace extra...]` context column
pub struct ContextFormat<F> {
    inner: F,
    keys: Vec<String>,
}

impl<F> ContextFormat<F> {
    pub fn new(inner: F, keys: Vec<String>) -> Self {
        Self { inner, keys }
    }
}

impl<S, N, F> FormatEvent<S, N> for ContextFormat<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "[{}] ", context::render(&self.keys))?;
        self.inner.format_event(ctx, writer, event)
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility from a profile
///
/// This function should be called once at application startup; later calls
/// are ignored.
///
/// # Example
///
/// ```
/// use paladin_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    if profile == Profile::Test {
        // Test capture is initialized separately via init_test_capture()
        INIT_ONCE.call_once(|| {
            let _ = tracing_subscriber::registry().try_init();
        });
        return;
    }
    // Profile presets always carry a valid level and no file
    let _ = init_with_config(&profile.config());
}

/// Initialize the logging facility from explicit settings
///
/// # Errors
///
/// Fails when the level is unknown or the log file cannot be opened.
pub fn init_with_config(config: &LogConfig) -> Result<()> {
    let directive = config.level_directive()?;
    let writer = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| io_error(path, e))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    INIT_ONCE.call_once(|| install(config, directive, writer));
    Ok(())
}

fn install(config: &LogConfig, directive: &str, writer: BoxMakeWriter) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let ansi = config.colorize.unwrap_or(config.file.is_none());

    // A second global subscriber (e.g. a test harness) is not an error here
    let _ = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init()
    } else {
        let format = ContextFormat::new(
            tracing_subscriber::fmt::format().with_ansi(ansi),
            config.context_keys(),
        );
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .event_format(format)
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Test);
    }

    #[test]
    fn test_level_directive_is_case_insensitive() {
        let mut config = LogConfig::default();
        assert_eq!(config.level_directive().unwrap(), "info");

        config.level = "Trace".to_string();
        assert_eq!(config.level_directive().unwrap(), "trace");

        config.level = "WARNING".to_string();
        assert_eq!(config.level_directive().unwrap(), "warn");
    }

    #[test]
    fn test_unknown_level_is_config_error() {
        let config = LogConfig {
            level: "loud".to_string(),
            ..LogConfig::default()
        };
        let err = config.level_directive().unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::Config);
    }

    #[test]
    fn test_context_keys_start_with_trace() {
        let config = LogConfig {
            custom_extra: vec!["user".to_string()],
            ..LogConfig::default()
        };
        assert_eq!(config.context_keys(), vec!["trace", "user"]);
    }

    #[test]
    fn test_profile_presets() {
        assert_eq!(Profile::Development.config().level, "DEBUG");
        assert!(Profile::Production.config().json);
        assert!(!Profile::Test.config().json);
    }
}
