//! Diagnostics for `ccprop` runs.
//!
//! Load summaries, per-pass events and run spans are emitted through
//! `tracing`. They go to `stderr`, leaving `stdout` to the component report.

use std::str::FromStr;
use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LOG_FORMAT_ENV;

/// Level directive used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVE: &str = "info";

/// Format chosen by the first successful [`init_logging`] call.
static ACTIVE_FORMAT: OnceLock<LogFormat> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    /// `CCPROP_LOG_FORMAT` is set but is not valid UTF-8.
    #[error("`{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        name: &'static str,
        #[source]
        source: env::VarError,
    },
    /// `CCPROP_LOG_FORMAT` names neither `human` nor `json`.
    #[error("unknown log format `{provided}`, use `human` or `json`")]
    UnsupportedFormat { provided: String },
    /// Another global subscriber was installed first.
    #[error("could not install the tracing subscriber: {source}")]
    InstallFailed {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// How log records are rendered on `stderr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain single-line records.
    #[default]
    Human,
    /// One JSON object per record, with the enclosing run span attached.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    /// Reads the format from `CCPROP_LOG_FORMAT`, `Human` when it is unset.
    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
            Err(source) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Sets up logging for a run and returns the format in use.
///
/// `RUST_LOG` selects the levels (default `info`, so a run logs the load
/// summary and one convergence record per strategy; `debug` adds one record
/// per pass). Closing the load and run spans logs their busy time.
///
/// Calling it again returns the format chosen the first time. If some other
/// subscriber already owns the global slot, a note goes to `stderr` and that
/// subscriber stays in place.
///
/// # Errors
/// Returns [`LoggingError`] if `CCPROP_LOG_FORMAT` is not UTF-8 or names an
/// unknown format.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = ACTIVE_FORMAT.get() {
        return Ok(*format);
    }

    let format = LogFormat::from_env()?;
    if let Err(err) = install_subscriber(format) {
        eprintln!("ccprop: keeping the existing log subscriber ({err})");
    }
    Ok(*ACTIVE_FORMAT.get_or_init(|| format))
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let stderr_layer = match format {
        LogFormat::Human => stderr_layer.boxed(),
        LogFormat::Json => stderr_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}
