//! Logging infrastructure for Strongroom.
//!
//! Every crate logs through `tracing`. This crate only decides where the
//! events go: [`init`] installs a global subscriber built from a
//! [`LogConfig`], which can come from `STRONGROOM_LOG_*` environment
//! variables or from the `logging` section of the configuration file.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
    /// Include span events.
    pub span_events: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Directive understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    /// Parse from string. Unknown names fall back to pretty output.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            span_events: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `STRONGROOM_LOG_*` overrides on top of this config.
    ///
    /// `RUST_LOG` is consulted for the level only when
    /// `STRONGROOM_LOG_LEVEL` is unset.
    pub fn with_env_overrides(mut self) -> Self {
        let level = std::env::var("STRONGROOM_LOG_LEVEL").or_else(|_| std::env::var("RUST_LOG"));
        if let Some(l) = level.ok().as_deref().and_then(LogLevel::parse) {
            self.level = l;
        }

        if let Ok(format) = std::env::var("STRONGROOM_LOG_FORMAT") {
            self.format = LogFormat::parse(&format);
        }

        if let Ok(file_path) = std::env::var("STRONGROOM_LOG_FILE") {
            self.file_path = Some(PathBuf::from(file_path));
        }

        if let Ok(source_location) = std::env::var("STRONGROOM_LOG_SOURCE") {
            self.source_location = is_truthy(&source_location);
        }

        if let Ok(span_events) = std::env::var("STRONGROOM_LOG_SPANS") {
            self.span_events = is_truthy(&span_events);
        }

        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Build one formatting layer for the given writer.
fn format_layer<S, W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(config.span_events());

    match config.format {
        LogFormat::Pretty => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Initialize logging with the given configuration.
///
/// `RUST_LOG` directives, when present, take precedence over the configured
/// level. Fails if a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let mut layers = vec![format_layer(&config, io::stderr, true)];

    if let Some(file_path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        layers.push(format_layer(&config, Arc::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};

/// Span helpers for the audit pipeline.
pub mod spans;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("fancy"), LogFormat::Pretty);
    }

    #[test]
    fn test_log_level_from() {
        use tracing_subscriber::filter::LevelFilter;
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::INFO);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
        assert!(!config.source_location);
        assert!(!config.span_events);
        assert_eq!(config.span_events(), FmtSpan::NONE);
    }

    // All environment manipulation lives in this one test so that parallel
    // tests never observe each other's variables.
    #[test]
    fn test_config_from_env() {
        const VARS: [&str; 6] = [
            "STRONGROOM_LOG_LEVEL",
            "STRONGROOM_LOG_FORMAT",
            "STRONGROOM_LOG_FILE",
            "STRONGROOM_LOG_SOURCE",
            "STRONGROOM_LOG_SPANS",
            "RUST_LOG",
        ];
        let saved: Vec<_> = VARS.iter().map(|v| (*v, env::var(v).ok())).collect();

        env::set_var("STRONGROOM_LOG_LEVEL", "debug");
        env::set_var("STRONGROOM_LOG_FORMAT", "json");
        env::set_var("STRONGROOM_LOG_FILE", "/tmp/strongroom.log");
        env::set_var("STRONGROOM_LOG_SOURCE", "true");
        env::set_var("STRONGROOM_LOG_SPANS", "1");
        env::set_var("RUST_LOG", "error");

        let config = LogConfig::from_env();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/strongroom.log")));
        assert!(config.source_location);
        assert!(config.span_events);

        env::remove_var("STRONGROOM_LOG_LEVEL");
        let config = LogConfig::from_env();
        assert_eq!(config.level, LogLevel::Error);

        for (var, value) in saved {
            match value {
                Some(value) => env::set_var(var, value),
                None => env::remove_var(var),
            }
        }
    }

    #[test]
    fn test_file_layer_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let config = LogConfig {
            format: LogFormat::Json,
            file_path: Some(path.clone()),
            ..LogConfig::default()
        };

        let file = std::fs::File::create(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(format_layer::<
            tracing_subscriber::Registry,
            _,
        >(&config, Arc::new(file), false));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(operation = "branch.delete", "audit recorded");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        assert!(line.starts_with('{'));
        assert!(line.contains(r#""operation":"branch.delete""#));
        assert!(line.contains("audit recorded"));
        assert!(!line.contains('\u{1b}'));
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy("0"));
    }

    #[test]
    fn test_span_events_enabled() {
        let config = LogConfig {
            span_events: true,
            ..LogConfig::default()
        };
        assert_eq!(config.span_events(), FmtSpan::NEW | FmtSpan::CLOSE);
    }
}
