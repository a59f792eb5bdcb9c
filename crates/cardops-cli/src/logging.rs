//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: rejected submissions, encoding fallbacks
//! - `info`: import and export progress, summary counts
//! - `debug`: per-file and per-batch details
//! - `trace`: skipped rows and field values (values need `--log-data`)
//!
//! Cell values carry personal data (CPF, names). They are only written to
//! the log when `--log-data` is set; otherwise [`redact_value`] replaces them.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when row-level logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Crates whose events follow the configured level.
const CRATES: &[&str] = &[
    "cardops",
    "cardops_cli",
    "cardops_core",
    "cardops_ingest",
    "cardops_map",
    "cardops_model",
    "cardops_report",
    "cardops_standards",
    "cardops_validate",
];

pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input when data logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the configured level when it is set.
    pub use_env_filter: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Write to this file instead of stderr. File logs carry timestamps.
    pub log_file: Option<PathBuf>,
    /// Whether personal data may be logged.
    pub log_data: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);
    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(format_layer(config, writer))
        .init();
}

/// Terminal output omits the time; JSON and file logs carry it.
fn format_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let timestamps = config.log_file.is_some();
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.with_ansi && config.format != LogFormat::Json)
        .with_target(false);
    match (config.format, timestamps) {
        (LogFormat::Json, _) => layer
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        (LogFormat::Pretty, true) => layer.boxed(),
        (LogFormat::Pretty, false) => layer.without_time().boxed(),
    }
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Directive string for our crates at `level`; other crates stay at `warn`.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|name| format!("{name}={level}")));
    directives.join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Seek, SeekFrom};

    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("cardops_ingest=debug"));
        assert!(directives.contains("cardops_validate=debug"));
    }

    fn capture(config: &LogConfig) -> String {
        let mut file = tempfile::tempfile().expect("temp file");
        let writer = SharedFileWriter::new(file.try_clone().expect("clone handle"));
        let subscriber = tracing_subscriber::registry().with(format_layer(config, writer));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(rows = 3, "grid ready");
        });
        let mut out = String::new();
        file.seek(SeekFrom::Start(0)).expect("rewind");
        file.read_to_string(&mut out).expect("read log");
        out
    }

    #[test]
    fn terminal_output_has_no_timestamp() {
        let config = LogConfig {
            format: LogFormat::Compact,
            with_ansi: false,
            ..LogConfig::default()
        };
        let out = capture(&config);
        assert!(out.trim_start().starts_with("INFO"), "{out}");
        assert!(out.contains("grid ready"));
        assert!(out.contains("rows=3"));
    }

    #[test]
    fn file_output_starts_with_timestamp() {
        let config = LogConfig {
            format: LogFormat::Compact,
            with_ansi: false,
            log_file: Some(PathBuf::from("cardops.log")),
            ..LogConfig::default()
        };
        let out = capture(&config);
        assert!(out.starts_with(|c: char| c.is_ascii_digit()), "{out}");
    }

    #[test]
    fn json_output_is_one_object_per_event() {
        let config = LogConfig {
            format: LogFormat::Json,
            ..LogConfig::default()
        };
        let out = capture(&config);
        let event: serde_json::Value =
            serde_json::from_str(out.lines().next().expect("one line")).expect("json line");
        assert_eq!(event["fields"]["message"], "grid ready");
        assert_eq!(event["fields"]["rows"], 3);
        assert!(event["timestamp"].is_string());
    }

    #[test]
    fn values_are_redacted_by_default() {
        assert!(!log_data_enabled());
        assert_eq!(redact_value("52998224725"), REDACTED_VALUE);
    }
}
