//! Opt-in logging for the extension module
//!
//! The module is loaded into someone else's interpreter, so nothing is
//! installed unless `REPRO_LOG` asks for it, and an existing global
//! subscriber always wins.
//!
//! Environment:
//! - `REPRO_LOG`: filter directives, e.g. `trace` or `repro=debug`
//! - `REPRO_LOG_FORMAT`: `pretty`, `compact` (default) or `json`
//! - `REPRO_LOG_DIR`: write `repro.log` into this directory instead of stderr

use once_cell::sync::OnceCell;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Whether `init` installed the global subscriber; set on the first call
static LOGGER: OnceCell<bool> = OnceCell::new();

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-line
    Pretty,
    /// One line per event
    Compact,
    /// JSON, one object per line
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    /// Single non-rotating file `<directory>/<prefix>.log`
    File { directory: String, prefix: String },
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub output: LogOutput,
    /// Comma-separated filter directives (e.g., "repro=trace")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Build config from `REPRO_LOG*`; `None` when `REPRO_LOG` is unset
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let filter = var("REPRO_LOG").filter(|f| !f.trim().is_empty())?;
        let mut config = Self::new().with_filter(filter);

        if let Some(format) = var("REPRO_LOG_FORMAT").as_deref().and_then(LogFormat::parse) {
            config = config.with_format(format);
        }

        if let Some(directory) = var("REPRO_LOG_DIR") {
            config = config.with_output(LogOutput::File {
                directory,
                prefix: crate::MODULE_NAME.to_string(),
            });
        }

        Some(config)
    }
}

/// Install the global subscriber, at most once per process.
///
/// Does nothing if the embedding process already set a global subscriber.
/// Writes are synchronous: the process this module runs in is expected to
/// crash right after the event it most needs to see.
pub fn init(config: LogConfig) {
    LOGGER.get_or_init(|| {
        let filter = build_filter(&config);
        let (writer, _) = make_writer(&config.output);

        let layer = match config.format {
            LogFormat::Pretty => fmt::layer().with_writer(writer).pretty().boxed(),
            LogFormat::Compact => fmt::layer().with_writer(writer).compact().boxed(),
            LogFormat::Json => fmt::layer().with_writer(writer).json().boxed(),
        };

        tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_ok()
    });
}

/// Check if this module installed the global subscriber
pub fn is_initialized() -> bool {
    LOGGER.get().copied().unwrap_or(false)
}

/// Blocking writer for `output`, along with the output actually used.
///
/// A log directory that cannot be opened falls back to stderr.
fn make_writer(output: &LogOutput) -> (BoxMakeWriter, LogOutput) {
    if let LogOutput::File { directory, prefix } = output {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(prefix)
            .filename_suffix("log")
            .build(directory);

        match appender {
            Ok(appender) => return (BoxMakeWriter::new(appender), output.clone()),
            Err(e) => eprintln!("repro: cannot log to {}: {}; using stderr", directory, e),
        }
    }

    (BoxMakeWriter::new(std::io::stderr), LogOutput::Stderr)
}

/// Invalid directives are reported on stderr and skipped.
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder().parse_lossy(config.filter.as_deref().unwrap_or_default())
}
