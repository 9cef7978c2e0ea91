//! Leveled diagnostics delivered to host-registered sinks.
//!
//! The engine never logs through process-global state. Every component that
//! emits diagnostics holds a [`Logger`] handle, which owns a list of
//! [`LogSink`]s. Cloning a `Logger` shares the sink list, so a sink added
//! after construction is seen by every component built from the same handle.
//!
//! - [`TracingSink`] forwards records to the `tracing` crate (the default).
//! - [`CollectingSink`] stores records for assertions in tests.
//! - Any `Fn(&LogRecord) + Send + Sync` closure is a sink, which is how host
//!   callbacks are registered.
//!
//! # Example
//!
//! ```
//! use scorbit_sync::logging::{CollectingSink, LogLevel, Logger};
//! use scorbit_sync::sdk_warn;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(CollectingSink::new());
//! let logger = Logger::silent();
//! logger.add_sink(sink.clone());
//!
//! sdk_warn!(logger, "ball {} is out of range", 12);
//! assert!(sink.contains(LogLevel::Warn, "out of range"));
//! ```

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use web_time::{SystemTime, UNIX_EPOCH};

/// Longest message handed to sinks; longer ones are elided in the middle.
pub const MAX_LOG_MESSAGE_LENGTH: usize = 511;

const ELIDE_MARKER: &str = " ... ";

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum LogLevel {
    /// Verbose diagnostics (skipped mode, unchanged score ...).
    Debug = 0,
    /// Normal lifecycle messages.
    Info = 1,
    /// Something was ignored or degraded but the engine continued.
    Warn = 2,
    /// An operation failed.
    Error = 3,
}

impl LogLevel {
    /// Returns a string representation suitable for log prefixes.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: LogLevel,
    /// Message text, at most [`MAX_LOG_MESSAGE_LENGTH`] bytes.
    pub message: String,
    /// Source file name (without directories).
    pub file: &'static str,
    /// Source line.
    pub line: u32,
    /// Milliseconds since the Unix epoch at which the record was created.
    pub timestamp_ms: i64,
}

impl LogRecord {
    /// Creates a record stamped with the current wall-clock time.
    ///
    /// `file` may be a full path as produced by `file!()`; only the file name
    /// is kept.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>, file: &'static str, line: u32) -> Self {
        let message = message.into();
        let message = if message.len() > MAX_LOG_MESSAGE_LENGTH {
            elide_middle(&message, MAX_LOG_MESSAGE_LENGTH)
        } else {
            message
        };
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as i64);

        Self {
            level,
            message,
            file: file.rsplit(['/', '\\']).next().unwrap_or(file),
            line,
            timestamp_ms,
        }
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}:{})",
            self.level, self.message, self.file, self.line
        )
    }
}

/// Keeps the head and tail of `message` and joins them with `" ... "`.
fn elide_middle(message: &str, max_len: usize) -> String {
    let half = max_len.saturating_sub(ELIDE_MARKER.len()) / 2;

    let mut head_end = half.min(message.len());
    while !message.is_char_boundary(head_end) {
        head_end -= 1;
    }
    let mut tail_start = message.len().saturating_sub(half);
    while !message.is_char_boundary(tail_start) {
        tail_start += 1;
    }

    let mut out = String::with_capacity(max_len);
    out.push_str(message.get(..head_end).unwrap_or_default());
    out.push_str(ELIDE_MARKER);
    out.push_str(message.get(tail_start..).unwrap_or_default());
    out
}

/// Receives log records.
///
/// Sinks are called on whichever thread produced the record, including
/// scheduler worker threads, so implementations must be quick and
/// thread-safe.
pub trait LogSink: Send + Sync {
    /// Called once per record.
    fn on_log(&self, record: &LogRecord);
}

impl<F> LogSink for F
where
    F: Fn(&LogRecord) + Send + Sync,
{
    fn on_log(&self, record: &LogRecord) {
        self(record);
    }
}

/// Sink that forwards records to the `tracing` crate.
///
/// `location` and `timestamp_ms` are emitted as structured fields.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn on_log(&self, record: &LogRecord) {
        let location = format!("{}:{}", record.file, record.line);
        let timestamp_ms = record.timestamp_ms;
        match record.level {
            LogLevel::Debug => {
                tracing::debug!(location = %location, timestamp_ms, "{}", record.message);
            },
            LogLevel::Info => {
                tracing::info!(location = %location, timestamp_ms, "{}", record.message);
            },
            LogLevel::Warn => {
                tracing::warn!(location = %location, timestamp_ms, "{}", record.message);
            },
            LogLevel::Error => {
                tracing::error!(location = %location, timestamp_ms, "{}", record.message);
            },
        }
    }
}

/// Sink that stores every record, for tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<LogRecord>>,
}

impl CollectingSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all collected records.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of collected records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Checks whether a record of `level` containing `needle` was collected.
    #[must_use]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    /// Returns all records at or above `min_level`.
    #[must_use]
    pub fn records_at_level(&self, min_level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level >= min_level)
            .cloned()
            .collect()
    }

    /// Clears all collected records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for CollectingSink {
    fn on_log(&self, record: &LogRecord) {
        self.records.lock().push(record.clone());
    }
}

/// Shared handle owning the list of sinks.
///
/// Cheap to clone; clones share the same sink list. Having no sinks is not
/// an error: records are simply dropped.
#[derive(Clone)]
pub struct Logger {
    sinks: Arc<RwLock<Vec<Arc<dyn LogSink>>>>,
}

impl Logger {
    /// Creates a logger with no sinks.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            sinks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a logger with the given sinks.
    #[must_use]
    pub fn from_sinks(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self {
            sinks: Arc::new(RwLock::new(sinks)),
        }
    }

    /// Adds a sink. It receives every record logged afterwards.
    pub fn add_sink(&self, sink: Arc<dyn LogSink>) {
        self.sinks.write().push(sink);
    }

    /// Removes all sinks.
    pub fn clear(&self) {
        self.sinks.write().clear();
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Delivers `record` to every sink.
    pub fn log(&self, record: &LogRecord) {
        for sink in self.sinks.read().iter() {
            sink.on_log(record);
        }
    }
}

impl Default for Logger {
    /// A logger forwarding to [`TracingSink`].
    fn default() -> Self {
        Self::from_sinks(vec![Arc::new(TracingSink)])
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("num_sinks", &self.sink_count())
            .finish()
    }
}

/// Logs a formatted message at the given level, tagging it with the call site.
///
/// ```text
/// sdk_log!(logger, LogLevel::Info, "message");
/// sdk_log!(logger, LogLevel::Info, "message with {}", args);
/// ```
#[macro_export]
macro_rules! sdk_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let record = $crate::logging::LogRecord::new($level, format!($($arg)+), file!(), line!());
        $logger.log(&record);
    }};
}

/// Logs at [`LogLevel::Debug`](crate::logging::LogLevel::Debug).
#[macro_export]
macro_rules! sdk_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::sdk_log!($logger, $crate::logging::LogLevel::Debug, $($arg)+)
    };
}

/// Logs at [`LogLevel::Info`](crate::logging::LogLevel::Info).
#[macro_export]
macro_rules! sdk_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::sdk_log!($logger, $crate::logging::LogLevel::Info, $($arg)+)
    };
}

/// Logs at [`LogLevel::Warn`](crate::logging::LogLevel::Warn).
#[macro_export]
macro_rules! sdk_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::sdk_log!($logger, $crate::logging::LogLevel::Warn, $($arg)+)
    };
}

/// Logs at [`LogLevel::Error`](crate::logging::LogLevel::Error).
#[macro_export]
macro_rules! sdk_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::sdk_log!($logger, $crate::logging::LogLevel::Error, $($arg)+)
    };
}
