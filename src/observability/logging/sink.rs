//! Log sinks: where emitted entries end up.
//!
//! # Responsibilities
//! - Define the `Sink` interface loggers write through
//! - Encode entries as newline-delimited JSON records
//! - Bridge entries into the process `tracing` subscriber
//!
//! # Design Decisions
//! - Sinks are shared behind `Arc<dyn Sink>` by every logger derived from a root
//! - JSON output is buffered; entries at `Error` and above flush immediately
//! - `sync` is the only way to force buffered records out (used at shutdown)

use std::io::{self, BufWriter, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use super::field::{fields_to_object, Field};
use super::level::LogLevel;

/// Error raised by a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log entry: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single log entry as handed to a sink.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub level: LogLevel,
    pub time: DateTime<Utc>,
    /// Dotted logger name, if the logger was named.
    pub logger: Option<&'a str>,
    pub message: &'a str,
    /// Fields of the emitting logger, oldest first.
    pub fields: &'a [Field],
    /// Call site, when caller annotation is enabled.
    pub caller: Option<&'static Location<'static>>,
    /// Rendered stack trace, when stack capture is enabled for this level.
    pub stack: Option<&'a str>,
}

impl Entry<'_> {
    /// Encode the entry as a flat JSON record.
    ///
    /// Logger fields come first; the reserved keys overwrite any field that
    /// shares their name.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = fields_to_object(self.fields);
        record.insert("severity".into(), self.level.severity().into());
        record.insert(
            "time".into(),
            self.time.to_rfc3339_opts(SecondsFormat::Nanos, true).into(),
        );
        if let Some(logger) = self.logger {
            record.insert("logger".into(), logger.into());
        }
        record.insert("message".into(), self.message.into());
        if let Some(caller) = self.caller {
            record.insert(
                "caller".into(),
                format!("{}:{}", caller.file(), caller.line()).into(),
            );
        }
        if let Some(stack) = self.stack {
            record.insert("stacktrace".into(), stack.into());
        }
        record
    }
}

/// Destination for log entries.
///
/// Implementations must be `Send + Sync`; one sink is shared by every request.
pub trait Sink: Send + Sync {
    /// Write one entry.
    fn write(&self, entry: &Entry<'_>) -> Result<(), SinkError>;

    /// Flush anything buffered.
    fn sync(&self) -> Result<(), SinkError>;
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopSink;

impl Sink for NopSink {
    #[inline]
    fn write(&self, _entry: &Entry<'_>) -> Result<(), SinkError> {
        Ok(())
    }

    #[inline]
    fn sync(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Newline-delimited JSON sink over any writer.
pub struct JsonSink {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
}

impl JsonSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Append to `path`, creating the file and its directory if needed.
    pub fn file(path: &Path) -> Result<Self, SinkError> {
        let open_error = |source: io::Error| SinkError::Open {
            path: path.to_path_buf(),
            source,
        };
        let prefix = path.file_name().ok_or_else(|| {
            open_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "log path has no file name",
            ))
        })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(prefix.to_string_lossy())
            .build(dir)
            .map_err(|e| open_error(io::Error::other(e)))?;
        Ok(Self::new(appender))
    }
}

impl Sink for JsonSink {
    fn write(&self, entry: &Entry<'_>) -> Result<(), SinkError> {
        // Encode before locking.
        let mut line = serde_json::to_vec(&entry.to_record())?;
        line.push(b'\n');

        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        if entry.level >= LogLevel::Error {
            writer.flush()?;
        }
        Ok(())
    }

    fn sync(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for JsonSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSink").finish_non_exhaustive()
    }
}

/// Sink that re-emits entries as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, entry: &Entry<'_>) -> Result<(), SinkError> {
        let logger = entry.logger.unwrap_or_default();
        let fields = Value::Object(fields_to_object(entry.fields));
        let caller = entry
            .caller
            .map(|location| format!("{}:{}", location.file(), location.line()));
        let stack = entry.stack.unwrap_or_default();

        match entry.level {
            LogLevel::Debug => {
                tracing::debug!(logger, %fields, caller = caller.as_deref(), stack, "{}", entry.message)
            }
            LogLevel::Info => {
                tracing::info!(logger, %fields, caller = caller.as_deref(), stack, "{}", entry.message)
            }
            LogLevel::Warn => {
                tracing::warn!(logger, %fields, caller = caller.as_deref(), stack, "{}", entry.message)
            }
            LogLevel::Error => {
                tracing::error!(logger, %fields, caller = caller.as_deref(), stack, "{}", entry.message)
            }
            LogLevel::Fatal => {
                tracing::error!(logger, %fields, caller = caller.as_deref(), stack, fatal = true, "{}", entry.message)
            }
        }
        Ok(())
    }

    fn sync(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
