//! The structured logger handle.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

use chrono::Utc;

use super::field::Field;
use super::level::LogLevel;
use super::sink::{Entry, NopSink, Sink, SinkError};

/// Emission behavior fixed when a logger is built.
///
/// Shared unchanged by every logger derived from the same root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggerOptions {
    /// Capture a stack trace for entries at or above this level.
    pub stacktrace: Option<LogLevel>,
    /// Annotate entries with the emitting call site.
    pub caller: bool,
    /// Leading frames dropped from captured stack traces.
    pub caller_skip: usize,
}

/// Behavior flags accepted by [`LoggerFactory::build`](super::LoggerFactory::build).
#[derive(Debug, Clone, PartialEq)]
pub enum LoggerOption {
    /// Capture stacks for entries at or above the level.
    AddStacktrace(LogLevel),
    /// Never capture stacks.
    WithoutStacktrace,
    /// Turn call-site annotation on or off.
    WithCaller(bool),
    /// Drop this many more leading frames from captured stacks.
    AddCallerSkip(usize),
    /// Attach fields to every entry.
    Fields(Vec<Field>),
    /// Name the root logger.
    Named(String),
}

struct Core {
    sink: Arc<dyn Sink>,
    level: LogLevel,
    options: LoggerOptions,
}

struct Inner {
    /// `None` for the no-op logger.
    core: Option<Arc<Core>>,
    name: Option<String>,
    fields: Vec<Field>,
}

/// An immutable structured logger.
///
/// Cloning shares the same instance. [`with`](Logger::with) and
/// [`named`](Logger::named) return new instances and never touch `self`,
/// so one root logger can be shared by every request without locking.
///
/// Two handles compare equal when they refer to the same instance.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    pub(crate) fn new(sink: Arc<dyn Sink>, level: LogLevel, options: LoggerOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: Some(Arc::new(Core {
                    sink,
                    level,
                    options,
                })),
                name: None,
                fields: Vec::new(),
            }),
        }
    }

    /// The logger that emits nothing.
    pub fn nop() -> Self {
        static NOP: OnceLock<Logger> = OnceLock::new();
        NOP.get_or_init(|| Self {
            inner: Arc::new(Inner {
                core: None,
                name: None,
                fields: Vec::new(),
            }),
        })
        .clone()
    }

    /// Whether this logger discards everything.
    pub fn is_nop(&self) -> bool {
        self.inner.core.is_none()
    }

    /// Minimum level this logger emits, `None` for the no-op logger.
    pub fn level(&self) -> Option<LogLevel> {
        self.inner.core.as_ref().map(|core| core.level)
    }

    /// Options this logger was built with.
    pub fn options(&self) -> LoggerOptions {
        self.inner
            .core
            .as_ref()
            .map(|core| core.options)
            .unwrap_or_default()
    }

    /// Dotted name path, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Fields attached to every entry, oldest first.
    pub fn fields(&self) -> &[Field] {
        &self.inner.fields
    }

    /// Whether an entry at `level` would be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.inner
            .core
            .as_ref()
            .is_some_and(|core| level >= core.level)
    }

    /// Derive a logger carrying `fields` after the existing ones.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut all = self.inner.fields.clone();
        all.extend(fields);
        self.derive(self.inner.name.clone(), all)
    }

    /// Derive a logger whose name is `name` appended to the current path.
    pub fn named(&self, name: &str) -> Logger {
        let path = match (&self.inner.name, name.is_empty()) {
            (current, true) => current.clone(),
            (Some(current), false) => Some(format!("{}.{}", current, name)),
            (None, false) => Some(name.to_string()),
        };
        self.derive(path, self.inner.fields.clone())
    }

    fn derive(&self, name: Option<String>, fields: Vec<Field>) -> Logger {
        Logger {
            inner: Arc::new(Inner {
                core: self.inner.core.clone(),
                name,
                fields,
            }),
        }
    }

    /// Emit `message` at `level`.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        let Some(core) = self.inner.core.as_deref() else {
            return;
        };
        if level < core.level {
            return;
        }

        let caller = if core.options.caller {
            Some(Location::caller())
        } else {
            None
        };
        let stack = core
            .options
            .stacktrace
            .filter(|min| level >= *min)
            .map(|_| capture_stack(core.options.caller_skip));
        let message = message.to_string();

        let entry = Entry {
            level,
            time: Utc::now(),
            logger: self.name(),
            message: &message,
            fields: self.fields(),
            caller,
            stack: stack.as_deref(),
        };
        if let Err(e) = core.sink.write(&entry) {
            tracing::warn!(error = %e, level = %level, "Dropped log entry");
        }
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    /// Emit at `Fatal`. The process keeps running; callers decide what follows.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(LogLevel::Fatal, message);
    }

    /// Flush buffered entries in the underlying sink.
    pub fn sync(&self) -> Result<(), SinkError> {
        match &self.inner.core {
            Some(core) => core.sink.sync(),
            None => NopSink.sync(),
        }
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Logger {}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .field("fields", &self.fields().len())
            .field("options", &self.options())
            .finish()
    }
}

fn capture_stack(skip: usize) -> String {
    let rendered = Backtrace::force_capture().to_string();
    trim_frames(&rendered, skip)
}

/// Drop the first `skip` frames from a rendered backtrace.
fn trim_frames(rendered: &str, skip: usize) -> String {
    if skip == 0 {
        return rendered.to_string();
    }
    let mut frames = 0;
    rendered
        .lines()
        .filter(|line| {
            if is_frame_header(line) {
                frames += 1;
            }
            frames > skip
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Frame headers look like "  12: symbol::path".
fn is_frame_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && trimmed[digits..].starts_with(':')
}
