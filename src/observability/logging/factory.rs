//! Root logger construction.

use std::sync::Arc;

use super::field::Field;
use super::level::LogLevel;
use super::logger::{Logger, LoggerOption, LoggerOptions};
use super::sink::{JsonSink, Sink, SinkError, TracingSink};
use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// Error building a logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log sink unavailable: {0}")]
    Sink(#[from] SinkError),

    #[error("file output selected but no log path configured")]
    MissingPath,
}

/// Builds the process root logger.
pub struct LoggerFactory;

impl LoggerFactory {
    /// Build a logger over an already opened sink.
    ///
    /// At `Debug` the logger captures a stack with every entry and skips no
    /// frames. At any other level neither applies. `options` are applied in
    /// order after that default, so they can override it.
    pub fn build(
        level: LogLevel,
        sink: Arc<dyn Sink>,
        options: impl IntoIterator<Item = LoggerOption>,
    ) -> Logger {
        let mut resolved = LoggerOptions::default();
        if level == LogLevel::Debug {
            resolved.stacktrace = Some(LogLevel::Debug);
            resolved.caller_skip = 0;
        }

        let mut fields: Vec<Field> = Vec::new();
        let mut names: Vec<String> = Vec::new();
        for option in options {
            match option {
                LoggerOption::AddStacktrace(min) => resolved.stacktrace = Some(min),
                LoggerOption::WithoutStacktrace => resolved.stacktrace = None,
                LoggerOption::WithCaller(enabled) => resolved.caller = enabled,
                LoggerOption::AddCallerSkip(n) => {
                    resolved.caller_skip = resolved.caller_skip.saturating_add(n)
                }
                LoggerOption::Fields(extra) => fields.extend(extra),
                LoggerOption::Named(name) => names.push(name),
            }
        }

        let mut logger = Logger::new(sink, level, resolved);
        for name in &names {
            logger = logger.named(name);
        }
        if !fields.is_empty() {
            logger = logger.with(fields);
        }
        logger
    }

    /// Open the configured output and build the root logger on it.
    pub fn from_config(
        config: &LoggingConfig,
        options: impl IntoIterator<Item = LoggerOption>,
    ) -> Result<Logger, LoggerError> {
        let sink = open_sink(config)?;
        let defaults = [LoggerOption::WithCaller(true)];
        Ok(Self::build(
            config.level,
            sink,
            defaults.into_iter().chain(options),
        ))
    }
}

/// Open the sink described by `config`.
pub fn open_sink(config: &LoggingConfig) -> Result<Arc<dyn Sink>, LoggerError> {
    let sink: Arc<dyn Sink> = match (config.format, config.output) {
        (LogFormat::Tracing, _) => Arc::new(TracingSink),
        (LogFormat::Json, LogOutput::Stdout) => Arc::new(JsonSink::stdout()),
        (LogFormat::Json, LogOutput::Stderr) => Arc::new(JsonSink::stderr()),
        (LogFormat::Json, LogOutput::File) => {
            let path = config.path.as_deref().ok_or(LoggerError::MissingPath)?;
            Arc::new(JsonSink::file(path)?)
        }
    };
    Ok(sink)
}
