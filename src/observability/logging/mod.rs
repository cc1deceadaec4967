//! Structured, context-scoped logging.
//!
//! # Data Flow
//! ```text
//! startup:
//!     LoggingConfig → factory.rs (open sink, level defaults) → root Logger
//!
//! per request:
//!     root Logger → scope::attach(ctx) → handler
//!         → scope::retrieve(ctx).named(..).with(..)
//!         → logger.rs (level check, caller, stack)
//!         → sink.rs (JSON line or tracing event)
//!
//! shutdown:
//!     root Logger → sync() → sink flush
//! ```
//!
//! # Design Decisions
//! - Loggers are immutable; deriving allocates a new handle, the root is never
//!   written after construction and is shared without locking
//! - Missing logger in a context degrades to the no-op logger, never an error
//! - Sink failures while emitting are reported on `tracing` and swallowed

mod factory;
mod field;
mod level;
mod logger;
mod scope;
mod sink;

pub use factory::{open_sink, LoggerError, LoggerFactory};
pub use field::{fields_to_object, Field};
pub use level::{LogLevel, ParseLevelError};
pub use logger::{Logger, LoggerOption, LoggerOptions};
pub use scope::{attach, retrieve, with_fields, ContextLoggerExt};
pub use sink::{Entry, JsonSink, NopSink, Sink, SinkError, TracingSink};
