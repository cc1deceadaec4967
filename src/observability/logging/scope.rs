//! Carrying a logger in a [`ScopedContext`].
//!
//! The logger lives in one private slot. Code deep inside request handling
//! calls [`retrieve`] and always gets something it can log to; when no logger
//! was attached that is the no-op logger, so call sites never branch.

use crate::context::{ContextKey, ScopedContext};

use super::field::Field;
use super::logger::Logger;

/// Slot holding the current logger.
struct LoggerSlot;

impl ContextKey for LoggerSlot {
    type Value = Logger;
}

/// Derive a context in which [`retrieve`] yields `logger`.
pub fn attach(ctx: &ScopedContext, logger: Logger) -> ScopedContext {
    ctx.derive::<LoggerSlot>(logger)
}

/// The logger attached to `ctx`, or the no-op logger.
pub fn retrieve(ctx: &ScopedContext) -> Logger {
    ctx.get::<LoggerSlot>().cloned().unwrap_or_else(Logger::nop)
}

/// Enrich the logger in scope with `fields` and attach the result to a new context.
pub fn with_fields(ctx: &ScopedContext, fields: impl IntoIterator<Item = Field>) -> ScopedContext {
    attach(ctx, retrieve(ctx).with(fields))
}

/// Method forms of the free functions, for call chains.
pub trait ContextLoggerExt {
    fn with_logger(&self, logger: Logger) -> ScopedContext;
    fn logger(&self) -> Logger;
    fn with_log_fields(&self, fields: impl IntoIterator<Item = Field>) -> ScopedContext;
}

impl ContextLoggerExt for ScopedContext {
    fn with_logger(&self, logger: Logger) -> ScopedContext {
        attach(self, logger)
    }

    fn logger(&self) -> Logger {
        retrieve(self)
    }

    fn with_log_fields(&self, fields: impl IntoIterator<Item = Field>) -> ScopedContext {
        with_fields(self, fields)
    }
}
