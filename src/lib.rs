//! HTTP service with context-scoped structured logging.
//!
//! One root [`Logger`](observability::logging::Logger) is built at startup and
//! attached to every request's [`ScopedContext`](context::ScopedContext) by the
//! logger middleware. Handlers retrieve it from their context, enrich it, and
//! log; a context without a logger yields the no-op logger.

pub mod config;
pub mod context;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use context::ScopedContext;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::logging::{LogLevel, Logger, LoggerFactory};
