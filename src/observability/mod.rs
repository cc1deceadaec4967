//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging/ (structured entries through the context-scoped logger)
//!     → metrics.rs (request counter)
//!     → tracing.rs (trace id field for correlation)
//!
//! Consumers:
//!     → Log sink (JSON lines on stdout/stderr/file, or the tracing subscriber)
//! ```
//!
//! # Design Decisions
//! - The process itself reports through `tracing`; request code logs through
//!   the scoped `Logger` it finds in its context
//! - Counters are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod tracing;

/// `EnvFilter` directives used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "context_logger=info,tower_http=info";
