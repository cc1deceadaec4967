//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → middleware/logger.rs (attach root logger to the request context)
//!     → request.rs (hand the context to the handler)
//!     → handlers.rs (retrieve logger, count, log)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{adapter, LoggerLayer};
pub use request::request_context;
pub use server::{AppState, HttpServer, ServerError};
