//! Request middleware.

pub mod logger;

pub use logger::{adapter, LoggerLayer, LoggerService};
