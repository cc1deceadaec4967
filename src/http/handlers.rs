//! Request handlers.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::context::ScopedContext;
use crate::http::server::AppState;
use crate::observability::logging::{retrieve, with_fields};
use crate::observability::tracing::{trace_field, TRACE_CONTEXT_HEADER};

/// Body returned by [`nolog`].
pub const NOLOG_BODY: &str = "No Logged\n";

/// `GET /`: numbers the request and writes two entries through the scoped logger.
pub async fn index(
    State(state): State<AppState>,
    ctx: ScopedContext,
    headers: HeaderMap,
) -> StatusCode {
    let request = state.counter.increment();

    let trace = headers
        .get(TRACE_CONTEXT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| trace_field(&state.resource.project_id, value));
    let ctx = match trace {
        Some(field) => with_fields(&ctx, [field]),
        None => ctx,
    };

    let logger = retrieve(&ctx).named("index");
    logger.info(format_args!("[request #{}] First entry", request));
    logger.warn(format_args!("[request #{}] A second entry here!", request));

    StatusCode::OK
}

/// `GET /nolog`: plain text, nothing logged.
pub async fn nolog() -> &'static str {
    NOLOG_BODY
}
