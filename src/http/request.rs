//! Request context extraction.
//!
//! # Responsibilities
//! - Hand handlers the [`ScopedContext`] the middleware stored in the request
//! - Fall back to an empty context when no middleware ran
//!
//! # Design Decisions
//! - Extraction never fails; a handler mounted without the logger layer just
//!   logs into the no-op logger

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Extensions;

use crate::context::ScopedContext;

/// The context stored in `extensions`, or an empty one.
pub fn request_context(extensions: &Extensions) -> ScopedContext {
    extensions.get::<ScopedContext>().cloned().unwrap_or_default()
}

impl<S> FromRequestParts<S> for ScopedContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(request_context(&parts.extensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::{attach, retrieve, LogLevel, LoggerFactory, NopSink};
    use axum::http::Request;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_extract_missing_context() {
        let (mut parts, _) = Request::new(()).into_parts();
        let ctx = ScopedContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(ctx.is_empty());
        assert!(retrieve(&ctx).is_nop());
    }

    #[tokio::test]
    async fn test_extract_attached_context() {
        let logger = LoggerFactory::build(LogLevel::Info, Arc::new(NopSink), []);
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(attach(&ScopedContext::new(), logger.clone()));

        let (mut parts, _) = request.into_parts();
        let ctx = ScopedContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(retrieve(&ctx), logger);
    }
}
