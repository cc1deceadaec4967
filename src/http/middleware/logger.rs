//! Logger propagation middleware.
//!
//! Wraps a service so every request reaches it with the root logger attached
//! to its [`ScopedContext`]. The layer holds nothing but a read-only handle to
//! the root logger, so one instance serves any number of concurrent requests.

use std::task::{Context, Poll};

use axum::http::Request;
use tower::{Layer, Service};

use crate::context::ScopedContext;
use crate::observability::logging::{attach, Logger};

/// Layer attaching `root` to each request's context.
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    root: Logger,
}

impl LoggerLayer {
    pub fn new(root: Logger) -> Self {
        Self { root }
    }
}

/// Handler transformer: `adapter(root).layer(handler)` is `handler` with the
/// root logger in scope.
pub fn adapter(root: Logger) -> LoggerLayer {
    LoggerLayer::new(root)
}

impl<S> Layer<S> for LoggerLayer {
    type Service = LoggerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggerService {
            inner,
            root: self.root.clone(),
        }
    }
}

/// Service produced by [`LoggerLayer`].
#[derive(Debug, Clone)]
pub struct LoggerService<S> {
    inner: S,
    root: Logger,
}

impl<S, B> Service<Request<B>> for LoggerService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let parent = request
            .extensions()
            .get::<ScopedContext>()
            .cloned()
            .unwrap_or_default();
        request
            .extensions_mut()
            .insert(attach(&parent, self.root.clone()));
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::logging::{retrieve, LogLevel, LoggerFactory, NopSink};
    use std::convert::Infallible;
    use std::sync::Arc;
    use tower::{service_fn, ServiceExt};

    fn root() -> Logger {
        LoggerFactory::build(LogLevel::Info, Arc::new(NopSink), [])
    }

    async fn observed_logger(request: Request<()>) -> Result<Logger, Infallible> {
        let ctx = request
            .extensions()
            .get::<ScopedContext>()
            .cloned()
            .unwrap_or_default();
        Ok(retrieve(&ctx))
    }

    #[tokio::test]
    async fn test_inner_sees_root_logger() {
        let root = root();
        let service = adapter(root.clone()).layer(service_fn(observed_logger));

        let seen = service.oneshot(Request::new(())).await.unwrap();
        assert_eq!(seen, root);
    }

    #[tokio::test]
    async fn test_without_adapter_inner_sees_nop() {
        let seen = service_fn(observed_logger)
            .oneshot(Request::new(()))
            .await
            .unwrap();
        assert!(seen.is_nop());
    }

    #[tokio::test]
    async fn test_existing_context_is_kept_as_parent() {
        use crate::context::ContextKey;

        struct Tenant;
        impl ContextKey for Tenant {
            type Value = &'static str;
        }

        let root = root();
        let service = adapter(root.clone()).layer(service_fn(|request: Request<()>| async move {
            let ctx = request.extensions().get::<ScopedContext>().cloned().unwrap();
            Ok::<_, Infallible>((ctx.get::<Tenant>().copied(), retrieve(&ctx)))
        }));

        let mut request = Request::new(());
        let original = ScopedContext::new().derive::<Tenant>("acme");
        request.extensions_mut().insert(original.clone());

        let (tenant, logger) = service.oneshot(request).await.unwrap();
        assert_eq!(tenant, Some("acme"));
        assert_eq!(logger, root);
        assert!(retrieve(&original).is_nop());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_root() {
        let root = root();
        let service = adapter(root.clone()).layer(service_fn(observed_logger));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.oneshot(Request::new(())).await.unwrap() })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), root);
        }
    }
}
