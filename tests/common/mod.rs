//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use context_logger::http::{HttpServer, ServerError};
use context_logger::lifecycle::Shutdown;
use context_logger::observability::logging::{
    Entry, Field, LogLevel, Logger, LoggerFactory, LoggerOption, Sink, SinkError,
};
use context_logger::ServiceConfig;

/// Owned copy of an entry seen by [`RecordingSink`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub level: LogLevel,
    pub logger: Option<String>,
    pub message: String,
    pub fields: Vec<Field>,
    pub stacktrace: bool,
}

impl Recorded {
    /// Latest value for `key`.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .rev()
            .find(|f| f.key() == key)
            .map(|f| f.value())
    }
}

/// Sink that records every entry and counts flushes.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Recorded>>,
    syncs: Mutex<usize>,
    fail_sync: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A sink whose `sync` always fails.
    pub fn failing_sync() -> Arc<Self> {
        Arc::new(Self {
            fail_sync: true,
            ..Self::default()
        })
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.entries.lock().clone()
    }

    pub fn syncs(&self) -> usize {
        *self.syncs.lock()
    }
}

impl Sink for RecordingSink {
    fn write(&self, entry: &Entry<'_>) -> Result<(), SinkError> {
        self.entries.lock().push(Recorded {
            level: entry.level,
            logger: entry.logger.map(str::to_string),
            message: entry.message.to_string(),
            fields: entry.fields.to_vec(),
            stacktrace: entry.stack.is_some(),
        });
        Ok(())
    }

    fn sync(&self) -> Result<(), SinkError> {
        *self.syncs.lock() += 1;
        if self.fail_sync {
            return Err(SinkError::Io(std::io::Error::other("sink offline")));
        }
        Ok(())
    }
}

/// Root logger over `sink`.
pub fn root_logger(level: LogLevel, sink: &Arc<RecordingSink>, options: Vec<LoggerOption>) -> Logger {
    LoggerFactory::build(level, sink.clone(), options)
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}

/// Start a server on 127.0.0.1 with an OS-assigned port.
pub async fn spawn_server(config: ServiceConfig, root: Logger) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(&config, root);
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestServer {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
