//! context-logger service binary.
//!
//! ```text
//!   request ──▶ TraceLayer ──▶ TimeoutLayer ──▶ LoggerLayer ──▶ handler
//!                                                  │               │
//!                                      attach(root logger)   retrieve(ctx)
//!                                                                  │
//!                                                                  ▼
//!                                                          sink (JSON / tracing)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use context_logger::lifecycle::{startup, Shutdown};
use context_logger::observability::DEFAULT_LOG_FILTER;

#[derive(Parser)]
#[command(name = "context-logger")]
#[command(about = "HTTP service with request-scoped structured logging", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Process diagnostics go through tracing; request entries go through the root logger.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("context-logger v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(cli.config.as_deref(), Shutdown::new()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}
