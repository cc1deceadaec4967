//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the root logger (fatal if the sink cannot be opened)
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when the logger is ready)

use std::path::Path;

use crate::config::{load_config, ConfigError, ServiceConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::logging::{Logger, LoggerError, LoggerFactory, LoggerOption};

/// Error that aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logger: {0}")]
    Logger(#[from] LoggerError),

    #[error("server: {0}")]
    Server(#[from] ServerError),
}

/// Build the root logger for `config`, labelled with the deployment resource.
pub fn build_root_logger(config: &ServiceConfig) -> Result<Logger, LoggerError> {
    LoggerFactory::from_config(
        &config.logging,
        [
            LoggerOption::Named(config.logging.log_name.clone()),
            LoggerOption::Fields(config.resource.fields()),
        ],
    )
}

/// Load configuration, build the logger, bind, and serve until `shutdown`.
pub async fn run(config_path: Option<&Path>, shutdown: Shutdown) -> Result<(), StartupError> {
    let config = load_config(config_path)?;

    tracing::info!(
        bind_address = %config.server.bind_address(),
        level = %config.logging.level,
        project_id = %config.resource.project_id,
        service = %config.resource.service,
        "Configuration loaded"
    );

    let root = build_root_logger(&config)?;
    let server = HttpServer::new(&config, root);

    let listener = HttpServer::bind(&config).await?;
    tracing::info!(port = config.server.port, "Listening on port");

    let server_shutdown = shutdown.subscribe();
    let _signals = signals::spawn_signal_listener(shutdown);
    server.run(listener, server_shutdown).await?;
    Ok(())
}
