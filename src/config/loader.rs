//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::observability::logging::LogLevel;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Project identifier.
pub const ENV_PROJECT: &str = "GOOGLE_CLOUD_PROJECT";
/// Service name.
pub const ENV_SERVICE: &str = "GAE_SERVICE";
/// Service version.
pub const ENV_VERSION: &str = "GAE_VERSION";
/// Listen port.
pub const ENV_PORT: &str = "PORT";
/// Request logger level.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Parse configuration from a TOML file, without validating.
pub fn read_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`. Unset or empty variables are ignored.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

    if let Some(project) = get(ENV_PROJECT) {
        config.resource.project_id = project;
    }
    if let Some(service) = get(ENV_SERVICE) {
        config.resource.service = service;
    }
    if let Some(version) = get(ENV_VERSION) {
        config.resource.version = version;
    }
    if let Some(port) = get(ENV_PORT) {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: port.clone(),
        })?;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.level = level.parse::<LogLevel>().map_err(|_| ConfigError::Env {
            var: ENV_LOG_LEVEL,
            value: level.clone(),
        })?;
    }
    Ok(())
}

/// Load configuration: optional file, then process environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };
    apply_env(&mut config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::default();
        apply_env(
            &mut config,
            env(&[
                (ENV_PROJECT, "demo-project"),
                (ENV_SERVICE, "frontend"),
                (ENV_VERSION, "20240101t000000"),
                (ENV_PORT, "9090"),
                (ENV_LOG_LEVEL, "info"),
            ]),
        )
        .unwrap();

        assert_eq!(config.resource.project_id, "demo-project");
        assert_eq!(config.resource.service, "frontend");
        assert_eq!(config.resource.version, "20240101t000000");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_empty_port_keeps_default() {
        let mut config = ServiceConfig::default();
        apply_env(&mut config, env(&[(ENV_PORT, "")])).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServiceConfig::default();
        let err = apply_env(&mut config, env(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_PORT, .. }));
        assert_eq!(err.to_string(), "invalid value \"http\" for PORT");
    }

    #[test]
    fn test_invalid_level() {
        let mut config = ServiceConfig::default();
        let err = apply_env(&mut config, env(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_LOG_LEVEL, .. }));
    }

    #[test]
    fn test_read_config_file() {
        let path = std::env::temp_dir().join(format!("context-logger-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[resource]\nproject_id = \"from-file\"").unwrap();
        drop(file);

        let config = read_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.resource.project_id, "from-file");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_config(Path::new("/nonexistent/context-logger.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validation_error_message() {
        let err = ConfigError::Validation(vec![
            ValidationError::ZeroPort,
            ValidationError::EmptyLogName,
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: server.port must not be 0, logging.log_name must not be empty"
        );
    }
}
