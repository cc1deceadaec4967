//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::observability::logging::{Field, LogLevel};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener and request handling settings.
    pub server: ServerConfig,

    /// Labels identifying this deployment.
    pub resource: ResourceConfig,

    /// Request logger settings.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// `host:port` to hand to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// Deployment labels attached to every log entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Project (tenant) identifier; also names trace resources.
    pub project_id: String,

    /// Service name.
    pub service: String,

    /// Service version.
    pub version: String,
}

impl ResourceConfig {
    /// Labels as log fields. Empty labels are left out.
    pub fn fields(&self) -> Vec<Field> {
        [
            ("project_id", &self.project_id),
            ("module_id", &self.service),
            ("version_id", &self.version),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| Field::new(key, value.as_str()))
        .collect()
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            service: "default".to_string(),
            version: String::new(),
        }
    }
}

/// Encoding of emitted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Forward to the process tracing subscriber.
    Tracing,
}

/// Destination of JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
}

/// Request logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level emitted.
    pub level: LogLevel,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file, required when `output = "file"`.
    pub path: Option<PathBuf>,

    /// Name of the root logger.
    pub log_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            path: None,
            log_name: "app_logs".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.log_name, "app_logs");
        assert_eq!(config.resource.service, "default");
    }

    #[test]
    fn test_partial_toml() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [logging]
            level = "warn"
            format = "tracing"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.format, LogFormat::Tracing);
        assert_eq!(config.logging.output, LogOutput::Stdout);
    }

    #[test]
    fn test_resource_fields_skip_empty() {
        let resource = ResourceConfig {
            project_id: "demo".into(),
            service: "default".into(),
            version: String::new(),
        };
        let fields = resource.fields();
        assert_eq!(
            fields,
            vec![
                Field::new("project_id", "demo"),
                Field::new("module_id", "default"),
            ]
        );
    }
}
