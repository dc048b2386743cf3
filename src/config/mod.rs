//! Configuration loading and management
//!
//! Configuration is read from a YAML file (every section optional) and then
//! selectively overridden from the environment:
//!
//! | Variable              | Overrides        |
//! |-----------------------|------------------|
//! | `SALES_CONFIG`        | path of the file |
//! | `SALES_PORT`          | `server.port`    |
//! | `SALES_MONGODB_URI`   | `store.uri`      |
//! | `SALES_DATABASE`      | `store.database` |
//! | `SALES_STORE_BACKEND` | `store.backend`  |

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CONFIG_PATH_VAR: &str = "SALES_CONFIG";

/// Complete configuration for the sales API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allow any origin, method and header
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    /// `host:port` as handed to the listener; hostnames are resolved at bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which `EntityStore` implementation backs the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Mongodb,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mongodb" => Ok(StoreBackend::Mongodb),
            other => Err(anyhow!(
                "Unknown store backend '{}' (expected memory or mongodb)",
                other
            )),
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub uri: String,
    pub database: String,
    pub pool: PoolConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: "mongodb://localhost:27017".to_string(),
            database: "sales".to_string(),
            pool: PoolConfig::default(),
        }
    }
}

/// Bounds of the shared connection pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_size: u32,
    pub min_size: u32,
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_size: 0,
            connect_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl SalesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid config file {}", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `SALES_CONFIG` (or defaults) and apply environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SALES_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("SALES_PORT is not a port number: '{}'", port))?;
        }
        if let Some(uri) = lookup("SALES_MONGODB_URI") {
            self.store.uri = uri;
        }
        if let Some(database) = lookup("SALES_DATABASE") {
            self.store.database = database;
        }
        if let Some(backend) = lookup("SALES_STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SalesConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Mongodb);
        assert_eq!(config.store.uri, "mongodb://localhost:27017");
        assert_eq!(config.store.database, "sales");
        assert_eq!(config.store.pool.max_size, 10);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SalesConfig::from_yaml_str(
            r#"
server:
  port: 9090
store:
  backend: memory
  pool:
    max_size: 4
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.pool.max_size, 4);
        assert_eq!(config.store.pool.connect_timeout_secs, 5);
        assert_eq!(config.store.database, "sales");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = SalesConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SalesConfig::default());
    }

    #[test]
    fn test_yaml_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "logging:\n  json: true\n").unwrap();

        let config = SalesConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert!(config.logging.json);
        assert!(SalesConfig::from_yaml_file("/nonexistent/sales.yaml").is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SALES_PORT", "3000"),
            ("SALES_DATABASE", "sales_test"),
            ("SALES_STORE_BACKEND", "Memory"),
        ]
        .into_iter()
        .collect();

        let mut config = SalesConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.database, "sales_test");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.uri, "mongodb://localhost:27017");
    }

    #[test]
    fn test_bad_overrides_fail() {
        let mut config = SalesConfig::default();
        assert!(config.apply_overrides(|_| Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_listen_addr_keeps_hostnames() {
        assert_eq!(SalesConfig::default().server.listen_addr(), "0.0.0.0:8080");

        let config =
            SalesConfig::from_yaml_str("server:\n  host: localhost\n  port: 9000\n").unwrap();
        assert_eq!(config.server.listen_addr(), "localhost:9000");
    }
}
