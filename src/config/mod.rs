//! Configuration loading and management
//!
//! Values are layered: built-in defaults, then an optional YAML file, then the
//! `PORT` / `BACKEND_URL` environment variables. The binary applies its
//! command-line flags last.

use crate::core::ConfigError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Port used when neither the config file nor `PORT` provides one
pub const DEFAULT_PORT: u16 = 4000;

/// REST backend queried when no base URL is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Environment variable overriding the listening port
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Listening socket of the graph endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0", "127.0.0.1")
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Location of the REST service being proxied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; `/users` and `/companies` are appended to it
    #[validate(url)]
    pub base_url: String,

    /// Per-request timeout, in seconds
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Complete configuration for the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub backend: BackendConfig,

    /// Serve the GraphiQL UI on `GET /graphql` requests without a query
    pub graphiql: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            graphiql: true,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `PORT` and `BACKEND_URL` from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Empty values are ignored, as if the variable were unset.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = get(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                message: format!("{} must be a port number, got '{}'", PORT_ENV, port),
            })?;
        }

        if let Some(url) = get(BACKEND_URL_ENV) {
            self.backend.base_url = url;
        }

        Ok(self)
    }

    /// Check every field and return the configuration if it is usable
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Backend base URL without trailing slashes
    pub fn backend_url(&self) -> &str {
        self.backend.base_url.trim_end_matches('/')
    }

    /// Address the server binds to, as `host:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
