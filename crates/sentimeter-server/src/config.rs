//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional YAML
//! file, then `SENTIMETER__*` environment variables, then the legacy
//! `MYSQL_*` variables. CLI flags are applied last by the binary.

use crate::cli::{Cli, Commands};
use config::{Config, ConfigError, Environment, File, FileFormat};
use sentimeter_classifiers::ClassifierConfig;
use sentimeter_store::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Legacy `MYSQL_*` variables of the compose deployment, mapped to config keys
const LEGACY_DATABASE_VARS: &[(&str, &str)] = &[
    ("MYSQL_USER", "database.user"),
    ("MYSQL_PASSWORD", "database.password"),
    ("MYSQL_HOST", "database.host"),
    ("MYSQL_DB", "database.name"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix the API routes are mounted under
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            api_prefix: default_api_prefix(),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.listen, self.port).parse()?;
        Ok(addr)
    }
}

impl ServerConfig {
    /// Load configuration from `path` (if it exists) and the environment
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::load`], reading legacy variables through `lookup`
    pub fn load_with(
        path: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::new(path, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix("SENTIMETER")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_DATABASE_VARS {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        builder.build()?.try_deserialize()
    }

    /// Apply command-line overrides
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.database_url {
            self.database.url = Some(url.clone());
        }

        if let Commands::Serve { listen, port } = cli.command() {
            if let Some(listen) = listen {
                self.server.listen = listen;
            }
            if let Some(port) = port {
                self.server.port = port;
            }
        }

        self
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_prefix() -> String {
    "/api".to_string()
}
