//! Database configuration

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Connection settings for the feedback database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database user
    #[serde(default = "default_user")]
    pub user: String,

    /// Database password
    #[serde(default = "default_password")]
    pub password: String,

    /// Database host, optionally with `:port`
    #[serde(default = "default_host")]
    pub host: String,

    /// Database (schema) name
    #[serde(default = "default_name")]
    pub name: String,

    /// Full connection URL; overrides the individual fields when set
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            password: default_password(),
            host: default_host(),
            name: default_name(),
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Configuration pointing at an explicit URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Connection string for the pool.
    ///
    /// Without an explicit `url`, a MySQL URL is assembled from the parts with
    /// credentials percent-encoded.
    pub fn connection_url(&self) -> StoreResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let (host, port) = match self.host.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    StoreError::config(format!("invalid port in database host '{}'", self.host))
                })?;
                (host, Some(port))
            }
            None => (self.host.as_str(), None),
        };

        let mut url = Url::parse("mysql://localhost")
            .map_err(|e| StoreError::config(e.to_string()))?;
        url.set_host(Some(host))
            .map_err(|e| StoreError::config(format!("invalid database host '{}': {}", host, e)))?;
        url.set_port(port)
            .map_err(|_| StoreError::config("cannot set database port"))?;
        url.set_username(&self.user)
            .map_err(|_| StoreError::config("cannot set database user"))?;
        url.set_password(Some(&self.password))
            .map_err(|_| StoreError::config("cannot set database password"))?;
        url.set_path(&format!("/{}", self.name));

        Ok(url.into())
    }

    /// Connection URL with the password masked, for logging
    pub fn redacted_url(&self) -> String {
        match self.connection_url().ok().and_then(|u| Url::parse(&u).ok()) {
            Some(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.into()
            }
            None => "<invalid database url>".to_string(),
        }
    }
}

fn default_user() -> String {
    "root".to_string()
}

fn default_password() -> String {
    "rootpassword".to_string()
}

fn default_host() -> String {
    "mysql".to_string()
}

fn default_name() -> String {
    "sentiment_db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    10
}
