//! Server connection configuration.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Raw configuration as written in `config.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    server: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Validated connection settings for one DHIS2 server.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the instance, without a trailing slash.
    pub server: String,
    /// Basic-auth user name.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Optional request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ServerConfig {
    /// Creates a configuration from explicit values.
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: trim_server(server.into()),
            username: username.into(),
            password: password.into(),
            timeout: None,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ApiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// `server`, `username` and `password` must all be present and
    /// non-empty; every missing key is reported at once.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(text).map_err(|e| ApiError::ConfigParse(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let server = non_empty(raw.server);
        let username = non_empty(raw.username);
        let password = non_empty(raw.password);

        let mut missing = Vec::new();
        if server.is_none() {
            missing.push("server");
        }
        if username.is_none() {
            missing.push("username");
        }
        if password.is_none() {
            missing.push("password");
        }

        let (Some(server), Some(username), Some(password)) = (server, username, password) else {
            return Err(ApiError::MissingKeys { missing });
        };
        Ok(Self::new(server, username, password)
            .with_timeout(raw.timeout_secs.map(Duration::from_secs)))
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn trim_server(server: String) -> String {
    server.trim().trim_end_matches('/').to_string()
}
