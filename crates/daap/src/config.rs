//! Client configuration.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3689;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// DAAP servers ignore the user name, but basic auth needs one.
const AUTH_USER: &str = "admin";

/// Where and how to reach a DAAP server.
///
/// Every field has a default, so a partial TOML or JSON document is enough:
///
/// ```
/// let config: daap::ClientConfig = serde_json::from_str(r#"{"server": "jukebox.local"}"#).unwrap();
/// assert_eq!(config.base_url(), "http://jukebox.local:3689/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: String,
    pub port: u16,
    /// Library password, if the server requires one.
    pub password: Option<String>,
    /// Per-request timeout handed to the transport.
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_owned(),
            port: DEFAULT_PORT,
            password: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// `http://{server}:{port}/`, the prefix of every request URL.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.server, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `base64("admin:" + password)`, the basic auth credential.
    pub fn credentials(&self) -> Option<String> {
        self.password
            .as_ref()
            .map(|password| STANDARD.encode(format!("{AUTH_USER}:{password}")))
    }
}
