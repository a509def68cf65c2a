//! # Client configuration: `studenthub.toml`
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8085/api"
//! timeout_secs = 30
//!
//! [ui]
//! toast_duration_ms = 4000
//! ```
//!
//! All sections default, so a missing or empty file equals the default
//! configuration. The API base URL can be overridden with
//! `STUDENTHUB_API_URL`: read at compile time on wasm32 (there is no process
//! environment in the browser) and at runtime, after loading `.env`, on native
//! builds.

use serde::{Deserialize, Serialize};

pub const API_URL_ENV: &str = "STUDENTHUB_API_URL";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to. No trailing slash needed.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Native only; browsers apply their own.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a toast stays up before dismissing itself. 0 keeps it until closed.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u32,
}

fn default_base_url() -> String {
    "http://localhost:8085/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_toast_duration_ms() -> u32 {
    4000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

impl ClientConfig {
    /// Defaults with the environment override applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_base_url() {
            tracing::info!("using API base URL from {API_URL_ENV}");
            config.api.base_url = url;
        }
        config
    }

    /// Builder method to set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "studenthub.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(target_arch = "wasm32")]
fn env_base_url() -> Option<String> {
    option_env!("STUDENTHUB_API_URL")
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(not(target_arch = "wasm32"))]
fn env_base_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8085/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.toast_duration_ms, 4000);
    }

    #[test]
    fn test_partial_toml() {
        let config = ClientConfig::from_toml("[api]\nbase_url = \"https://hub.example/api\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://hub.example/api");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::default().with_base_url("http://10.0.0.2:9000/api");
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}
