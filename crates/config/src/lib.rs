//! Configuration loading and validation.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`]),
//! 2. `config.toml`, `config.yaml` and `config.json` in the platform config
//!    directory (e.g. `~/.config/deploylog/` on Linux), when present,
//! 3. An explicitly supplied file, which must exist,
//! 4. Environment variables prefixed with `DEPLOYLOG_`, using `__` to reach
//!    nested keys (`DEPLOYLOG_ENDPOINTS__HISTORY=https://...`).

pub mod error;

use deploylog_extract::models::Architecture;
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

pub const ENV_PREFIX: &str = "DEPLOYLOG_";
pub const DEFAULT_CLIENT_SETTINGS_URL: &str = "https://clientsettings.roblox.com";
pub const DEFAULT_HISTORY_URL: &str = "https://setup.rbxcdn.com";
pub const DEFAULT_BINARY_TYPE: &str = "WindowsPlayer";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Base URLs of the two remote services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Client-settings service answering `/v2/client-version/...`
    pub client_settings: String,
    /// CDN serving `DeployHistory.txt` files
    pub history: String,
}
impl Default for Endpoints {
    fn default() -> Self {
        Self {
            client_settings: DEFAULT_CLIENT_SETTINGS_URL.to_string(),
            history: DEFAULT_HISTORY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    /// Per-request timeout, in seconds.
    pub request_timeout: u64,
    /// Binary type asked of the client-settings service in live-fallback mode.
    pub binary_type: String,
    /// Overrides the host architecture when a live-fallback record is
    /// synthesized for an architecture-agnostic binary type.
    pub architecture: Option<Architecture>,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            binary_type: DEFAULT_BINARY_TYPE.to_string(),
            architecture: None,
        }
    }
}
impl Config {
    /// Directory searched for implicit `config.{toml,yaml,json}` files.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "deploylog").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Assemble every configuration layer, without extracting it.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dir) = Self::default_dir() {
            figment = figment
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Json::file(dir.join("config.json")));
        }
        if let Some(path) = explicit {
            figment = Self::merge_file(figment, path)?;
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Load and validate the configuration from every layer.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(explicit)?)
    }

    /// Extract and validate the configuration from a prepared [`Figment`].
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn is_http(url: &str) -> bool {
            url.starts_with("http://") || url.starts_with("https://")
        }
        if !is_http(&self.endpoints.client_settings) {
            exn::bail!(ErrorKind::Invalid("endpoints.client_settings"));
        }
        if !is_http(&self.endpoints.history) {
            exn::bail!(ErrorKind::Invalid("endpoints.history"));
        }
        if self.request_timeout == 0 {
            exn::bail!(ErrorKind::Invalid("request_timeout"));
        }
        if self.binary_type.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("binary_type"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Architecture to file live-fallback records under: the configured
    /// override, otherwise the host's.
    pub fn architecture(&self) -> Architecture {
        self.architecture.unwrap_or_else(Architecture::host)
    }
}
