//! HTTP backend for the deploy history CDN and the client-settings service.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use deploylog_config::{Config, Endpoints};
use deploylog_extract::models::Channel;
use exn::{OptionExt, ResultExt};
use facet_json::from_str as from_json;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::backend::{ClientSettings, HistorySource};
use crate::error::{ErrorKind, Result};
use crate::models::ClientVersion;

/// HTTP implementation of both [`HistorySource`] and [`ClientSettings`].
///
/// A single [`reqwest::Client`] (and its connection pool) is shared by both.
/// Every request is bounded by the timeout given at construction.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use deploylog_config::Endpoints;
/// use deploylog_extract::models::Channel;
/// use deploylog_remote::backend::{HistorySource, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("roblox", Endpoints::default(), Duration::from_secs(10))?;
/// let history = backend.deploy_history(&Channel::new("zcanary")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    name: String,
    client: Client,
    endpoints: Endpoints,
}
impl HttpBackend {
    pub fn new(name: impl Into<String>, endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { name: name.into(), client, endpoints })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new("http", config.endpoints.clone(), config.timeout())
    }

    /// URL of a channel's `DeployHistory.txt`. The default channel lives at
    /// the root of the CDN, every other channel under `channel/<name>/`.
    pub fn history_url(&self, channel: &Channel) -> String {
        let base = self.endpoints.history.trim_end_matches('/');
        if channel.is_default() {
            format!("{base}/DeployHistory.txt")
        } else {
            format!("{base}/channel/{}/DeployHistory.txt", channel.as_str().to_ascii_lowercase())
        }
    }

    /// URL of the client-settings answer for a channel and binary type.
    pub fn client_version_url(&self, channel: &Channel, binary_type: &str) -> String {
        let base = self.endpoints.client_settings.trim_end_matches('/');
        format!("{base}/v2/client-version/{binary_type}/channel/{channel}")
    }

    async fn get_text(&self, channel: &Channel, url: &str) -> Result<String> {
        let transport = || ErrorKind::Transport {
            channel: channel.to_string(),
            endpoint: url.to_string(),
        };
        let response = self.client.get(url).send().await.or_raise(transport)?;
        let response = response.error_for_status().or_raise(transport)?;
        response.text().await.or_raise(transport)
    }
}

/// Looks up `key` in a client-settings JSON object. Field names are matched
/// case-insensitively, the service has used both `Version` and `version`.
fn field<'a>(fields: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    fields.iter().find(|(name, _)| name.eq_ignore_ascii_case(key)).map(|(_, value)| value.as_str())
}

/// Decodes a client-settings response body fetched from `url`.
fn decode_client_version(channel: &Channel, url: &str, body: &str) -> Result<ClientVersion> {
    let invalid = || ErrorKind::InvalidResponse {
        channel: channel.to_string(),
        endpoint: url.to_string(),
    };
    let fields = from_json::<HashMap<String, String>>(body).or_raise(invalid)?;
    let version = field(&fields, "Version").ok_or_raise(invalid)?;
    let build_id = field(&fields, "ClientVersionUpload").ok_or_raise(invalid)?;
    Ok(ClientVersion::new(channel.clone(), version, build_id))
}

#[async_trait]
impl HistorySource for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn deploy_history(&self, channel: &Channel) -> Result<String> {
        let url = self.history_url(channel);
        let history = self.get_text(channel, &url).await?;
        debug!(%url, history_size = history.len(), "fetched deploy history");
        Ok(history)
    }
}

#[async_trait]
impl ClientSettings for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(backend = %self.name))]
    async fn client_version(&self, channel: &Channel, binary_type: &str) -> Result<ClientVersion> {
        let url = self.client_version_url(channel, binary_type);
        let body = self.get_text(channel, &url).await?;
        let info = decode_client_version(channel, &url, &body)?;
        debug!(%url, version = %info.version, build_id = %info.build_id, "fetched client version");
        Ok(info)
    }
}
