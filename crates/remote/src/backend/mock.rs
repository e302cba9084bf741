//! In-memory remote backend for testing.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use deploylog_extract::models::Channel;
use tokio::sync::RwLock;

use crate::backend::{ClientSettings, HistorySource};
use crate::error::{ErrorKind, Result};
use crate::models::ClientVersion;

/// A request observed by [`MockBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    History(Channel),
    Version(Channel, String),
}

/// In-memory implementation of both [`HistorySource`] and [`ClientSettings`].
///
/// Histories and client versions are kept per channel behind [`RwLock`]s so
/// they can be changed between calls. A channel with nothing registered, or
/// one marked as failing, answers with a
/// [`Transport`](ErrorKind::Transport) error, as an unreachable CDN would.
///
/// # Examples
///
/// ```
/// use deploylog_extract::models::Channel;
/// use deploylog_remote::backend::{ClientSettings, HistorySource, MockBackend};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::default()
///     .with_history("zcanary", "New WindowsPlayer ...")
///     .with_version("LIVE", "0.601.0.6010567", "version-abc");
/// assert_eq!(backend.deploy_history(&Channel::new("zcanary")).await?, "New WindowsPlayer ...");
/// assert_eq!(backend.client_version(&Channel::live(), "WindowsPlayer").await?.build_id, "version-abc");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    histories: RwLock<HashMap<Channel, String>>,
    versions: RwLock<HashMap<Channel, (String, String)>>,
    failing: RwLock<HashSet<Channel>>,
    requests: RwLock<Vec<Request>>,
}

impl MockBackend {
    /// Change the name of the mock backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register the deploy history served for `channel`.
    pub fn with_history(mut self, channel: impl Into<Channel>, history: impl Into<String>) -> Self {
        self.histories.get_mut().insert(channel.into(), history.into());
        self
    }

    /// Register the client version reported for `channel`, whatever the
    /// binary type asked for.
    pub fn with_version(
        mut self,
        channel: impl Into<Channel>,
        version: impl Into<String>,
        build_id: impl Into<String>,
    ) -> Self {
        self.versions.get_mut().insert(channel.into(), (version.into(), build_id.into()));
        self
    }

    /// Make every request for `channel` fail.
    pub fn failing(mut self, channel: impl Into<Channel>) -> Self {
        self.failing.get_mut().insert(channel.into());
        self
    }

    /// Replace the deploy history served for `channel`.
    pub async fn set_history(&self, channel: impl Into<Channel>, history: impl Into<String>) {
        self.histories.write().await.insert(channel.into(), history.into());
    }

    /// Stop serving a deploy history for `channel`.
    pub async fn remove_history(&self, channel: &Channel) {
        self.histories.write().await.remove(channel);
    }

    /// Start or stop failing every request for `channel`.
    pub async fn set_failing(&self, channel: impl Into<Channel>, failing: bool) {
        let channel = channel.into();
        let mut guard = self.failing.write().await;
        if failing {
            guard.insert(channel);
        } else {
            guard.remove(&channel);
        }
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.requests.read().await.clone()
    }

    /// Number of deploy history requests received so far.
    pub async fn history_requests(&self) -> usize {
        self.requests.read().await.iter().filter(|r| matches!(r, Request::History(_))).count()
    }

    fn transport(&self, channel: &Channel, kind: &str) -> exn::Exn<ErrorKind> {
        exn::Exn::from(ErrorKind::Transport {
            channel: channel.to_string(),
            endpoint: format!("mock://{}/{kind}/{channel}", self.name),
        })
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            histories: RwLock::default(),
            versions: RwLock::default(),
            failing: RwLock::default(),
            requests: RwLock::default(),
        }
    }
}

#[async_trait]
impl HistorySource for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deploy_history(&self, channel: &Channel) -> Result<String> {
        self.requests.write().await.push(Request::History(channel.clone()));
        if self.failing.read().await.contains(channel) {
            return Err(self.transport(channel, "history"));
        }
        self.histories.read().await.get(channel).cloned().ok_or_else(|| self.transport(channel, "history"))
    }
}

#[async_trait]
impl ClientSettings for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn client_version(&self, channel: &Channel, binary_type: &str) -> Result<ClientVersion> {
        self.requests.write().await.push(Request::Version(channel.clone(), binary_type.to_string()));
        if self.failing.read().await.contains(channel) {
            return Err(self.transport(channel, "version"));
        }
        let guard = self.versions.read().await;
        let (version, build_id) = guard.get(channel).ok_or_else(|| self.transport(channel, "version"))?;
        Ok(ClientVersion::new(channel.clone(), version.as_str(), build_id.as_str()))
    }
}
