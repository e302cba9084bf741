use std::collections::HashMap;
use std::sync::Arc;

use deploylog_config::Config;
use deploylog_extract::models::{Architecture, Channel, HistoryDigest};
use deploylog_extract::{extract, is_hidden_feed};
use deploylog_remote::{HistoryHandle, HttpBackend, SettingsHandle, resolve_live};
use exn::ResultExt;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::entry::{ChannelLogEntry, ChannelState};
use crate::error::{ErrorKind, Result};

const DEFAULT_BINARY_TYPE: &str = deploylog_config::DEFAULT_BINARY_TYPE;

/// Parsed deploy history per channel.
///
/// Construct one and share it (behind an [`Arc`] or by reference). The map
/// lock is only taken for lookups and the final insert, never across a
/// network call, so refreshes of different channels run concurrently. Two
/// concurrent refreshes of the same channel both complete; the last to
/// finish is kept.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use deploylog_cache::ChannelLogs;
/// use deploylog_config::Config;
/// use deploylog_extract::models::{Architecture, Channel};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let logs = ChannelLogs::from_config(&Config::default())?;
/// let entry = logs.get_or_update(&Channel::new("zcanary")).await?;
/// if let Some(latest) = entry.latest(Architecture::X64) {
///     println!("{} {}", latest.version_id(), latest.build_id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChannelLogs {
    history: HistoryHandle,
    settings: SettingsHandle,
    binary_type: String,
    architecture: Architecture,
    entries: RwLock<HashMap<Channel, Arc<ChannelLogEntry>>>,
}

impl ChannelLogs {
    /// Asks for the default binary type in live-fallback mode and files the
    /// synthesized record under the host architecture.
    pub fn new(history: HistoryHandle, settings: SettingsHandle) -> Self {
        Self {
            history,
            settings,
            binary_type: DEFAULT_BINARY_TYPE.to_string(),
            architecture: Architecture::host(),
            entries: RwLock::default(),
        }
    }

    /// Build a cache talking HTTP to the configured endpoints.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = Arc::new(HttpBackend::from_config(config).or_raise(|| ErrorKind::Backend)?);
        Ok(Self::new(backend.clone(), backend)
            .with_binary_type(config.binary_type.clone())
            .with_architecture(config.architecture()))
    }

    pub fn with_binary_type(mut self, binary_type: impl Into<String>) -> Self {
        self.binary_type = binary_type.into();
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    /// Return the entry for `channel`, rebuilding it if the channel's deploy
    /// history changed since it was last seen.
    ///
    /// The history is always fetched. When its digest matches the stored
    /// entry's, that same entry is returned without parsing. Otherwise a new
    /// entry replaces it:
    ///
    /// - A withheld feed, or the default channel, is resolved through the
    ///   client-settings service into a single synthesized record,
    /// - Any other history is parsed and deduplicated per architecture.
    ///
    /// On failure the stored entry is left as it was.
    #[instrument(skip(self), fields(%channel))]
    pub async fn get_or_update(&self, channel: &Channel) -> Result<Arc<ChannelLogEntry>> {
        let history: Arc<str> = self
            .history
            .deploy_history(channel)
            .await
            .or_raise(|| ErrorKind::History(channel.to_string()))?
            .into();
        let digest = HistoryDigest::of(history.as_bytes());
        if let Some(entry) = self.get(channel).await
            && entry.digest == digest
        {
            debug!(hash = %digest.hash, "deploy history unchanged");
            return Ok(entry);
        }

        let entry = if channel.is_default() || is_hidden_feed(&history) {
            let live = resolve_live(self.settings.as_ref(), channel, &self.binary_type, self.architecture)
                .await
                .or_raise(|| ErrorKind::Resolve(channel.to_string()))?;
            ChannelLogEntry::from_live(channel.clone(), history, digest, live)
        } else {
            let extraction = extract(&history, channel.clone());
            ChannelLogEntry::from_extraction(channel.clone(), history, digest, extraction)
        };
        let entry = Arc::new(entry);
        self.entries.write().await.insert(channel.clone(), Arc::clone(&entry));
        info!(
            state = %entry.state(),
            x86 = entry.x86.len(),
            x64 = entry.x64.len(),
            skipped = entry.skipped.len(),
            "channel refreshed"
        );
        Ok(entry)
    }

    /// As [`get_or_update`](Self::get_or_update), abandoned as soon as
    /// `token` is cancelled. A cancelled refresh never touches the stored
    /// entry.
    pub async fn get_or_update_until(
        &self,
        channel: &Channel,
        token: &CancellationToken,
    ) -> Result<Arc<ChannelLogEntry>> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(%channel, "refresh cancelled");
                Err(exn::Exn::from(ErrorKind::Cancelled(channel.to_string())))
            },
            result = self.get_or_update(channel) => result,
        }
    }

    /// The stored entry for `channel`, without refreshing it.
    pub async fn get(&self, channel: &Channel) -> Option<Arc<ChannelLogEntry>> {
        self.entries.read().await.get(channel).cloned()
    }

    pub async fn state(&self, channel: &Channel) -> ChannelState {
        self.get(channel).await.map_or(ChannelState::Uninitialized, |entry| entry.state())
    }

    /// Every channel with a stored entry, in name order.
    pub async fn channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = self.entries.read().await.keys().cloned().collect();
        channels.sort();
        channels
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
