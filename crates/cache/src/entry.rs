use std::sync::Arc;

use deploylog_extract::models::{Architecture, BuildRecord, Channel, HistoryDigest};
use deploylog_extract::{Extraction, Skipped};
use deploylog_remote::{LiveBuild, Substitution};
use derive_more::Display;
use time::UtcDateTime;

/// Where a channel's cached records came from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// Never refreshed.
    #[display("uninitialized")]
    Uninitialized,
    /// Parsed from the channel's own deploy history.
    #[display("history")]
    HasRealHistory,
    /// Synthesized from the client-settings service.
    #[display("live fallback")]
    LiveFallback,
}

/// Snapshot of one channel, as of its last refresh.
///
/// Entries are never modified once built; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLogEntry {
    pub channel: Channel,
    /// Raw deploy history text the entry was built from.
    pub history: Arc<str>,
    /// Content identity of [`history`](Self::history).
    pub digest: HistoryDigest,
    /// 32-bit records, one per changelist, ascending.
    pub x86: Vec<BuildRecord>,
    /// 64-bit records, one per changelist, ascending.
    pub x64: Vec<BuildRecord>,
    /// `false` when the records were synthesized by the live fallback.
    pub has_real_history: bool,
    /// Set when the default channel answered for this one.
    pub substitution: Option<Substitution>,
    /// Lines of the history that were not admitted.
    pub skipped: Vec<Skipped>,
    pub updated_at: UtcDateTime,
}
impl ChannelLogEntry {
    pub(crate) fn from_extraction(
        channel: Channel,
        history: Arc<str>,
        digest: HistoryDigest,
        extraction: Extraction,
    ) -> Self {
        let Extraction { x86, x64, skipped } = extraction;
        Self {
            channel,
            history,
            digest,
            x86,
            x64,
            has_real_history: true,
            substitution: None,
            skipped,
            updated_at: UtcDateTime::now(),
        }
    }

    pub(crate) fn from_live(channel: Channel, history: Arc<str>, digest: HistoryDigest, live: LiveBuild) -> Self {
        let LiveBuild { record, substitution } = live;
        let (x86, x64) = match record.architecture {
            Architecture::X86 => (vec![record], Vec::new()),
            Architecture::X64 => (Vec::new(), vec![record]),
        };
        Self {
            channel,
            history,
            digest,
            x86,
            x64,
            has_real_history: false,
            substitution,
            skipped: Vec::new(),
            updated_at: UtcDateTime::now(),
        }
    }

    pub fn state(&self) -> ChannelState {
        if self.has_real_history { ChannelState::HasRealHistory } else { ChannelState::LiveFallback }
    }

    /// Records for a single architecture.
    pub fn records(&self, architecture: Architecture) -> &[BuildRecord] {
        match architecture {
            Architecture::X86 => &self.x86,
            Architecture::X64 => &self.x64,
        }
    }

    /// Record with the highest changelist for `architecture`.
    pub fn latest(&self, architecture: Architecture) -> Option<&BuildRecord> {
        self.records(architecture).last()
    }

    pub fn len(&self) -> usize {
        self.x86.len() + self.x64.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x86.is_empty() && self.x64.is_empty()
    }
}
