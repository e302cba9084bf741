//! Remote models.

use deploylog_extract::models::{BuildRecord, Channel, FileVersion};
use exn::ResultExt;

use crate::error::{ErrorKind, Result};

/// The current build of a channel, as reported by the client-settings service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientVersion {
    /// Channel the answer is for
    pub channel: Channel,
    /// Dotted four-part version, e.g. `0.601.0.6010567`
    pub version: String,
    /// Opaque build identifier (`clientVersionUpload`)
    pub build_id: String,
}
impl ClientVersion {
    pub fn new(channel: impl Into<Channel>, version: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            version: version.into(),
            build_id: build_id.into(),
        }
    }

    /// Parses [`version`](Self::version) into its four numeric parts.
    ///
    /// `endpoint` is only used to describe the failure.
    pub fn file_version(&self, endpoint: &str) -> Result<FileVersion> {
        self.version.parse::<FileVersion>().or_raise(|| ErrorKind::InvalidResponse {
            channel: self.channel.to_string(),
            endpoint: endpoint.to_string(),
        })
    }
}
impl From<&BuildRecord> for ClientVersion {
    fn from(record: &BuildRecord) -> Self {
        Self {
            channel: record.channel.clone(),
            version: record.version_id(),
            build_id: record.build_id.clone(),
        }
    }
}
