//! Live-fallback resolution.
//!
//! When a channel's deploy history cannot be used, the build currently served
//! on that channel is asked of the client-settings service instead, and a
//! single record is synthesized from the answer. Should the channel itself be
//! unreachable, the default channel is asked once in its place.

use deploylog_extract::models::{Architecture, BuildRecord, Channel};
use time::{PrimitiveDateTime, UtcDateTime};
use tracing::{debug, instrument, warn};

use crate::backend::ClientSettings;
use crate::error::{Error, ErrorKind, Result};
use crate::models::ClientVersion;

/// The default channel answered in place of the one requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The channel originally asked for.
    pub requested: Channel,
    /// Why the requested channel could not be resolved.
    pub cause: ErrorKind,
}

/// Outcome of [`resolve_live`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveBuild {
    /// The synthesized record. Its `channel` is the channel that answered.
    pub record: BuildRecord,
    /// Present when the record came from the default channel instead.
    pub substitution: Option<Substitution>,
}
impl LiveBuild {
    pub fn is_substituted(&self) -> bool {
        self.substitution.is_some()
    }
}

/// Resolve the build currently served on `channel` and synthesize a record
/// for it.
///
/// The record's architecture follows `binary_type` when it names one (a `64`
/// suffix), otherwise `architecture` is used. Its timestamp is the current
/// UTC wall clock and it carries no git hash.
///
/// Only retryable failures fall back to the default channel; a response that
/// arrived but could not be understood is returned as is. When the fallback
/// fails too, [`ErrorKind::Unresolved`] is raised over both failures.
#[instrument(skip(settings), fields(backend = settings.name()))]
pub async fn resolve_live(
    settings: &dyn ClientSettings,
    channel: &Channel,
    binary_type: &str,
    architecture: Architecture,
) -> Result<LiveBuild> {
    let (info, substitution) = match settings.client_version(channel, binary_type).await {
        Ok(info) => (info, None),
        Err(err) if err.is_retryable() => {
            warn!(error = ?err, "client version unavailable, falling back to {}", Channel::live());
            let cause = (*err).clone();
            let info = match settings.client_version(&Channel::live(), binary_type).await {
                Ok(info) => info,
                Err(fallback) => return Err(unresolved(channel, [err, fallback])),
            };
            let substitution = Substitution { requested: channel.clone(), cause };
            (info, Some(substitution))
        },
        Err(err) => return Err(err),
    };
    let record = synthesize(&info, binary_type, architecture)?;
    debug!(build_id = %record.build_id, version = %record.version, channel = %record.channel, "resolved live build");
    Ok(LiveBuild { record, substitution })
}

/// Both attempts become children of the terminal error, requested channel first.
#[track_caller]
fn unresolved(channel: &Channel, attempts: [Error; 2]) -> Error {
    exn::Exn::raise_all(ErrorKind::Unresolved { channel: channel.to_string() }, attempts)
}

fn synthesize(info: &ClientVersion, binary_type: &str, architecture: Architecture) -> Result<BuildRecord> {
    let endpoint = format!("client-version/{binary_type}/channel/{}", info.channel);
    let now = UtcDateTime::now();
    Ok(BuildRecord {
        architecture: Architecture::from_suffix(binary_type).unwrap_or(architecture),
        build_id: info.build_id.clone(),
        timestamp: PrimitiveDateTime::new(now.date(), now.time()),
        version: info.file_version(&endpoint)?,
        git_hash: None,
        channel: info.channel.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockBackend, Request};
    use deploylog_extract::models::FileVersion;
    use rstest::rstest;

    #[rstest]
    #[case("WindowsPlayer", Architecture::X86, Architecture::X86)]
    #[case("WindowsPlayer", Architecture::X64, Architecture::X64)]
    #[case("WindowsPlayer64", Architecture::X86, Architecture::X64)]
    #[tokio::test]
    async fn test_resolves_requested_channel(
        #[case] binary_type: &str,
        #[case] host: Architecture,
        #[case] expected: Architecture,
    ) {
        let backend = MockBackend::default().with_version("zcanary", "0.601.0.6010567", "version-abc");
        let live = resolve_live(&backend, &Channel::new("zcanary"), binary_type, host).await.unwrap();
        assert!(!live.is_substituted());
        assert_eq!(live.record.architecture, expected);
        assert_eq!(live.record.build_id, "version-abc");
        assert_eq!(live.record.version, FileVersion::new(0, 601, 0, 6010567));
        assert_eq!(live.record.channel, Channel::new("zcanary"));
        assert!(live.record.is_synthesized());
    }

    #[tokio::test]
    async fn test_substitutes_default_channel() {
        let backend = MockBackend::default().with_version("LIVE", "0.600.1.6000000", "version-live");
        let live = resolve_live(&backend, &Channel::new("beta"), "WindowsPlayer", Architecture::X64).await.unwrap();
        let substitution = live.substitution.as_ref().unwrap();
        assert_eq!(substitution.requested, Channel::new("beta"));
        assert!(substitution.cause.is_retryable());
        assert_eq!(substitution.cause.channel(), Some("beta"));
        assert_eq!(live.record.channel.to_string(), "LIVE");
        assert_eq!(live.record.build_id, "version-live");
        assert_eq!(
            backend.requests().await,
            vec![
                Request::Version(Channel::new("beta"), "WindowsPlayer".to_string()),
                Request::Version(Channel::live(), "WindowsPlayer".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_both_channels_unavailable() {
        let backend = MockBackend::default();
        let err = resolve_live(&backend, &Channel::new("beta"), "WindowsPlayer", Architecture::X64)
            .await
            .unwrap_err();
        assert_eq!(*err, ErrorKind::Unresolved { channel: "beta".to_string() });
        let tree = format!("{err:?}");
        assert!(tree.contains("mock://mock/version/beta"));
        assert!(tree.contains("mock://mock/version/LIVE"));
    }

    #[tokio::test]
    async fn test_default_channel_retried_once() {
        let backend = MockBackend::default().failing("LIVE");
        let err = resolve_live(&backend, &Channel::live(), "WindowsPlayer", Architecture::X86)
            .await
            .unwrap_err();
        assert_eq!(*err, ErrorKind::Unresolved { channel: "LIVE".to_string() });
        assert_eq!(backend.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_version_is_not_retried() {
        let backend = MockBackend::default()
            .with_version("zcanary", "not-a-version", "version-abc")
            .with_version("LIVE", "0.600.1.6000000", "version-live");
        let err = resolve_live(&backend, &Channel::new("zcanary"), "WindowsPlayer", Architecture::X86)
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidResponse { .. }));
        assert_eq!(backend.requests().await.len(), 1);
    }
}
