//! Remote backend traits and implementations.
//!
//! Two collaborators sit outside the process: the CDN serving each channel's
//! raw deploy history, and the client-settings service that reports a
//! channel's current version. Both are modelled as traits so the cache can be
//! driven by HTTP in production and by [`MockBackend`] in tests.

mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::http::HttpBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::{MockBackend, Request};
use crate::error::Result;
use crate::models::ClientVersion;
use async_trait::async_trait;
use deploylog_extract::models::Channel;

/// Source of raw deploy history text.
///
/// # Examples
///
/// ```
/// use deploylog_extract::models::Channel;
/// use deploylog_remote::backend::HistorySource;
/// # use deploylog_remote::error::Result;
///
/// async fn history_size(source: &dyn HistorySource) -> Result<usize> {
///     let history = source.deploy_history(&Channel::new("zcanary")).await?;
///     Ok(history.len())
/// }
/// ```
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Name of the backend (used for logging only).
    fn name(&self) -> &str;

    /// Fetch the complete, current deploy history blob for a channel.
    ///
    /// Returns [`Transport`](crate::error::ErrorKind::Transport) when the
    /// history could not be retrieved.
    async fn deploy_history(&self, channel: &Channel) -> Result<String>;
}

/// Source of a channel's current client version.
#[async_trait]
pub trait ClientSettings: Send + Sync {
    /// Name of the backend (used for logging only).
    fn name(&self) -> &str;

    /// Fetch the current version descriptor of `binary_type` on `channel`.
    ///
    /// Returns [`Transport`](crate::error::ErrorKind::Transport) when the
    /// service could not be reached or answered with a non-2xx status, and
    /// [`InvalidResponse`](crate::error::ErrorKind::InvalidResponse) when the
    /// body could not be understood.
    async fn client_version(&self, channel: &Channel, binary_type: &str) -> Result<ClientVersion>;
}
