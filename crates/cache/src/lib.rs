//! Per-channel cache of parsed deploy history.
//!
//! Each channel's raw `DeployHistory.txt` is fetched on every request, but
//! only parsed again when its content changed. Channels whose feed is
//! withheld, and the default channel, are answered by the client-settings
//! service instead: a single synthesized record, with no git hash.
//!
//! Nothing is persisted; entries live as long as the [`ChannelLogs`] holding
//! them.

mod entry;
pub mod error;
mod logs;

pub use crate::entry::{ChannelLogEntry, ChannelState};
pub use crate::logs::ChannelLogs;
