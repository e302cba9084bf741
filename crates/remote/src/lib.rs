//! Remote collaborators of the channel log cache: the CDN serving deploy
//! history text and the client-settings service, plus the live-fallback
//! resolver built on the latter.

pub mod backend;
pub mod error;
mod models;
mod resolve;

pub use crate::backend::{ClientSettings, HistorySource, HttpBackend};
pub use crate::models::ClientVersion;
pub use crate::resolve::{LiveBuild, Substitution, resolve_live};
use std::sync::Arc;

pub type HistoryHandle = Arc<dyn HistorySource + Send + Sync>;
pub type SettingsHandle = Arc<dyn ClientSettings + Send + Sync>;
