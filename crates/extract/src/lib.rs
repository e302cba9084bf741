mod consts;
mod dedupe;
pub mod error;
mod extract;
pub mod models;
mod policy;

use tracing::instrument;

pub use crate::consts::{HIDDEN_BUILD_ID, MINIMUM_MINOR_VERSION};
pub use crate::dedupe::dedupe;
pub use crate::extract::{Candidate, Extraction, Extractor, is_hidden_feed};
use crate::models::Channel;
pub use crate::policy::{SkipReason, Skipped, exclusion, is_admissible, is_hidden};

/// Easy, top-level entrypoint for turning a raw deploy history into
/// deduplicated build records.
///
/// - Every record is tagged with `channel`,
/// - Hidden, malformed and below-floor lines are reported in
///   [`Extraction::skipped`] rather than failing the batch, and
/// - Each architecture holds at most one record per changelist.
///
/// # Examples
///
/// ```rust
/// use deploylog_extract::extract;
/// let history = "New WindowsPlayer version-1a2b at 3/4/2021 5:06:07 PM, \
///     file version: 0, 600, 0, 6000123, git hash: deadbeef ...";
///
/// let extraction = extract(history, "zcanary");
/// assert_eq!(extraction.x86.len(), 1);
/// assert_eq!(extraction.x86[0].version_id(), "0.600.0.6000123");
/// ```
#[instrument(skip_all, fields(history_size = history.len()))]
pub fn extract(history: &str, channel: impl Into<Channel>) -> Extraction {
    Extractor::new(history, channel).extract()
}
