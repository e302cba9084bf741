//! Changelist deduplication.
//!
//! A deploy history routinely mentions the same changelist more than once
//! (re-deploys, re-uploads). Only one record per changelist survives.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::instrument;

use crate::models::BuildRecord;

impl BuildRecord {
    /// Compare two records of the same changelist to decide which one survives
    /// deduplication. The greater record wins.
    ///
    /// 1. The later timestamp wins.
    /// 2. On identical timestamps the lexicographically smaller build
    ///    identifier wins, so the outcome never depends on input order.
    /// 3. Anything still tied is settled by the remaining fields.
    fn precedence(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| other.build_id.cmp(&self.build_id))
            .then_with(|| other.version.cmp(&self.version))
            .then_with(|| other.git_hash.cmp(&self.git_hash))
            .then_with(|| other.architecture.cmp(&self.architecture))
            .then_with(|| other.channel.cmp(&self.channel))
    }

    /// Returns `true` if `self` should replace `other` in a deduplicated set.
    pub fn supersedes(&self, other: &Self) -> bool {
        self.precedence(other) == Ordering::Greater
    }
}

/// Collapses records sharing a changelist down to the single latest one.
///
/// Intended for the records of one architecture at a time. The result holds at
/// most one record per changelist, sorted by changelist ascending, and is the
/// same no matter what order the input arrives in. Running it again on its own
/// output changes nothing.
///
/// # Examples
///
/// ```
/// use deploylog_extract::dedupe;
/// # use deploylog_extract::models::*;
/// # use time::macros::datetime;
/// # let record = |build_id: &str, hour: u8| BuildRecord {
/// #     architecture: Architecture::X64,
/// #     build_id: build_id.into(),
/// #     timestamp: datetime!(2020-01-01 0:00:00).replace_hour(hour).unwrap(),
/// #     version: FileVersion::new(0, 600, 0, 1000001),
/// #     git_hash: Some("abc".into()),
/// #     channel: Channel::new("zcanary"),
/// # };
/// let records = vec![record("version-early", 1), record("version-late", 2)];
/// let deduped = dedupe(records);
/// assert_eq!(deduped.len(), 1);
/// assert_eq!(deduped[0].build_id, "version-late");
/// ```
#[instrument(level = "trace", skip_all)]
pub fn dedupe(records: impl IntoIterator<Item = BuildRecord>) -> Vec<BuildRecord> {
    let mut by_changelist: BTreeMap<u32, BuildRecord> = BTreeMap::new();
    for record in records {
        match by_changelist.entry(record.changelist()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            },
            Entry::Occupied(mut slot) => {
                if record.supersedes(slot.get()) {
                    slot.insert(record);
                }
            },
        }
    }
    by_changelist.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Architecture, Channel, FileVersion};
    use time::PrimitiveDateTime;
    use time::macros::datetime;

    fn record(build_id: &str, changelist: u32, timestamp: PrimitiveDateTime) -> BuildRecord {
        BuildRecord {
            architecture: Architecture::X64,
            build_id: build_id.to_string(),
            timestamp,
            version: FileVersion::new(0, 600, 0, changelist),
            git_hash: Some("abc123".to_string()),
            channel: Channel::new("zcanary"),
        }
    }

    #[test]
    fn test_latest_timestamp_wins() {
        let early = record("version-a", 1000001, datetime!(2020-01-01 1:00:00));
        let late = record("version-b", 1000001, datetime!(2020-01-01 2:00:00));
        assert_eq!(dedupe([early.clone(), late.clone()]), vec![late.clone()]);
        assert_eq!(dedupe([late.clone(), early]), vec![late]);
    }

    #[test]
    fn test_distinct_changelists_are_kept() {
        let a = record("version-a", 1000002, datetime!(2020-01-01 1:00:00));
        let b = record("version-b", 1000001, datetime!(2020-01-01 1:00:00));
        let deduped = dedupe([a.clone(), b.clone()]);
        assert_eq!(deduped, vec![b, a]);
    }

    #[test]
    fn test_identical_records_collapse() {
        let a = record("version-a", 1000001, datetime!(2020-01-01 1:00:00));
        assert_eq!(dedupe([a.clone(), a.clone(), a.clone()]), vec![a]);
    }

    #[test]
    fn test_tie_break_is_order_independent() {
        let when = datetime!(2020-01-01 1:00:00);
        let a = record("version-aaa", 1000001, when);
        let b = record("version-bbb", 1000001, when);
        assert_eq!(dedupe([a.clone(), b.clone()]), vec![a.clone()]);
        assert_eq!(dedupe([b, a.clone()]), vec![a]);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("version-a", 1000001, datetime!(2020-01-01 1:00:00)),
            record("version-b", 1000001, datetime!(2020-01-01 3:00:00)),
            record("version-c", 1000001, datetime!(2020-01-01 2:00:00)),
            record("version-d", 1000002, datetime!(2020-01-02 1:00:00)),
            record("version-e", 1000003, datetime!(2019-12-31 23:00:00)),
            record("version-f", 1000003, datetime!(2019-12-31 23:00:00)),
        ];
        let once = dedupe(records);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_at_most_one_per_changelist_with_max_timestamp() {
        let records: Vec<_> = (0u8..24)
            .map(|hour| {
                let changelist = 1000000 + u32::from(hour % 5);
                let when = datetime!(2020-01-01 0:00:00).replace_hour(hour).unwrap();
                record(&format!("version-{hour}"), changelist, when)
            })
            .collect();
        let deduped = dedupe(records.clone());
        assert_eq!(deduped.len(), 5);
        for survivor in &deduped {
            let latest = records
                .iter()
                .filter(|r| r.changelist() == survivor.changelist())
                .map(|r| r.timestamp)
                .max()
                .unwrap();
            assert_eq!(survivor.timestamp, latest);
        }
    }

    #[test]
    fn test_empty() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
