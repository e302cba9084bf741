//! Admission policy for extracted build records.
//!
//! Records failing the policy are dropped without raising an error. They're
//! still reported back to the caller as [`Skipped`] entries so exclusions
//! stay observable.

use derive_more::Display;

use crate::consts::{HIDDEN_BUILD_ID, MINIMUM_MINOR_VERSION};
use crate::models::BuildRecord;

/// Why a deploy history line did not produce a build record.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line matched the pattern but a field was missing or unparseable.
    #[display("malformed field '{field}': {value}")]
    Malformed { field: &'static str, value: String },
    /// The build identifier was withheld upstream.
    #[display("hidden release")]
    Hidden,
    /// Minor version is under the security floor.
    #[display("minor version {_0} is below the security floor")]
    BelowSecurityFloor(u32),
}

/// A deploy history line that was matched but not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The matched text, verbatim.
    pub text: String,
    pub reason: SkipReason,
}

/// Returns `true` if the build identifier is the "hidden" placeholder.
pub fn is_hidden(build_id: &str) -> bool {
    build_id.eq_ignore_ascii_case(HIDDEN_BUILD_ID)
}

/// Returns the reason a record must be excluded, if any.
///
/// # Examples
///
/// ```
/// use deploylog_extract::{SkipReason, exclusion};
/// # use deploylog_extract::models::*;
/// # use time::macros::datetime;
/// let record = BuildRecord {
///     architecture: Architecture::X64,
///     build_id: "version-abc".into(),
///     timestamp: datetime!(2020-01-01 1:00:00),
///     version: FileVersion::new(0, 549, 0, 1000001),
///     git_hash: Some("deadbeef".into()),
///     channel: Channel::new("zcanary"),
/// };
/// assert_eq!(exclusion(&record), Some(SkipReason::BelowSecurityFloor(549)));
/// ```
pub fn exclusion(record: &BuildRecord) -> Option<SkipReason> {
    if is_hidden(&record.build_id) {
        return Some(SkipReason::Hidden);
    }
    if record.version.minor < MINIMUM_MINOR_VERSION {
        return Some(SkipReason::BelowSecurityFloor(record.version.minor));
    }
    None
}

/// Returns `true` if the record may enter a build record set.
pub fn is_admissible(record: &BuildRecord) -> bool {
    exclusion(record).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Architecture, Channel, FileVersion};
    use rstest::rstest;
    use time::macros::datetime;

    fn record(build_id: &str, minor: u32) -> BuildRecord {
        BuildRecord {
            architecture: Architecture::X86,
            build_id: build_id.to_string(),
            timestamp: datetime!(2020-01-01 1:00:00),
            version: FileVersion::new(0, minor, 0, 1000001),
            git_hash: Some("abc123".to_string()),
            channel: Channel::new("zcanary"),
        }
    }

    #[rstest]
    #[case(550, true)]
    #[case(551, true)]
    #[case(549, false)]
    #[case(0, false)]
    fn test_security_floor(#[case] minor: u32, #[case] admissible: bool) {
        assert_eq!(is_admissible(&record("version-abc", minor)), admissible);
    }

    #[rstest]
    #[case("version-hidden")]
    #[case("VERSION-HIDDEN")]
    #[case("Version-Hidden")]
    fn test_hidden_is_excluded(#[case] build_id: &str) {
        assert_eq!(exclusion(&record(build_id, 600)), Some(SkipReason::Hidden));
    }

    #[test]
    fn test_hidden_takes_precedence_over_floor() {
        assert_eq!(exclusion(&record("version-hidden", 1)), Some(SkipReason::Hidden));
    }

    #[test]
    fn test_similar_identifier_is_not_hidden() {
        assert!(!is_hidden("version-hiddenabc"));
        assert!(is_admissible(&record("version-hiddenabc", 600)));
    }
}
