use exn::{OptionExt, ResultExt};
use regex::Captures;
use time::PrimitiveDateTime;

use crate::consts::TIMESTAMP_FORMAT;
use crate::error::{ErrorKind, Result};
use crate::models::{Architecture, BuildRecord, Channel, FileVersion};

/// Capture groups of a single deploy history line, in pattern order.
pub(crate) struct Line<'h> {
    captures: Captures<'h>,
}
impl<'h> Line<'h> {
    pub(crate) fn new(captures: Captures<'h>) -> Self {
        Self { captures }
    }

    /// The whole matched text.
    pub(crate) fn text(&self) -> &'h str {
        self.captures.get(0).map(|m| m.as_str()).unwrap_or_default()
    }

    fn group(&self, index: usize, field: &'static str) -> Result<&'h str> {
        self.captures
            .get(index)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_raise(|| ErrorKind::MalformedRecord { field, value: String::new() })
    }

    fn number(&self, index: usize, field: &'static str) -> Result<u32> {
        let value = self.group(index, field)?;
        value.parse::<u32>().or_raise(|| ErrorKind::MalformedRecord { field, value: value.to_string() })
    }

    pub(crate) fn build_type(&self) -> Result<&'h str> {
        self.group(1, "build_type")
    }

    pub(crate) fn build_id(&self) -> Result<&'h str> {
        self.group(2, "build_id")
    }

    pub(crate) fn timestamp(&self) -> Result<PrimitiveDateTime> {
        let value = self.group(3, "timestamp")?;
        PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
            .or_raise(|| ErrorKind::MalformedRecord { field: "timestamp", value: value.to_string() })
    }

    pub(crate) fn version(&self) -> Result<FileVersion> {
        Ok(FileVersion {
            major: self.number(4, "major")?,
            minor: self.number(5, "minor")?,
            patch: self.number(6, "patch")?,
            changelist: self.number(7, "changelist")?,
        })
    }

    pub(crate) fn git_hash(&self) -> Result<&'h str> {
        self.group(8, "git_hash")
    }

    /// Assembles the full record. Admission policy is NOT applied here.
    pub(crate) fn record(&self, channel: &Channel) -> Result<BuildRecord> {
        Ok(BuildRecord {
            architecture: Architecture::from_build_type(self.build_type()?),
            build_id: self.build_id()?.to_string(),
            timestamp: self.timestamp()?,
            version: self.version()?,
            git_hash: Some(self.git_hash()?.to_string()),
            channel: channel.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEPLOY_LINE_REGEX;
    use rstest::rstest;
    use time::macros::datetime;

    const LINE: &str = "New WindowsPlayer version-1a2b3c4d at 1/2/2020 1:05:09 PM, \
        file version: 0, 600, 1, 1000001, git hash: abc123 ...";

    fn line(text: &str) -> Line<'_> {
        Line::new(DEPLOY_LINE_REGEX.captures(text).unwrap())
    }

    #[test]
    fn test_record() {
        let record = line(LINE).record(&Channel::new("zcanary")).unwrap();
        assert_eq!(record.architecture, Architecture::X86);
        assert_eq!(record.build_id, "version-1a2b3c4d");
        assert_eq!(record.timestamp, datetime!(2020-01-02 13:05:09));
        assert_eq!(record.version, FileVersion::new(0, 600, 1, 1000001));
        assert_eq!(record.git_hash.as_deref(), Some("abc123"));
        assert_eq!(record.channel, Channel::new("zcanary"));
        assert_eq!(line(LINE).text(), LINE);
    }

    #[rstest]
    #[case("12/31/2019 11:59:59 PM", datetime!(2019-12-31 23:59:59))]
    #[case("1/1/2020 12:00:00 AM", datetime!(2020-01-01 0:00:00))]
    #[case("1/1/2020 12:30:00 PM", datetime!(2020-01-01 12:30:00))]
    #[case("07/04/2021 09:00:00 AM", datetime!(2021-07-04 9:00:00))]
    #[case("1/1/2020 1:5:9 AM", datetime!(2020-01-01 1:05:09))]
    #[case("1/1/2020 11:7:30 PM", datetime!(2020-01-01 23:07:30))]
    #[case("1/1/2020 2:45:3 PM", datetime!(2020-01-01 14:45:03))]
    fn test_timestamp(#[case] timestamp: &str, #[case] expected: PrimitiveDateTime) {
        let text = LINE.replace("1/2/2020 1:05:09 PM", timestamp);
        assert_eq!(line(&text).timestamp().unwrap(), expected);
    }

    #[rstest]
    #[case("13/1/2020 1:00:00 AM")]
    #[case("2/30/2020 1:00:00 AM")]
    #[case("1/1/2020 13:00:00 PM")]
    #[case("1/1/2020 1:60:00 AM")]
    fn test_timestamp_malformed(#[case] timestamp: &str) {
        let text = LINE.replace("1/2/2020 1:05:09 PM", timestamp);
        let err = line(&text).timestamp().unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedRecord { field: "timestamp", .. }));
    }

    #[test]
    fn test_number_overflow_is_malformed() {
        let text = LINE.replace("1000001", "99999999999");
        let err = line(&text).record(&Channel::live()).unwrap_err();
        assert_eq!(
            *err,
            ErrorKind::MalformedRecord { field: "changelist", value: "99999999999".to_string() }
        );
    }
}
