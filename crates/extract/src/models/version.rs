use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::{OptionExt, ResultExt};

use crate::error::{Error, ErrorKind};

/// Four-part file version of a build: `major.minor.patch.changelist`.
///
/// The changelist is the source-control revision the build was cut from and
/// is the true identity of a logical release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileVersion {
    /// Major revision
    pub major: u32,
    /// Minor version (subject to the security floor)
    pub minor: u32,
    pub patch: u32,
    pub changelist: u32,
}
impl FileVersion {
    pub fn new(major: u32, minor: u32, patch: u32, changelist: u32) -> Self {
        Self { major, minor, patch, changelist }
    }
}
impl From<[u32; 4]> for FileVersion {
    fn from([major, minor, patch, changelist]: [u32; 4]) -> Self {
        Self::new(major, minor, patch, changelist)
    }
}
impl FromStr for FileVersion {
    type Err = Error;

    /// Parses the dotted form (`0.550.0.1000001`). Only ASCII digits are
    /// accepted in each part; host locale plays no role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::ParseError { field: "version", value: s.to_string() };
        let mut parts = s.trim().split('.');
        let mut numbers = [0u32; 4];
        for number in numbers.iter_mut() {
            let part = parts.next().ok_or_raise(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                exn::bail!(invalid());
            }
            *number = part.parse::<u32>().or_raise(invalid)?;
        }
        if parts.next().is_some() {
            exn::bail!(invalid());
        }
        Ok(numbers.into())
    }
}
impl Display for FileVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.changelist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.550.0.1000001", FileVersion::new(0, 550, 0, 1000001))]
    #[case(" 0.601.1.6010567 ", FileVersion::new(0, 601, 1, 6010567))]
    fn test_parse(#[case] input: &str, #[case] expected: FileVersion) {
        assert_eq!(input.parse::<FileVersion>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("0.550.0")]
    #[case("0.550.0.1.2")]
    #[case("0.550..1")]
    #[case("0.+550.0.1")]
    #[case("0.550.0.99999999999")]
    #[case("0.٥٥٠.0.1")]
    fn test_parse_invalid(#[case] input: &str) {
        let err = input.parse::<FileVersion>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "version", .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(FileVersion::new(0, 550, 0, 1000001).to_string(), "0.550.0.1000001");
    }
}
