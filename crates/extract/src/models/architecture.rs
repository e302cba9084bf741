use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Processor architecture a build was published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase", try_from = "String"))]
pub enum Architecture {
    /// 32-bit
    X86,
    /// 64-bit
    X64,
}
impl Architecture {
    /// Derives the architecture from a build/binary type token: anything
    /// ending in the literal suffix `64` is 64-bit, everything else 32-bit.
    ///
    /// # Examples
    ///
    /// ```
    /// use deploylog_extract::models::Architecture;
    /// assert_eq!(Architecture::from_build_type("WindowsPlayer64"), Architecture::X64);
    /// assert_eq!(Architecture::from_build_type("WindowsPlayer"), Architecture::X86);
    /// ```
    pub fn from_build_type(build_type: &str) -> Self {
        if build_type.ends_with("64") { Self::X64 } else { Self::X86 }
    }

    /// Like [`from_build_type`](Self::from_build_type), but returns `None`
    /// for architecture-agnostic tokens instead of assuming 32-bit.
    pub fn from_suffix(build_type: &str) -> Option<Self> {
        build_type.ends_with("64").then_some(Self::X64)
    }

    /// Architecture of the running process.
    pub fn host() -> Self {
        if cfg!(target_pointer_width = "64") { Self::X64 } else { Self::X86 }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
        }
    }
}
impl FromStr for Architecture {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "x86" | "32" | "32bit" | "win32" | "i686" => Self::X86,
            "x64" | "64" | "64bit" | "amd64" | "x8664" => Self::X64,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "architecture",
                value: format!("unknown architecture: {}", s)
            }),
        })
    }
}
impl TryFrom<String> for Architecture {
    type Error = ErrorKind;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|err: Error| (*err).clone())
    }
}
impl Display for Architecture {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("WindowsPlayer", Architecture::X86)]
    #[case("WindowsPlayer64", Architecture::X64)]
    #[case("Studio64", Architecture::X64)]
    #[case("WindowsPlayer640x", Architecture::X86)]
    fn test_from_build_type(#[case] input: &str, #[case] expected: Architecture) {
        assert_eq!(Architecture::from_build_type(input), expected);
    }

    #[test]
    fn test_from_suffix_is_agnostic_without_64() {
        assert_eq!(Architecture::from_suffix("WindowsPlayer"), None);
        assert_eq!(Architecture::from_suffix("WindowsPlayer64"), Some(Architecture::X64));
    }

    #[rstest]
    #[case("x86", Architecture::X86)]
    #[case("32-bit", Architecture::X86)]
    #[case("Win32", Architecture::X86)]
    #[case("x64", Architecture::X64)]
    #[case("x86_64", Architecture::X64)]
    #[case(" AMD64 ", Architecture::X64)]
    fn test_from_str(#[case] input: &str, #[case] expected: Architecture) {
        assert_eq!(input.parse::<Architecture>().unwrap(), expected);
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(Architecture::try_from("i686".to_string()), Ok(Architecture::X86));
        assert!(matches!(
            Architecture::try_from("arm64e".to_string()),
            Err(ErrorKind::ParseError { field: "architecture", .. })
        ));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "arm64e".parse::<Architecture>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "architecture", .. }));
    }
}
