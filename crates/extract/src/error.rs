//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.
//!
//! Most extraction problems never surface as an [`Error`]: a single bad line
//! in a deploy history is reported as a [`Skipped`](crate::Skipped) entry and
//! the rest of the batch carries on. Errors are reserved for values handed to
//! the crate directly (version strings, architecture names, timestamps).

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A pattern match produced a missing or unparseable field.
    #[display("malformed record: failed to parse field '{field}', found value: {value}")]
    MalformedRecord {
        /// The field that failed to parse.
        field: &'static str,
        /// The raw value that was found (empty when the group was missing).
        value: String,
    },
    /// A value handed directly to the crate could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// Details about the parsing failure.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Text is either well-formed or it isn't.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let kind = ErrorKind::MalformedRecord { field: "changelist", value: "12x".to_string() };
        assert_eq!(kind.to_string(), "malformed record: failed to parse field 'changelist', found value: 12x");
        let kind = ErrorKind::ParseError { field: "version", value: "1.2".to_string() };
        assert_eq!(kind.to_string(), "failed to parse field 'version', found value: 1.2");
    }

    #[test]
    fn error_kind_never_retryable() {
        assert!(!ErrorKind::ParseError { field: "x", value: String::new() }.is_retryable());
        assert!(!ErrorKind::MalformedRecord { field: "x", value: String::new() }.is_retryable());
    }
}
