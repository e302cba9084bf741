//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Each carries the channel that was being refreshed; the remote failure
/// underneath (with its endpoint) is a child in the error tree.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote backends could not be constructed from configuration.
    #[display("failed to set up remote backends")]
    Backend,
    #[display("failed to fetch deploy history for channel {_0}")]
    History(#[error(not(source))] String),
    #[display("failed to resolve the live build for channel {_0}")]
    Resolve(#[error(not(source))] String),
    /// The refresh was abandoned; the cached entry, if any, is unchanged.
    #[display("refresh of channel {_0} was cancelled")]
    Cancelled(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::History(_) | Self::Cancelled(_) => true,
            // The resolver has already retried against the default channel.
            Self::Backend | Self::Resolve(_) => false,
        }
    }
}
