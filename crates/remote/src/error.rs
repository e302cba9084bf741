//! Remote Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. See `ERRORS.md` for design rationale.

use derive_more::{Display, Error};

/// A remote error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed.
    #[display("failed to build HTTP client")]
    Client,
    /// The request never produced a successful response: connection
    /// failure, timeout or non-2xx status.
    #[display("failed to fetch {endpoint} for channel {channel}")]
    Transport {
        /// Channel the request was made for.
        channel: String,
        /// The URL (or mock address) that was requested.
        endpoint: String,
    },
    /// A response arrived, but its body was not what was expected.
    #[display("invalid response from {endpoint} for channel {channel}")]
    InvalidResponse { channel: String, endpoint: String },
    /// Neither the requested channel nor the default channel could be
    /// resolved.
    #[display("unable to resolve the current build for channel {channel}")]
    Unresolved {
        /// The channel originally requested.
        channel: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Channel the failed request was made for, if any.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Client => None,
            Self::Transport { channel, .. } | Self::InvalidResponse { channel, .. } | Self::Unresolved { channel } => {
                Some(channel)
            },
        }
    }

    /// The endpoint that was requested, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Transport { endpoint, .. } | Self::InvalidResponse { endpoint, .. } => Some(endpoint),
            Self::Client | Self::Unresolved { .. } => None,
        }
    }
}
