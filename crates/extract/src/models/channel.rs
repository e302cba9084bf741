use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::{convert::Infallible, str::FromStr};

/// Name of the default release channel.
pub const DEFAULT_CHANNEL: &str = "LIVE";

/// A named release track (`LIVE`, `zcanary`, `beta`, ...).
///
/// Channel names are case-insensitive: `LIVE` and `live` are the same channel
/// for equality, hashing and ordering. The spelling used at construction is
/// kept for display and for building request URLs.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Channel {
    name: String,
}
impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into().trim().to_string() }
    }

    /// The default channel, which never publishes a readable history.
    pub fn live() -> Self {
        Self::new(DEFAULT_CHANNEL)
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the default (`LIVE`) channel, in any casing.
    pub fn is_default(&self) -> bool {
        self.name.eq_ignore_ascii_case(DEFAULT_CHANNEL)
    }

    fn key(&self) -> impl Iterator<Item = u8> + '_ {
        self.name.bytes().map(|b| b.to_ascii_lowercase())
    }
}
impl Default for Channel {
    fn default() -> Self {
        Self::live()
    }
}
impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}
impl Hash for Channel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.key() {
            state.write_u8(byte);
        }
        state.write_u8(0xff);
    }
}
impl Ord for Channel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(other.key())
    }
}
impl PartialOrd for Channel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl FromStr for Channel {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
impl From<&str> for Channel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for Channel {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_case_insensitive_identity() {
        assert_eq!(Channel::new("LIVE"), Channel::new("live"));
        assert_ne!(Channel::new("beta"), Channel::new("live"));
        let set: HashSet<Channel> = ["zCanary", "ZCANARY", "zcanary"].into_iter().map(Channel::from).collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display_preserves_spelling() {
        assert_eq!(Channel::new(" zCanary ").to_string(), "zCanary");
        assert_eq!(Channel::live().as_str(), "LIVE");
    }

    #[test]
    fn test_is_default() {
        assert!(Channel::new("live").is_default());
        assert!(Channel::default().is_default());
        assert!(!Channel::new("beta").is_default());
    }

    #[test]
    fn test_ordering_ignores_case() {
        let mut channels = vec![Channel::new("beta"), Channel::new("ALPHA"), Channel::new("Live")];
        channels.sort();
        let names: Vec<_> = channels.iter().map(Channel::as_str).collect();
        assert_eq!(names, ["ALPHA", "beta", "Live"]);
    }
}
