/// Content identity of a raw deploy history blob.
///
/// Two blobs with equal digests are treated as the same history, so the
/// (comparatively) expensive parse and dedupe can be skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryDigest {
    /// BLAKE3 hash of the raw text
    pub hash: String,
    /// Text length in bytes (for quick/cheap equality check)
    pub length: u64,
    /// CRC32 hash of the raw text
    pub crc32: u32,
}
impl HistoryDigest {
    pub fn of(history: impl AsRef<[u8]>) -> Self {
        let bytes = history.as_ref();
        Self {
            hash: blake3::hash(bytes).to_string(),
            // Infallible on every supported target: usize is at most 64 bits.
            length: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            crc32: crc32fast::hash(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_identical_digest() {
        assert_eq!(HistoryDigest::of("New WindowsPlayer"), HistoryDigest::of(String::from("New WindowsPlayer")));
    }

    #[test]
    fn test_different_text_different_digest() {
        let a = HistoryDigest::of("New WindowsPlayer version-a");
        let b = HistoryDigest::of("New WindowsPlayer version-b");
        assert_eq!(a.length, b.length);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty() {
        let digest = HistoryDigest::of("");
        assert_eq!(digest.length, 0);
        assert_eq!(digest.crc32, 0);
        assert_eq!(digest.hash.len(), 64);
    }
}
