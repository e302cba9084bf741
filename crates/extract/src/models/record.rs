use super::{Architecture, Channel, FileVersion};
use time::PrimitiveDateTime;

/// One observed build of the client.
///
/// Records are plain values: two records are the same record when every field
/// matches, regardless of where they came from. They're created either by the
/// [`Extractor`](crate::Extractor) (one per deploy history line) or
/// synthesized from the client-settings service when a channel has no readable
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildRecord {
    pub architecture: Architecture,
    /// Opaque identifier of the uploaded build (e.g. `version-1a2b3c4d5e6f4a1b`)
    pub build_id: String,
    /// When the deploy was observed. The history feed carries no timezone.
    pub timestamp: PrimitiveDateTime,
    pub version: FileVersion,
    /// Source-control hash; absent for synthesized records
    pub git_hash: Option<String>,
    pub channel: Channel,
}
impl BuildRecord {
    /// Changelist number, the logical release identity.
    pub fn changelist(&self) -> u32 {
        self.version.changelist
    }

    /// Dotted version string, e.g. `0.550.0.1000001`.
    pub fn version_id(&self) -> String {
        self.version.to_string()
    }

    /// Returns `true` if the record did not come from a deploy history line.
    pub fn is_synthesized(&self) -> bool {
        self.git_hash.is_none()
    }
}
impl AsRef<BuildRecord> for BuildRecord {
    fn as_ref(&self) -> &BuildRecord {
        self
    }
}
