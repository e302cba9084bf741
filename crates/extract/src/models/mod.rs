mod architecture;
mod channel;
mod digest;
mod record;
mod version;

pub use self::architecture::Architecture;
pub use self::channel::{Channel, DEFAULT_CHANNEL};
pub use self::digest::HistoryDigest;
pub use self::record::BuildRecord;
pub use self::version::FileVersion;

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace('/', "").replace('-', "").replace('_', "").replace(' ', "")
}
