use regex::Regex;
use std::sync::LazyLock;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Build identifier the vendor publishes in place of a withheld one.
pub const HIDDEN_BUILD_ID: &str = "version-hidden";
/// Lowest minor version that may ever be admitted. Everything older is
/// blocked because of a remote code execution vulnerability.
pub const MINIMUM_MINOR_VERSION: u32 = 550;

// Groups: build type, build id, timestamp, major, minor, patch, changelist, git hash.
regex!(
    DEPLOY_LINE_REGEX,
    concat!(
        r"New (WindowsPlayer(?:64)?) (version-[A-Za-z0-9]+) at (\d+/\d+/\d+ \d+:\d+:\d+ [AP]M), ",
        r"file version: (\d+), (\d+), (\d+), (\d+), git hash: ([a-f0-9]+) ..."
    )
);

/// Deploy history timestamps: `M/D/YYYY h:mm:ss AM`, independent of host locale.
/// No field requires zero padding.
pub(crate) const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[month padding:none]/[day padding:none]/[year] [hour repr:12 padding:none]:[minute padding:none]:[second padding:none] [period]"
);
