//! Main extraction logic for raw deploy history text.

mod line;

use tracing::{debug, instrument, trace};

use self::line::Line;
use crate::consts::{DEPLOY_LINE_REGEX, HIDDEN_BUILD_ID};
use crate::dedupe::dedupe;
use crate::error::ErrorKind;
use crate::models::{Architecture, BuildRecord, Channel};
use crate::policy::{SkipReason, Skipped, exclusion, is_hidden};

/// Outcome of parsing one line matched by the deploy history pattern.
pub type Candidate = std::result::Result<BuildRecord, Skipped>;

/// Pulls build records out of a raw deploy history blob.
#[derive(Debug, Clone)]
pub struct Extractor<'h> {
    history: &'h str,
    channel: Channel,
}
impl<'h> Extractor<'h> {
    /// Records produced by this extractor are tagged with `channel`.
    pub fn new(history: &'h str, channel: impl Into<Channel>) -> Self {
        Self { history, channel: channel.into() }
    }

    /// Returns `true` if the history mentions the hidden build placeholder
    /// anywhere, meaning the channel's real history has been withheld.
    pub fn is_hidden_feed(&self) -> bool {
        is_hidden_feed(self.history)
    }

    /// Iterates every line matching the deploy pattern, in document order.
    ///
    /// Lines that fail to parse, carry a hidden build identifier, or fall under
    /// the security floor are yielded as [`Skipped`]; they never stop the
    /// iteration.
    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        DEPLOY_LINE_REGEX.captures_iter(self.history).map(|captures| self.candidate(Line::new(captures)))
    }

    fn candidate(&self, line: Line<'_>) -> Candidate {
        let skipped = |reason: SkipReason| Skipped { text: line.text().to_string(), reason };
        // Hidden builds are dropped before anything else is parsed.
        if let Ok(build_id) = line.build_id()
            && is_hidden(build_id)
        {
            trace!(line = line.text(), "skipping hidden release");
            return Err(skipped(SkipReason::Hidden));
        }
        let record = match line.record(&self.channel) {
            Ok(record) => record,
            Err(e) => {
                let kind: &ErrorKind = &e;
                debug!(line = line.text(), error = %kind, "skipping malformed deploy line");
                let (field, value) = match kind {
                    ErrorKind::MalformedRecord { field, value } | ErrorKind::ParseError { field, value } => {
                        (*field, value.clone())
                    },
                };
                return Err(skipped(SkipReason::Malformed { field, value }));
            },
        };
        match exclusion(&record) {
            Some(reason) => {
                trace!(line = line.text(), %reason, "excluding deploy line");
                Err(skipped(reason))
            },
            None => Ok(record),
        }
    }

    /// Splits every admitted record by architecture, without deduplication.
    #[instrument(skip(self), fields(channel = %self.channel, history_size = self.history.len()))]
    pub fn partition(&self) -> Extraction {
        let mut extraction = Extraction::default();
        for candidate in self.candidates() {
            match candidate {
                Ok(record) => extraction.push(record),
                Err(skipped) => extraction.skipped.push(skipped),
            }
        }
        debug!(
            x86 = extraction.x86.len(),
            x64 = extraction.x64.len(),
            skipped = extraction.skipped.len(),
            "partitioned deploy history"
        );
        extraction
    }

    /// Partitions the history and deduplicates each architecture.
    pub fn extract(&self) -> Extraction {
        self.partition().deduped()
    }
}

/// Returns `true` if the raw history text signals a withheld feed.
///
/// Only the exact lowercase placeholder withholds the whole feed. A line whose
/// build identifier merely differs in case is skipped on its own by the
/// admission policy and the rest of the history is still used.
pub fn is_hidden_feed(history: &str) -> bool {
    history.contains(HIDDEN_BUILD_ID)
}

/// Build records extracted from a deploy history, split by architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub x86: Vec<BuildRecord>,
    pub x64: Vec<BuildRecord>,
    /// Lines that matched the pattern but were not admitted.
    pub skipped: Vec<Skipped>,
}
impl Extraction {
    fn push(&mut self, record: BuildRecord) {
        match record.architecture {
            Architecture::X86 => self.x86.push(record),
            Architecture::X64 => self.x64.push(record),
        }
    }

    /// Records for a single architecture.
    pub fn records(&self, architecture: Architecture) -> &[BuildRecord] {
        match architecture {
            Architecture::X86 => &self.x86,
            Architecture::X64 => &self.x64,
        }
    }

    /// Applies [`dedupe`] to each architecture independently.
    pub fn deduped(self) -> Self {
        Self {
            x86: dedupe(self.x86),
            x64: dedupe(self.x64),
            skipped: self.skipped,
        }
    }
}
