/*!
 * Multi-track lyric synchronization.
 *
 * This module contains:
 * - `timestamp`: tag grammars and the output time format
 * - `parser`: line-level and word-level track parsing
 * - `metadata`: credit-line detection
 * - `alignment`: matching word lines onto plain-track timestamps
 * - `merge`: the merge engine producing the final lyric text
 */

use std::fmt;

pub mod alignment;
pub mod merge;
pub mod metadata;
pub mod parser;
pub mod timestamp;

pub use alignment::{AlignmentMatcher, Match, MatchTier};
pub use merge::{MergeEngine, MergeOptions, MergeOutcome, MergePath, MergeReport};
pub use metadata::is_metadata;
pub use parser::{DuplicateTextPolicy, TimeMap, TimedLine, WordLine, WordToken};

/// The four kinds of lyric track a song can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LyricTrack {
    Plain,
    Translation,
    Romanization,
    WordLevel,
}

impl fmt::Display for LyricTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "plain",
            Self::Translation => "translation",
            Self::Romanization => "romanization",
            Self::WordLevel => "word-level",
        };
        write!(f, "{}", name)
    }
}

/// Raw track blobs for one song. Absent and blank tracks are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSet {
    pub plain: Option<String>,
    pub translation: Option<String>,
    pub romanization: Option<String>,
    pub word_level: Option<String>,
}

impl TrackSet {
    /// Track content, with blank content reported as absent
    pub fn get(&self, track: LyricTrack) -> Option<&str> {
        let raw = match track {
            LyricTrack::Plain => &self.plain,
            LyricTrack::Translation => &self.translation,
            LyricTrack::Romanization => &self.romanization,
            LyricTrack::WordLevel => &self.word_level,
        };
        raw.as_deref().filter(|content| !content.trim().is_empty())
    }

    pub fn with_track(mut self, track: LyricTrack, content: impl Into<String>) -> Self {
        let slot = match track {
            LyricTrack::Plain => &mut self.plain,
            LyricTrack::Translation => &mut self.translation,
            LyricTrack::Romanization => &mut self.romanization,
            LyricTrack::WordLevel => &mut self.word_level,
        };
        *slot = Some(content.into());
        self
    }

    /// True when every track is absent or blank
    pub fn is_empty(&self) -> bool {
        [LyricTrack::Plain, LyricTrack::Translation, LyricTrack::Romanization, LyricTrack::WordLevel]
            .into_iter()
            .all(|track| self.get(track).is_none())
    }
}
