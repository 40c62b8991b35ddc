/*!
 * Alignment of word-level lines onto the plain track.
 *
 * A word line and its plain-track counterpart rarely share an exact
 * timestamp. The matcher looks at plain entries inside a time window and
 * tries, in order:
 * 1. exact equality of normalized text
 * 2. containment of one normalized text in the other
 * 3. the nearest entry, only when it is very close in time
 *
 * A matched plain timestamp is consumed from the plain, translation and
 * romanization maps so it can never serve a second word line.
 */

use std::fmt;

use log::debug;

use super::parser::{TimeMap, WordLine};

/// Default half-width of the candidate window around a word line's start
pub const DEFAULT_CANDIDATE_WINDOW_MS: u64 = 5_000;

/// Default maximum distance for a match with no textual evidence
pub const DEFAULT_NEAREST_FALLBACK_MS: u64 = 1_000;

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Containment,
    Nearest,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Containment => "containment",
            Self::Nearest => "nearest",
        };
        write!(f, "{}", name)
    }
}

/// A plain-track timestamp chosen for a word line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub time_ms: u64,
    pub tier: MatchTier,
}

/// Text removed from the companion tracks when a slot is consumed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedSlot {
    pub plain: Option<String>,
    pub translation: Option<String>,
    pub romanization: Option<String>,
}

/// Keep only letters and digits, lower-cased
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMatcher {
    candidate_window_ms: u64,
    nearest_fallback_ms: u64,
}

impl Default for AlignmentMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_WINDOW_MS, DEFAULT_NEAREST_FALLBACK_MS)
    }
}

impl AlignmentMatcher {
    pub fn new(candidate_window_ms: u64, nearest_fallback_ms: u64) -> Self {
        Self {
            candidate_window_ms,
            nearest_fallback_ms,
        }
    }

    pub fn candidate_window_ms(&self) -> u64 {
        self.candidate_window_ms
    }

    pub fn nearest_fallback_ms(&self) -> u64 {
        self.nearest_fallback_ms
    }

    /// Find the plain-track timestamp that best matches `line`.
    ///
    /// Only looks at what is currently left in `plain`.
    pub fn find_match(&self, line: &WordLine, plain: &TimeMap) -> Option<Match> {
        let start = line.start_ms;
        let target = normalize_text(&line.text());

        let candidates: Vec<(u64, String)> = plain
            .within(start, self.candidate_window_ms)
            .map(|(time, text)| (time, normalize_text(&text)))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        // Empty text only matches through the nearest tier
        if !target.is_empty() {
            if let Some((time, _)) = candidates.iter().find(|(_, text)| *text == target) {
                return Some(Match { time_ms: *time, tier: MatchTier::Exact });
            }

            let contained = candidates.iter().find(|(_, text)| {
                !text.is_empty() && (text.contains(target.as_str()) || target.contains(text.as_str()))
            });
            if let Some((time, _)) = contained {
                return Some(Match { time_ms: *time, tier: MatchTier::Containment });
            }
        }

        // min_by_key keeps the first minimum, so ties go to the earlier timestamp
        candidates
            .iter()
            .map(|(time, _)| (*time, time.abs_diff(start)))
            .min_by_key(|(_, distance)| *distance)
            .filter(|(_, distance)| *distance <= self.nearest_fallback_ms)
            .map(|(time, _)| Match { time_ms: time, tier: MatchTier::Nearest })
    }

    /// Match `line` and consume the matched slot from all three maps
    pub fn align(
        &self,
        line: &WordLine,
        plain: &mut TimeMap,
        translation: &mut TimeMap,
        romanization: &mut TimeMap,
    ) -> Option<(Match, ConsumedSlot)> {
        let found = self.find_match(line, plain);
        match found {
            Some(m) => {
                debug!("Word line at {}ms matched plain line at {}ms ({})", line.start_ms, m.time_ms, m.tier);
                let slot = consume(m.time_ms, plain, translation, romanization);
                Some((m, slot))
            }
            None => {
                debug!("Word line at {}ms has no plain counterpart", line.start_ms);
                None
            }
        }
    }
}

/// Remove `time_ms` from the plain, translation and romanization maps
pub fn consume(
    time_ms: u64,
    plain: &mut TimeMap,
    translation: &mut TimeMap,
    romanization: &mut TimeMap,
) -> ConsumedSlot {
    ConsumedSlot {
        plain: plain.take(time_ms),
        translation: translation.take(time_ms),
        romanization: romanization.take(time_ms),
    }
}
