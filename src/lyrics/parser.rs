/*!
 * Track parsing.
 *
 * Converts raw lyric blobs into time-keyed records: a `TimeMap` for
 * line-level tracks and a sequence of `WordLine`s for the word-level track.
 * Malformed or blank lines are skipped and counted, never reported as errors.
 */

use std::collections::BTreeMap;
use std::collections::btree_map;

use log::debug;
use serde::{Deserialize, Serialize};

use super::timestamp;

/// How text arriving at an already-used timestamp is combined
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTextPolicy {
    /// Space-join, dropping pieces identical to one already stored
    #[default]
    JoinDistinct,
    /// Always space-join
    Join,
}

/// A single parsed line of a line-level track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedLine {
    pub time_ms: u64,
    pub text: String,
}

/// Ordered timestamp to text mapping for one line-level track.
///
/// Keys are unique. Each key keeps the text pieces that arrived for it; the
/// stored text is those pieces joined with a single space. Entries are taken
/// out once an output line has used them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeMap {
    entries: BTreeMap<u64, Vec<String>>,
}

impl TimeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add text at a timestamp, combining with existing text per `policy`
    pub fn insert(&mut self, time_ms: u64, text: &str, policy: DuplicateTextPolicy) {
        match self.entries.entry(time_ms) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(vec![text.to_string()]);
            }
            btree_map::Entry::Occupied(mut slot) => {
                let pieces = slot.get_mut();
                if policy == DuplicateTextPolicy::JoinDistinct && pieces.iter().any(|p| p == text) {
                    return;
                }
                pieces.push(text.to_string());
            }
        }
    }

    /// Joined text at `time_ms`
    pub fn get(&self, time_ms: u64) -> Option<String> {
        self.entries.get(&time_ms).map(|pieces| pieces.join(" "))
    }

    /// The individual pieces stored at `time_ms`, in arrival order
    pub fn pieces(&self, time_ms: u64) -> &[String] {
        self.entries.get(&time_ms).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove the entry at `time_ms` and return its joined text
    pub fn take(&mut self, time_ms: u64) -> Option<String> {
        self.entries.remove(&time_ms).map(|pieces| pieces.join(" "))
    }

    pub fn contains(&self, time_ms: u64) -> bool {
        self.entries.contains_key(&time_ms)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with `|t - center| <= radius`, ascending by time
    pub fn within(&self, center_ms: u64, radius_ms: u64) -> impl Iterator<Item = (u64, String)> + '_ {
        let low = center_ms.saturating_sub(radius_ms);
        let high = center_ms.saturating_add(radius_ms);
        self.entries
            .range(low..=high)
            .map(|(time, pieces)| (*time, pieces.join(" ")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, String)> + '_ {
        self.entries.iter().map(|(time, pieces)| (*time, pieces.join(" ")))
    }

    pub fn timestamps(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn to_lines(&self) -> Vec<TimedLine> {
        self.iter()
            .map(|(time_ms, text)| TimedLine { time_ms, text })
            .collect()
    }
}

/// One timed word or syllable of a word line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub start_ms: u64,
    pub text: String,
}

/// A line of the word-level track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLine {
    pub start_ms: u64,
    pub duration_ms: u64,
    pub tokens: Vec<WordToken>,
}

impl WordLine {
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    /// Token texts concatenated without separators
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Line counts gathered while parsing one track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub parsed: usize,
    pub skipped: usize,
}

/// Split on `\r\n`, `\n` or a bare `\r`
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .flat_map(|line| line.split('\r'))
}

/// Parse a line-level track into a `TimeMap`.
///
/// A line may carry several leading tags; its text is stored under each of them.
pub fn parse_line_track(content: Option<&str>, policy: DuplicateTextPolicy) -> (TimeMap, ParseStats) {
    let mut map = TimeMap::new();
    let stats = parse_line_track_into(&mut map, content, policy);
    (map, stats)
}

/// Parse a line-level track, adding its lines to an existing map
pub fn parse_line_track_into(map: &mut TimeMap, content: Option<&str>, policy: DuplicateTextPolicy) -> ParseStats {
    let mut stats = ParseStats::default();

    let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
        return stats;
    };

    for line in split_lines(content) {
        if line.trim().is_empty() {
            continue;
        }

        let mut times = Vec::new();
        let mut rest = line.trim_start();
        while let Some((time_ms, remainder)) = timestamp::split_line_tag(rest) {
            times.push(time_ms);
            rest = remainder;
        }

        let text = rest.trim();
        if times.is_empty() || text.is_empty() {
            stats.skipped += 1;
            continue;
        }

        for time_ms in times {
            map.insert(time_ms, text, policy);
        }
        stats.parsed += 1;
    }

    debug!("Parsed line-level track: {} lines, {} skipped, {} timestamps",
           stats.parsed, stats.skipped, map.len());

    stats
}

/// Parse a word-level track into word lines sorted by start time
pub fn parse_word_track(content: Option<&str>) -> (Vec<WordLine>, ParseStats) {
    let mut lines = Vec::new();
    let mut stats = ParseStats::default();

    let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
        return (lines, stats);
    };

    for line in split_lines(content) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some((start_ms, duration_ms, rest)) = timestamp::split_word_line_tag(trimmed) else {
            stats.skipped += 1;
            continue;
        };

        let tokens: Vec<WordToken> = timestamp::scan_word_tokens(rest)
            .into_iter()
            .map(|(start_ms, text)| WordToken { start_ms, text })
            .collect();

        if tokens.is_empty() {
            stats.skipped += 1;
            continue;
        }

        lines.push(WordLine { start_ms, duration_ms, tokens });
        stats.parsed += 1;
    }

    lines.sort_by_key(|line| line.start_ms);

    debug!("Parsed word-level track: {} lines, {} skipped", stats.parsed, stats.skipped);

    (lines, stats)
}
