/*!
 * Merge engine.
 *
 * Turns a `TrackSet` into one time-ordered lyric text. Two paths exist:
 * - word-level: every word line becomes a karaoke line, and the plain slot it
 *   aligns with hands over its romanization and translation text
 * - line-level: the union of plain, romanization and translation timestamps,
 *   interleaved per timestamp
 *
 * Whatever the word-level pass did not consume goes through the line-level
 * interleave and is merged into the output by time.
 */

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info};

use crate::app_config::{MergeStrategy, MergeToggles};

use super::alignment::AlignmentMatcher;
use super::metadata::is_metadata;
use super::parser::{self, DuplicateTextPolicy, ParseStats, TimeMap, WordLine};
use super::timestamp::{format_line_tag, format_word_marker};
use super::{LyricTrack, TrackSet};

/// Settings for one merge call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub toggles: MergeToggles,
    pub matcher: AlignmentMatcher,
    pub strategy: MergeStrategy,
    pub duplicate_text: DuplicateTextPolicy,
    pub carry_unmatched_lines: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            toggles: MergeToggles::default(),
            matcher: AlignmentMatcher::default(),
            strategy: MergeStrategy::default(),
            duplicate_text: DuplicateTextPolicy::default(),
            carry_unmatched_lines: true,
        }
    }
}

/// Which path produced the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePath {
    #[default]
    LineLevel,
    WordLevel,
    Legacy,
}

impl fmt::Display for MergePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LineLevel => "line-level",
            Self::WordLevel => "word-level",
            Self::Legacy => "legacy",
        };
        write!(f, "{}", name)
    }
}

/// Counters for one merge call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub path: MergePath,
    pub word_lines: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Credit lines that were kept bare
    pub metadata_lines: usize,
    /// Output lines produced from slots no word line consumed
    pub carried_lines: usize,
    pub emitted_lines: usize,
    /// Source lines dropped as malformed across all tracks
    pub skipped_lines: usize,
}

/// Result of one merge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// `None` when no line was produced
    pub lyrics: Option<String>,
    pub report: MergeReport,
}

/// Output lines sharing one timestamp
#[derive(Debug)]
struct Block {
    time_ms: u64,
    lines: Vec<String>,
}

impl Block {
    fn new(time_ms: u64) -> Self {
        Self { time_ms, lines: Vec::new() }
    }

    fn push_text(&mut self, text: &str) {
        self.lines.push(format!("{}{}", format_line_tag(self.time_ms), text));
    }
}

/// The three line-level tracks of one call
#[derive(Debug, Default)]
struct LineMaps {
    plain: TimeMap,
    translation: TimeMap,
    romanization: TimeMap,
}

#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge the tracks into lyric text
    pub fn merge(&self, tracks: &TrackSet) -> MergeOutcome {
        let outcome = match self.options.strategy {
            MergeStrategy::Layered => self.merge_layered(tracks),
            MergeStrategy::Legacy => self.merge_legacy(tracks),
        };

        let report = &outcome.report;
        info!("Merged lyrics via {} path: {} lines ({} word lines, {} matched, {} unmatched)",
              report.path, report.emitted_lines, report.word_lines, report.matched, report.unmatched);

        outcome
    }

    fn merge_layered(&self, tracks: &TrackSet) -> MergeOutcome {
        let toggles = self.options.toggles;
        let mut report = MergeReport::default();
        let mut maps = LineMaps::default();

        let mut parse = |track: LyricTrack, map: &mut TimeMap| {
            let stats = parser::parse_line_track_into(map, tracks.get(track), self.options.duplicate_text);
            report.skipped_lines += stats.skipped;
        };
        parse(LyricTrack::Plain, &mut maps.plain);
        if toggles.enable_translation {
            parse(LyricTrack::Translation, &mut maps.translation);
        }
        if toggles.enable_romanization {
            parse(LyricTrack::Romanization, &mut maps.romanization);
        }

        let (word_lines, word_stats) = if toggles.enable_word_level {
            parser::parse_word_track(tracks.get(LyricTrack::WordLevel))
        } else {
            (Vec::new(), ParseStats::default())
        };
        report.skipped_lines += word_stats.skipped;

        let blocks = if word_lines.is_empty() {
            report.path = MergePath::LineLevel;
            interleave(&mut maps, &mut report)
        } else {
            report.path = MergePath::WordLevel;
            self.merge_word_level(&word_lines, &mut maps, &mut report)
        };

        render(blocks, report)
    }

    fn merge_word_level(&self, word_lines: &[WordLine], maps: &mut LineMaps, report: &mut MergeReport) -> Vec<Block> {
        let toggles = self.options.toggles;
        let mut blocks = Vec::with_capacity(word_lines.len());
        report.word_lines = word_lines.len();

        for line in word_lines {
            let mut block = Block::new(line.start_ms);
            block.lines.push(render_word_line(line));

            let aligned = self.options.matcher.align(
                line,
                &mut maps.plain,
                &mut maps.translation,
                &mut maps.romanization,
            );

            match aligned {
                Some((_, slot)) => {
                    report.matched += 1;
                    if is_metadata(&line.text()) {
                        report.metadata_lines += 1;
                    } else {
                        if let Some(romanization) = slot.romanization.filter(|_| toggles.enable_romanization) {
                            block.push_text(&romanization);
                        }
                        if let Some(translation) = slot.translation.filter(|_| toggles.enable_translation) {
                            block.push_text(&translation);
                        }
                    }
                }
                None => report.unmatched += 1,
            }

            blocks.push(block);
        }

        // A plain line whose word line missed it is still here and gets emitted too
        if self.options.carry_unmatched_lines {
            let carried = interleave(maps, report);
            report.carried_lines = carried.iter().map(|b| b.lines.len()).sum();
            if report.matched == 0 {
                debug!("No word line aligned; carrying the full line-level interleave");
            }

            // Stable sort: word-level blocks stay ahead of carried blocks at equal times
            blocks.extend(carried);
            blocks.sort_by_key(|block| block.time_ms);
        }

        blocks
    }

    fn merge_legacy(&self, tracks: &TrackSet) -> MergeOutcome {
        let toggles = self.options.toggles;
        let mut report = MergeReport { path: MergePath::Legacy, ..MergeReport::default() };
        let mut pooled = TimeMap::new();

        let mut sources = vec![LyricTrack::Plain];
        if toggles.enable_romanization {
            sources.push(LyricTrack::Romanization);
        }
        if toggles.enable_translation {
            sources.push(LyricTrack::Translation);
        }

        for track in sources {
            let stats = parser::parse_line_track_into(&mut pooled, tracks.get(track), DuplicateTextPolicy::JoinDistinct);
            report.skipped_lines += stats.skipped;
        }

        let blocks = pooled
            .timestamps()
            .map(|time_ms| {
                let mut block = Block::new(time_ms);
                for piece in pooled.pieces(time_ms) {
                    block.push_text(piece);
                }
                block
            })
            .collect();

        render(blocks, report)
    }
}

/// Render `[start]<t0>tok0<t1>tok1...[end]`
pub fn render_word_line(line: &WordLine) -> String {
    let mut rendered = format_line_tag(line.start_ms);
    for token in &line.tokens {
        rendered.push_str(&format_word_marker(token.start_ms));
        rendered.push_str(&token.text);
    }
    rendered.push_str(&format_line_tag(line.end_ms()));
    rendered
}

/// Interleave whatever is left in the three maps by timestamp, draining them
fn interleave(maps: &mut LineMaps, report: &mut MergeReport) -> Vec<Block> {
    let times: BTreeSet<u64> = maps
        .plain
        .timestamps()
        .chain(maps.romanization.timestamps())
        .chain(maps.translation.timestamps())
        .collect();

    let mut blocks = Vec::with_capacity(times.len());
    for time_ms in times {
        let mut block = Block::new(time_ms);
        let romanization = maps.romanization.take(time_ms);
        let translation = maps.translation.take(time_ms);

        if let Some(plain) = maps.plain.take(time_ms) {
            block.push_text(&plain);
            if is_metadata(&plain) {
                report.metadata_lines += 1;
            } else {
                romanization.iter().chain(translation.iter()).for_each(|text| block.push_text(text));
            }
        } else if let Some(romanization) = romanization {
            block.push_text(&romanization);
            if let Some(translation) = translation {
                block.push_text(&translation);
            }
        } else if let Some(translation) = translation {
            block.push_text(&translation);
        }

        blocks.push(block);
    }

    blocks
}

fn render(blocks: Vec<Block>, mut report: MergeReport) -> MergeOutcome {
    let mut output = String::new();
    for line in blocks.iter().flat_map(|block| block.lines.iter()) {
        output.push_str(line);
        output.push('\n');
        report.emitted_lines += 1;
    }

    MergeOutcome {
        lyrics: (!output.is_empty()).then_some(output),
        report,
    }
}

/// Merge with the given options and return only the text
pub fn merge_tracks(tracks: &TrackSet, options: MergeOptions) -> Option<String> {
    MergeEngine::new(options).merge(tracks).lyrics
}
