/*!
 * Tests for line-level and word-level track parsing
 */

use lyricsync::lyrics::parser::{parse_line_track, parse_word_track, ParseStats};
use lyricsync::lyrics::{DuplicateTextPolicy, TimedLine};

use crate::common::{SAMPLE_PLAIN, SAMPLE_WORD_LEVEL};

#[test]
fn test_parseLineTrack_sampleSong_shouldKeepEveryTimedLine() {
    let (map, stats) = parse_line_track(Some(SAMPLE_PLAIN), DuplicateTextPolicy::JoinDistinct);

    assert_eq!(map.len(), 5);
    assert_eq!(map.get(12_300).as_deref(), Some("Hello world"));
    assert_eq!(stats, ParseStats { parsed: 5, skipped: 0 });
}

#[test]
fn test_parseLineTrack_headerTags_shouldBeSkipped() {
    let content = "[ti:Song]\n[ar:Artist]\n[offset:0]\n[00:01.00]Line";
    let (map, stats) = parse_line_track(Some(content), DuplicateTextPolicy::JoinDistinct);

    assert_eq!(map.to_lines(), vec![TimedLine { time_ms: 1_000, text: "Line".to_string() }]);
    assert_eq!(stats.skipped, 3);
}

#[test]
fn test_parseLineTrack_crlfLineEndings_shouldParse() {
    let (map, _) = parse_line_track(Some("[00:01.00]a\r\n[00:02.00]b\r\n"), DuplicateTextPolicy::Join);
    assert_eq!(map.timestamps().collect::<Vec<_>>(), vec![1_000, 2_000]);
}

#[test]
fn test_parseLineTrack_sharedTimestamp_shouldJoinWithSpace() {
    let (map, _) = parse_line_track(Some("[00:01.00]first\n[00:01.00]second"), DuplicateTextPolicy::Join);
    assert_eq!(map.get(1_000).as_deref(), Some("first second"));
}

#[test]
fn test_parseWordTrack_sampleSong_shouldParseTokens() {
    let (lines, stats) = parse_word_track(Some(SAMPLE_WORD_LEVEL));

    assert_eq!(stats, ParseStats { parsed: 2, skipped: 0 });
    assert_eq!(lines[0].start_ms, 12_000);
    assert_eq!(lines[0].tokens.len(), 2);
    assert_eq!(lines[0].text(), "Hello world");
    assert_eq!(lines[1].end_ms(), 18_200);
}

#[test]
fn test_parseWordTrack_lineLevelContent_shouldSkipEverything() {
    let (lines, stats) = parse_word_track(Some(SAMPLE_PLAIN));
    assert!(lines.is_empty());
    assert_eq!(stats.skipped, 5);
}
