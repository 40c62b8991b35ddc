/*!
 * Tests for the alignment matcher
 */

use lyricsync::lyrics::alignment::consume;
use lyricsync::lyrics::{AlignmentMatcher, DuplicateTextPolicy, MatchTier, TimeMap, WordLine, WordToken};

fn line(start_ms: u64, text: &str) -> WordLine {
    WordLine {
        start_ms,
        duration_ms: 1_000,
        tokens: vec![WordToken { start_ms, text: text.to_string() }],
    }
}

fn time_map(entries: &[(u64, &str)]) -> TimeMap {
    let mut map = TimeMap::new();
    for (time, text) in entries {
        map.insert(*time, text, DuplicateTextPolicy::JoinDistinct);
    }
    map
}

#[test]
fn test_findMatch_exactBeatsCloserContainment_shouldPickExact() {
    let plain = time_map(&[(1_100, "Hello there friend"), (3_000, "hello there")]);
    let found = AlignmentMatcher::default().find_match(&line(1_000, "Hello, there!"), &plain).unwrap();

    assert_eq!(found.time_ms, 3_000);
    assert_eq!(found.tier, MatchTier::Exact);
}

#[test]
fn test_findMatch_containment_shouldMatchEitherDirection() {
    let matcher = AlignmentMatcher::default();

    let plain = time_map(&[(4_000, "Hello there friend")]);
    assert_eq!(matcher.find_match(&line(1_000, "hello there"), &plain).unwrap().tier, MatchTier::Containment);

    let plain = time_map(&[(4_000, "there")]);
    assert_eq!(matcher.find_match(&line(1_000, "hello there"), &plain).unwrap().tier, MatchTier::Containment);
}

#[test]
fn test_findMatch_nearestWithinFallback_shouldMatch() {
    let plain = time_map(&[(1_800, "unrelated"), (2_500, "other")]);
    let found = AlignmentMatcher::default().find_match(&line(1_000, "lyric"), &plain).unwrap();

    assert_eq!(found, lyricsync::lyrics::Match { time_ms: 1_800, tier: MatchTier::Nearest });
}

#[test]
fn test_findMatch_nearestBeyondFallback_shouldNotMatch() {
    let plain = time_map(&[(2_001, "unrelated")]);
    assert_eq!(AlignmentMatcher::default().find_match(&line(1_000, "lyric"), &plain), None);
}

#[test]
fn test_findMatch_symbolOnlyLine_shouldFallBackToNearest() {
    let plain = time_map(&[(5_900, "..."), (10_050, "♪")]);
    let found = AlignmentMatcher::default().find_match(&line(10_000, "♪"), &plain);

    assert_eq!(found, Some(lyricsync::lyrics::Match { time_ms: 10_050, tier: MatchTier::Nearest }));
}

#[test]
fn test_findMatch_symbolOnlyLineFarFromPlain_shouldNotMatch() {
    let plain = time_map(&[(5_900, "...")]);
    assert_eq!(AlignmentMatcher::default().find_match(&line(10_000, "♪"), &plain), None);
}

#[test]
fn test_findMatch_outsideWindow_shouldNotMatch() {
    let plain = time_map(&[(6_001, "lyric")]);
    assert_eq!(AlignmentMatcher::default().find_match(&line(1_000, "lyric"), &plain), None);
}

#[test]
fn test_findMatch_customThresholds_shouldBeHonoured() {
    let plain = time_map(&[(1_400, "unrelated")]);
    let strict = AlignmentMatcher::new(5_000, 200);
    assert_eq!(strict.find_match(&line(1_000, "lyric"), &plain), None);

    let narrow = AlignmentMatcher::new(100, 100);
    let plain = time_map(&[(1_500, "lyric")]);
    assert_eq!(narrow.find_match(&line(1_000, "lyric"), &plain), None);
}

#[test]
fn test_align_consumedSlot_shouldNeverMatchTwice() {
    let matcher = AlignmentMatcher::default();
    let mut plain = time_map(&[(1_050, "Hello")]);
    let mut translation = time_map(&[(1_050, "你好")]);
    let mut romanization = TimeMap::new();

    let (first, slot) = matcher.align(&line(1_000, "Hello"), &mut plain, &mut translation, &mut romanization).unwrap();
    assert_eq!(first.time_ms, 1_050);
    assert_eq!(slot.translation.as_deref(), Some("你好"));
    assert!(translation.is_empty());

    assert!(matcher.align(&line(1_100, "Hello"), &mut plain, &mut translation, &mut romanization).is_none());
}

#[test]
fn test_consume_shouldRemoveFromAllMaps() {
    let mut plain = time_map(&[(500, "a")]);
    let mut translation = time_map(&[(500, "b")]);
    let mut romanization = time_map(&[(500, "c"), (900, "d")]);

    let slot = consume(500, &mut plain, &mut translation, &mut romanization);

    assert_eq!(slot.plain.as_deref(), Some("a"));
    assert_eq!(slot.translation.as_deref(), Some("b"));
    assert_eq!(slot.romanization.as_deref(), Some("c"));
    assert!(plain.is_empty() && translation.is_empty());
    assert_eq!(romanization.len(), 1);
}
