/*!
 * Tests for search keyword construction
 */

use lyricsync::keyword::{build_keyword, clean_keyword, retry_keyword};

#[test]
fn test_buildKeyword_withTitleAndArtist_shouldJoinWithSpace() {
    assert_eq!(build_keyword("晴天", "周杰伦"), "晴天 周杰伦");
    assert_eq!(build_keyword("", "周杰伦"), "周杰伦");
}

#[test]
fn test_cleanKeyword_fullWidthBrackets_shouldBeRemoved() {
    assert_eq!(clean_keyword("晴天（Live版） 周杰伦"), "晴天 周杰伦");
    assert_eq!(clean_keyword("Song [Remastered 2011] Band"), "Song Band");
}

#[test]
fn test_cleanKeyword_noiseInsideWords_shouldBeKept() {
    assert_eq!(clean_keyword("Alive Discover Coverage"), "Alive Discover Coverage");
}

#[test]
fn test_retryKeyword_onlyWhenCleaningChangesSomething() {
    assert_eq!(retry_keyword("Song - Live Band"), Some("Song - Band".to_string()));
    assert_eq!(retry_keyword("Song Band"), None);
}
