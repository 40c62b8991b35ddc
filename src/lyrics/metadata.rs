/*!
 * Credit-line detection.
 *
 * Lyric tracks often open with production credits ("作词：...", "Lyrics by ...")
 * timestamped like sung lines. Those lines must not pick up translation or
 * romanization text. Classification is a walk over an ordered rule table of
 * prefixes, each with the set of characters allowed to follow it.
 */

/// What may follow a credit prefix for the line to count as a credit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Follower {
    /// Anything, including nothing
    Any,
    /// End of text, a colon (ASCII or full-width) or a space
    ColonSpaceOrEnd,
    /// A colon (ASCII or full-width) only
    Colon,
}

#[derive(Debug, Clone, Copy)]
struct CreditRule {
    prefixes: &'static [&'static str],
    follower: Follower,
}

const ENGLISH_CREDIT_PHRASES: &[&str] = &[
    "lyrics by",
    "lyric by",
    "words by",
    "written by",
    "composed by",
    "music by",
    "arranged by",
    "produced by",
    "mixed by",
    "mastered by",
    "recorded by",
    "vocals by",
];

const CREDIT_WORDS: &[&str] = &[
    // Chinese (simplified)
    "作词", "作曲", "编曲", "词曲", "制作人", "制作", "监制", "出品", "发行",
    "混音", "母带", "录音", "和声", "合声", "演唱", "原唱", "翻唱",
    "吉他", "贝斯", "鼓手", "键盘", "钢琴", "弦乐", "小提琴", "大提琴", "配唱",
    // Chinese (traditional) and Japanese
    "作詞", "編曲", "詞曲", "製作人", "製作", "監製", "混音師", "錄音",
    "和聲", "貝斯", "鍵盤", "鋼琴", "弦樂", "歌手",
    // English
    "composer", "lyricist", "arranger", "producer", "mixer",
    "mastering", "chorus", "guitar", "bass", "drums", "piano", "strings",
    "vocals",
];

const CREDIT_CHARS: &[&str] = &["词", "詞", "曲", "唱", "编", "編", "混", "录"];

const CREDIT_RULES: &[CreditRule] = &[
    CreditRule { prefixes: ENGLISH_CREDIT_PHRASES, follower: Follower::Any },
    CreditRule { prefixes: CREDIT_WORDS, follower: Follower::ColonSpaceOrEnd },
    CreditRule { prefixes: CREDIT_CHARS, follower: Follower::Colon },
];

/// Whether `text` is a production-credit line rather than sung content.
///
/// English prefixes compare case-insensitively.
pub fn is_metadata(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();

    CREDIT_RULES.iter().any(|rule| {
        rule.prefixes.iter().any(|prefix| {
            lowered
                .strip_prefix(prefix)
                .is_some_and(|rest| follower_matches(rule.follower, rest))
        })
    })
}

fn follower_matches(follower: Follower, rest: &str) -> bool {
    let next = rest.chars().next();
    match follower {
        Follower::Any => true,
        Follower::ColonSpaceOrEnd => matches!(next, None | Some(':') | Some('：') | Some(' ')),
        Follower::Colon => matches!(next, Some(':') | Some('：')),
    }
}
