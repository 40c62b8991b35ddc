/*!
 * Timestamp codec for lyric tags.
 *
 * Three grammars are read and one is written:
 * - line tags `[MM:SS.FF]` / `[MM:SS.FFF]` of line-level tracks
 * - word-line envelopes `[START,DURATION]` of word-level tracks
 * - word tokens `(START,DURATION,FLAG)TEXT` inside a word line
 *
 * Everything is normalized to milliseconds and written back as `MM:SS.mmm`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: One leading line tag, anchored at the start of the input
static LINE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d{2,}):(\d{2})[.:](\d{2,3})\]").unwrap()
});

// @const: Word-line envelope, anchored at the start of the input
static WORD_LINE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d+),(\d+)\]").unwrap()
});

// @const: Word token header; the token text runs up to the next header
static WORD_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((\d+),(\d+),(-?\d+)\)").unwrap()
});

/// Parse a single line tag such as `[01:02.50]` into milliseconds.
///
/// Two fractional digits are centiseconds, three are milliseconds.
/// Returns `None` when the input does not start with a well-formed tag.
pub fn parse_line_tag(tag: &str) -> Option<u64> {
    split_line_tag(tag).map(|(ms, _)| ms)
}

/// Parse a leading line tag and return its time together with the rest of the input.
pub fn split_line_tag(line: &str) -> Option<(u64, &str)> {
    let caps = LINE_TAG_REGEX.captures(line)?;
    let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(2)?.as_str().parse().ok()?;
    let fraction = caps.get(3)?.as_str();
    let fraction_value: u64 = fraction.parse().ok()?;

    let millis = if fraction.len() == 2 {
        fraction_value * 10
    } else {
        fraction_value
    };

    let end = caps.get(0)?.end();
    let ms = minutes.checked_mul(60_000)?.checked_add(seconds * 1_000 + millis)?;
    Some((ms, &line[end..]))
}

/// Parse a word-line envelope `[START,DURATION]` into raw milliseconds.
pub fn parse_word_line_tag(tag: &str) -> Option<(u64, u64)> {
    split_word_line_tag(tag).map(|(start, duration, _)| (start, duration))
}

/// Parse a leading word-line envelope and return it with the remaining content.
pub fn split_word_line_tag(line: &str) -> Option<(u64, u64, &str)> {
    let caps = WORD_LINE_TAG_REGEX.captures(line)?;
    let start: u64 = caps.get(1)?.as_str().parse().ok()?;
    let duration: u64 = caps.get(2)?.as_str().parse().ok()?;
    let end = caps.get(0)?.end();
    Some((start, duration, &line[end..]))
}

/// Parse the first word token `(START,DURATION,FLAG)TEXT` of the input.
///
/// The text runs up to the next token header or the end of the input.
pub fn parse_word_token(tag: &str) -> Option<(u64, String)> {
    scan_word_tokens(tag).into_iter().next()
}

/// Scan all word tokens of a word line's content, in order.
///
/// Duration and flag are validated by the grammar but not returned.
pub fn scan_word_tokens(content: &str) -> Vec<(u64, String)> {
    let headers: Vec<(usize, usize, Option<u64>)> = WORD_TOKEN_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let start = caps.get(1).and_then(|m| m.as_str().parse().ok());
            Some((whole.start(), whole.end(), start))
        })
        .collect();

    let mut tokens = Vec::with_capacity(headers.len());
    for (i, (_, text_start, start_ms)) in headers.iter().enumerate() {
        let text_end = headers
            .get(i + 1)
            .map_or(content.len(), |(next_start, _, _)| *next_start);

        if let Some(start_ms) = start_ms {
            tokens.push((*start_ms, content[*text_start..text_end].to_string()));
        }
    }

    tokens
}

/// Format milliseconds as `MM:SS.mmm`
pub fn format_timestamp(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

/// Format milliseconds as a line tag `[MM:SS.mmm]`
pub fn format_line_tag(ms: u64) -> String {
    format!("[{}]", format_timestamp(ms))
}

/// Format milliseconds as an inline word marker `<MM:SS.mmm>`
pub fn format_word_marker(ms: u64) -> String {
    format!("<{}>", format_timestamp(ms))
}
