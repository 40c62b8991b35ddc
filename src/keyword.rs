use once_cell::sync::Lazy;
use regex::Regex;

// @module: Search keyword construction and cleanup

// @const: Bracketed segments in ASCII or full-width brackets
static BRACKETED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\[\(【（][^\]\)】）]*[\]\)】）]").unwrap()
});

// @const: Release-variant words that hurt catalog search
static NOISE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\bfeat\.|\bremix\b|\bcover\b|\blive\b|伴奏|无损|高音质|动态翻译)").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// `"{title} {artist}"`, trimmed
pub fn build_keyword(title: &str, artist: &str) -> String {
    format!("{} {}", title, artist).trim().to_string()
}

/// Strip bracketed segments and noise words, collapse whitespace
pub fn clean_keyword(keyword: &str) -> String {
    let without_brackets = BRACKETED_REGEX.replace_all(keyword, "");
    let without_noise = NOISE_REGEX.replace_all(&without_brackets, "");
    WHITESPACE_REGEX.replace_all(&without_noise, " ").trim().to_string()
}

/// The cleaned keyword, when it is worth a second search
pub fn retry_keyword(keyword: &str) -> Option<String> {
    let cleaned = clean_keyword(keyword);
    (!cleaned.is_empty() && cleaned != keyword).then_some(cleaned)
}
