//! HTML lyric extraction for Genius song pages.
//!
//! Genius serves lyrics inside `<div data-lyrics-container>` blocks with ads,
//! annotation links and navigation chrome interleaved with the real content.
//! This module is pure text transformation: raw page in, cleaned lines out.
//! The page structure is unversioned and externally controlled, so every
//! heuristic here is best-effort and a `None` result is a normal outcome.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pluggable extraction seam. The scraping heuristics below are tuned against
/// captured pages and will need swapping or re-tuning when the page layout
/// shifts, without touching the fetch pipeline.
pub trait LyricExtractor: Send + Sync {
    /// Extract cleaned lyric lines from a raw HTML page. `None` means no
    /// recognizable lyrics content was found.
    fn extract(&self, html: &str) -> Option<Vec<String>>;
}

/// Default extractor for Genius song pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeniusExtractor;

impl LyricExtractor for GeniusExtractor {
    fn extract(&self, html: &str) -> Option<Vec<String>> {
        extract(html)
    }
}

static CONTAINER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<div[^>]*data-lyrics-container[^>]*>(.*?)</div>").unwrap()
});
static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script(?:\s[^>]*)?>.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style(?:\s[^>]*)?>.*?</style>").unwrap());
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a(?:\s[^>]*)?>.*?</a>").unwrap());
static BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(?:p|div|section|h[1-6])>|<(?:p|div|section|h[1-6])(?:\s[^>]*)?>").unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 .'&-]{0,20}:$").unwrap());

/// UI/navigation/metadata fragments that never belong to lyric text.
/// Matched case-insensitively as substrings of a cleaned candidate line.
const DENYLIST: &[&str] = &[
    "contributor",
    "translation",
    "embed",
    "genius",
    "trending",
    "sign up",
    "subscribe",
    "login",
    "log in",
    "follow",
    "verified artist",
    "more on genius",
    "you might also like",
    "see live",
    "get tickets",
    "privacy policy",
    "terms of service",
    "advertisement",
];

/// Primary filtering must leave at least this many lines, otherwise the
/// relaxed fallback derivation is tried against the same container.
const MIN_PRIMARY_LINES: usize = 5;

/// Extract cleaned lyric lines from a raw Genius page.
pub fn extract(html: &str) -> Option<Vec<String>> {
    let container = last_container(html)?;
    let mut lines = primary_lines(container);
    if lines.len() < MIN_PRIMARY_LINES {
        let relaxed = fallback_lines(container);
        if relaxed.len() > lines.len() {
            lines = relaxed;
        }
    }
    if lines.is_empty() { None } else { Some(lines) }
}

/// Pages nest and duplicate the container marker; the final match in document
/// order is the outermost real content block.
fn last_container(html: &str) -> Option<&str> {
    CONTAINER_RE
        .captures_iter(html)
        .last()
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

fn primary_lines(container: &str) -> Vec<String> {
    let text = SCRIPT_RE.replace_all(container, "");
    let text = STYLE_RE.replace_all(&text, "");
    // Annotation links wrap chrome as often as lyrics; dropped wholesale.
    let text = ANCHOR_RE.replace_all(&text, "");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = BLOCK_RE.replace_all(&text, "\n");
    text.split('\n')
        .map(clean_candidate)
        .filter(|line| keep_line(line))
        .collect()
}

/// Relaxed derivation for sparse primary results: strip every tag to a line
/// separator and keep anything non-empty that is not denylisted. No length or
/// punctuation checks here.
fn fallback_lines(container: &str) -> Vec<String> {
    TAG_RE
        .replace_all(container, "\n")
        .split('\n')
        .map(|raw| collapse_whitespace(&decode_entities(raw)))
        .filter(|line| !line.is_empty() && !is_denylisted(line))
        .collect()
}

fn clean_candidate(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    collapse_whitespace(&decode_entities(&stripped))
}

// The only entities Genius emits in lyric text. `&amp;` last so an already
// decoded ampersand cannot cascade into a second decode.
fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_denylisted(line: &str) -> bool {
    let lower = line.to_lowercase();
    DENYLIST.iter().any(|token| lower.contains(token))
}

fn keep_line(line: &str) -> bool {
    if line.chars().count() <= 5 {
        return false;
    }
    if line
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_punctuation() || c.is_whitespace())
    {
        return false;
    }
    if is_denylisted(line) {
        return false;
    }
    // "Label:" rows with an empty value are stray metadata, not lyrics.
    if LABEL_RE.is_match(line) {
        return false;
    }
    if line.chars().count() < 20
        && let Some((_, rest)) = line.split_once(':')
        && rest.trim().is_empty()
    {
        return false;
    }
    true
}
