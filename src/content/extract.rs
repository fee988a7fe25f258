use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank-line regex"));
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s*").expect("heading regex"));

/// Paragraphs shorter than this are headings, list fragments or noise
pub const MIN_PARAGRAPH_CHARS: usize = 50;
const DESCRIPTION_CHARS: usize = 150;

/// Blocks of text separated by blank lines, trimmed, empties dropped
pub fn blocks(text: &str) -> Vec<&str> {
    BLANK_LINE
        .split(text)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect()
}

/// Blocks long enough to count as real paragraphs
pub fn paragraphs(text: &str) -> Vec<&str> {
    blocks(text)
        .into_iter()
        .filter(|b| b.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect()
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lines that open with one or more `#`
pub fn count_headings(text: &str) -> usize {
    text.lines().filter(|l| l.starts_with('#')).count()
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First non-blank line with any heading marker removed. Falls back to
/// "<Topic> - Complete Guide".
pub fn extract_title(text: &str, topic: &str) -> String {
    let title = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| HEADING_MARKER.replace(l.trim(), "").trim().to_string())
        .unwrap_or_default();

    if title.is_empty() {
        format!("{} - Complete Guide", capitalize(topic.trim()))
    } else {
        title
    }
}

/// First real paragraph that is not a heading, cut to 150 chars with an
/// ellipsis and stripped of surrounding emphasis asterisks.
pub fn extract_description(text: &str, topic: &str) -> String {
    let found = paragraphs(text)
        .into_iter()
        .find(|p| !p.starts_with('#'))
        .map(|p| p.trim_matches('*').trim());

    match found {
        Some(p) => {
            let cut: String = p.chars().take(DESCRIPTION_CHARS).collect();
            format!("{}...", cut.trim_end())
        }
        None => format!(
            "Discover everything you need to know about {}. Expert insights, proven strategies \
             and practical steps to get results faster.",
            topic.trim()
        ),
    }
}
