use regex::RegexBuilder;

use crate::domain::models::MediaMetadata;

/// True when `text` contains the full parsed title, ignoring case.
pub fn full_match(metadata: &MediaMetadata, text: &str) -> bool {
    matches_ignoring_case(&regex::escape(&metadata.title), text)
}

/// True when the words of the short title appear in `text`, followed
/// anywhere later by the release token. Ignores case.
pub fn partial_match(metadata: &MediaMetadata, text: &str) -> bool {
    matches_ignoring_case(&partial_pattern(metadata), text)
}

// Both predicates fold case through the same regex engine.
fn matches_ignoring_case(pattern: &str, text: &str) -> bool {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

// Each whitespace character of the short title becomes a single-character wildcard.
fn partial_pattern(metadata: &MediaMetadata) -> String {
    let mut pattern = String::with_capacity(metadata.short_title.len() * 2);
    for c in metadata.short_title.chars() {
        if c.is_whitespace() {
            pattern.push('.');
        } else {
            pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    pattern.push_str(".*");
    pattern.push_str(&regex::escape(&metadata.release));
    pattern
}
