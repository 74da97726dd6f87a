//! Match highlighting for result titles.
//!
//! Output is always HTML-escaped; the only markup ever injected is the
//! `<mark>` wrapper added here.

use std::ops::Range;

use crate::tokenize::query_words;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Find the first case-insensitive occurrence of `needle` in `haystack`.
///
/// Comparison is per character, so the returned byte range always lies on
/// char boundaries of the original `haystack`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    haystack.char_indices().find_map(|(start, _)| {
        match_len_at(&haystack[start..], needle).map(|len| start..start + len)
    })
}

/// Byte length of the prefix of `text` matching `needle`, if it matches.
fn match_len_at(text: &str, needle: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    for n in needle.chars() {
        let (_, c) = chars.next()?;
        if !chars_eq_ignore_case(c, n) {
            return None;
        }
    }
    Some(chars.next().map_or(text.len(), |(i, _)| i))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Every case-insensitive occurrence of `needle`, left to right, never
/// overlapping.
pub fn match_ranges(text: &str, needle: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(found) = find_ignore_case(&text[pos..], needle) {
        let range = pos + found.start..pos + found.end;
        pos = range.end;
        ranges.push(range);
    }

    ranges
}

/// Escape `text`, wrapping the given byte ranges in `<mark>`.
///
/// `ranges` must be sorted, non-overlapping and on char boundaries.
fn mark_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * 13);
    let mut pos = 0;

    for range in ranges {
        out.push_str(&escape_html(&text[pos..range.start]));
        out.push_str(MARK_OPEN);
        out.push_str(&escape_html(&text[range.clone()]));
        out.push_str(MARK_CLOSE);
        pos = range.end;
    }

    out.push_str(&escape_html(&text[pos..]));
    out
}

/// Escape `text` and wrap every case-insensitive occurrence of `needle` in
/// `<mark>`.
pub fn wrap_matches(text: &str, needle: &str) -> String {
    mark_ranges(text, &match_ranges(text, needle))
}

/// Highlight query matches in a title.
///
/// If the whole trimmed query occurs in the title, its first occurrence is
/// marked. Otherwise every occurrence of each query word is marked. Matches
/// are located on the raw title and each fragment is escaped on its own, so
/// a word never lands inside an entity. A word overlapping an earlier word's
/// match is skipped there.
pub fn highlight(title: &str, query: &str) -> String {
    let q = query.trim();
    let words = query_words(q);
    if words.is_empty() {
        return escape_html(title);
    }

    if let Some(range) = find_ignore_case(title, q) {
        return mark_ranges(title, &[range]);
    }

    let mut ranges: Vec<Range<usize>> = Vec::new();
    for word in &words {
        for range in match_ranges(title, word) {
            let overlaps = ranges
                .iter()
                .any(|r| r.start < range.end && range.start < r.end);
            if !overlaps {
                ranges.push(range);
            }
        }
    }
    ranges.sort_by_key(|r| r.start);

    mark_ranges(title, &ranges)
}
