//! Plain-text extraction from rendered HTML.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[a-z]+;").expect("entity pattern is valid"));

/// Strip tags and named entities, collapsing whitespace.
///
/// Tags become spaces so that `<td>a</td><td>b</td>` yields two words.
pub fn strip_html(html: &str) -> String {
    let text = TAG_RE.replace_all(html, " ");
    let text = ENTITY_RE.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_words` words of `text`, lowercased and space separated.
pub fn extract_keywords(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// At most `len` bytes of `s` starting at `start`, shrunk to char boundaries.
pub(crate) fn window(s: &str, start: usize, len: usize) -> &str {
    let mut start = start.min(s.len());
    while !s.is_char_boundary(start) {
        start += 1;
    }

    let mut end = start.saturating_add(len).min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        let html = "<p>Hello <strong>world</strong></p><ul><li>one</li><li>two</li></ul>";
        assert_eq!(strip_html(html), "Hello world one two");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("<p>Fish &amp; chips &lt;3</p>"), "Fish chips 3");
        // Numeric entities are left alone
        assert_eq!(strip_html("a&#39;b"), "a&#39;b");
    }

    #[test]
    fn test_strip_html_empty() {
        assert_eq!(strip_html(""), "");
        assert_eq!(strip_html("<div>\n  </div>"), "");
    }

    #[test]
    fn test_extract_keywords() {
        assert_eq!(extract_keywords("Run The Installer", 100), "run the installer");
        assert_eq!(extract_keywords("one two three four", 2), "one two");
        assert_eq!(extract_keywords("", 10), "");
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        let s = "aé日本";
        // 'é' is bytes 1..3, '日' 3..6, '本' 6..9
        assert_eq!(window(s, 0, 2), "a");
        assert_eq!(window(s, 2, 4), "日");
        assert_eq!(window(s, 3, 100), "日本");
        assert_eq!(window(s, 50, 10), "");
    }
}
