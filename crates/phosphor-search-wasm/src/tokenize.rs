//! Query normalization and text tokenization.

/// Words shorter than this are dropped from queries.
pub const MIN_WORD_LEN: usize = 2;

/// Minimum word length for prefix matching against tokens.
pub const MIN_PREFIX_LEN: usize = 3;

/// Lowercase and trim a raw query.
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase().trim().to_string()
}

/// Split a query into words, dropping those shorter than [`MIN_WORD_LEN`].
pub fn query_words(query: &str) -> Vec<&str> {
    query
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .collect()
}

/// Split text into tokens on runs of whitespace, `/`, `.`, `-` and `_`.
///
/// Never yields an empty token.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '/' | '.' | '-' | '_')
}

/// Whether any token of `text` starts with `word`.
///
/// Words shorter than [`MIN_PREFIX_LEN`] never match.
pub fn prefix_hit(text: &str, word: &str) -> bool {
    if word.chars().count() < MIN_PREFIX_LEN {
        return false;
    }
    tokenize(text).any(|token| token.starts_with(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Quick Start  "), "quick start");
        assert_eq!(normalize_query("\t\n"), "");
    }

    #[test]
    fn test_query_words() {
        assert_eq!(query_words("hello   world"), vec!["hello", "world"]);
        assert_eq!(query_words("a test b query c"), vec!["test", "query"]);
        assert!(query_words("a b c").is_empty());
        assert!(query_words("").is_empty());
    }

    #[test]
    fn test_tokenize_separators() {
        let tokens: Vec<_> = tokenize("api/v2.config-file_name  next").collect();
        assert_eq!(tokens, vec!["api", "v2", "config", "file", "name", "next"]);
    }

    #[test]
    fn test_tokenize_skips_empty() {
        let tokens: Vec<_> = tokenize("--/leading and trailing./").collect();
        assert_eq!(tokens, vec!["leading", "and", "trailing"]);
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize(" ./-_ ").count(), 0);
    }

    #[test]
    fn test_prefix_hit() {
        assert!(prefix_hit("getting-started guide", "sta"));
        assert!(!prefix_hit("getting-started guide", "tar"));
        // Too short for prefix matching
        assert!(!prefix_hit("getting-started guide", "st"));
    }
}
