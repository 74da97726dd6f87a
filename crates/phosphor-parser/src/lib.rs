//! Phosphor Parser Library
//!
//! Turns Markdown pages into HTML with `section` wrappers and unique heading
//! IDs, and reports the headings for navigation and search indexing.

pub mod components;
pub mod markdown;

use std::path::PathBuf;

pub use markdown::{Heading, HeadingIds, MarkdownParser, ParsedPage, slugify};
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Failed to read a page from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = ParserError::Read {
            path: PathBuf::from("pages/missing.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("pages/missing.md"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
