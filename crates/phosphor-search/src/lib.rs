//! Phosphor Search Library
//!
//! Builds the search index embedded in every Phosphor site.
//!
//! One entry is produced per `##`/`###` heading. Its keywords are the first
//! words of the section text that follows the heading, so the browser side
//! can rank without a full-text index.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use phosphor_parser::MarkdownParser;
//! use phosphor_search::{IndexerConfig, PageData, SearchIndexer, write_index};
//!
//! let page = MarkdownParser::new().parse("## Install\n\nRun the installer.\n");
//! let pages = vec![PageData::new("index.md", page)];
//!
//! let index = SearchIndexer::new(IndexerConfig::default()).build(&pages);
//! write_index(&index, Path::new("_site/assets/search-index.json")).unwrap();
//! ```

pub mod indexer;
pub mod text;

use std::{fs, path::Path};

pub use indexer::{IndexerConfig, PageData, SearchIndexer};
pub use phosphor_search_wasm::{Entry, SearchIndex};
pub use text::{extract_keywords, strip_html};
use thiserror::Error;

/// Recommended upper bound for the serialized index (500KB).
pub const MAX_INDEX_SIZE: usize = 500 * 1024;

/// Placeholder replaced by the index JSON in the search script template.
pub const INDEX_PLACEHOLDER: &str = "{{SEARCH_INDEX}}";

/// Search-related errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] phosphor_search_wasm::IndexError),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Write the index as pretty JSON, creating parent directories.
///
/// Returns the number of bytes written.
pub fn write_index(index: &SearchIndex, path: &Path) -> Result<usize> {
    let json = index.to_json_pretty()?;

    if json.len() > MAX_INDEX_SIZE {
        tracing::warn!(
            size = json.len(),
            max = MAX_INDEX_SIZE,
            "Search index exceeds recommended size"
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &json)?;

    tracing::debug!(path = %path.display(), entries = index.len(), "Wrote search index");
    Ok(json.len())
}

/// Read an index previously written by [`write_index`].
pub fn read_index(path: &Path) -> Result<SearchIndex> {
    let json = fs::read_to_string(path)?;
    Ok(SearchIndex::from_json(&json)?)
}

/// Replace every `{{SEARCH_INDEX}}` in a script template with the index JSON.
pub fn inject_search_index(template: &str, index_json: &str) -> String {
    template.replace(INDEX_PLACEHOLDER, index_json)
}
