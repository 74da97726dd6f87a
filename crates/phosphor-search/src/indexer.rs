//! Search index builder.
//!
//! Turns parsed pages into [`SearchIndex`] entries, one per heading.

use phosphor_core::{SearchConfig, config::html_file_name};
use phosphor_parser::{Heading, ParsedPage};
use phosphor_search_wasm::{Entry, SearchIndex, escape_html};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::text::{extract_keywords, strip_html, window};

/// Section label used for `###` headings that precede any `##` heading.
pub const OVERVIEW_SECTION: &str = "Overview";

/// Marker that opens the next section in rendered HTML.
const SECTION_MARKER: &str = "<div class=\"section\"";

/// Configuration for the search indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Maximum number of keywords kept per entry.
    /// Default: 100.
    pub max_keywords: usize,

    /// Bytes of HTML after a heading scanned for keywords.
    /// Default: 2000.
    pub keyword_window: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            max_keywords: 100,
            keyword_window: 2000,
        }
    }
}

impl From<&SearchConfig> for IndexerConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_keywords: config.max_keywords,
            keyword_window: config.keyword_window,
        }
    }
}

/// A rendered page ready for indexing.
#[derive(Debug, Clone)]
pub struct PageData {
    /// Source file name relative to `pages/` (e.g. `guide/usage.md`).
    pub filename: String,

    /// `##`/`###` headings in document order.
    pub headings: Vec<Heading>,

    /// Rendered body HTML.
    pub html: String,
}

impl PageData {
    pub fn new(filename: impl Into<String>, page: ParsedPage) -> Self {
        Self {
            filename: filename.into(),
            headings: page.headings,
            html: page.html,
        }
    }
}

/// Builds search indexes from rendered pages.
#[derive(Debug, Default)]
pub struct SearchIndexer {
    config: IndexerConfig,
}

impl SearchIndexer {
    /// Create a new indexer.
    pub fn new(config: IndexerConfig) -> Self {
        Self { config }
    }

    /// Build the index for all pages, in page then heading order.
    pub fn build(&self, pages: &[PageData]) -> SearchIndex {
        let mut entries = Vec::new();

        for page in pages {
            let before = entries.len();
            self.index_page(page, &mut entries);
            debug!(
                page = %page.filename,
                entries = entries.len() - before,
                "Indexed page"
            );
        }

        info!(
            pages = pages.len(),
            entries = entries.len(),
            "Built search index"
        );

        SearchIndex::new(entries)
    }

    /// Append one entry per heading of `page`.
    pub fn index_page(&self, page: &PageData, entries: &mut Vec<Entry>) {
        let url_base = html_file_name(&page.filename);
        let mut current_section: Option<&str> = None;

        for heading in &page.headings {
            let section = if heading.level == 2 {
                current_section = Some(heading.text.as_str());
                heading.text.as_str()
            } else {
                current_section.unwrap_or(OVERVIEW_SECTION)
            };

            entries.push(Entry::new(
                heading.text.clone(),
                self.keywords_for(&page.html, heading),
                section,
                format!("{url_base}#{}", heading.id),
            ));
        }
    }

    /// Keywords for a heading: the leading words of the text that follows it.
    ///
    /// Falls back to the lowercased heading text when the heading cannot be
    /// located in the HTML.
    pub fn keywords_for(&self, html: &str, heading: &Heading) -> String {
        let fallback = || heading.text.to_lowercase();

        let pattern = format!(
            r#"id="{}"[^>]*>(?s:.*?)</(?:h[23]|div)>"#,
            regex::escape(&escape_html(&heading.id))
        );
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(id = %heading.id, error = %e, "Cannot build heading pattern");
                return fallback();
            }
        };

        let Some(found) = re.find(html) else {
            return fallback();
        };

        let mut chunk = window(html, found.end(), self.config.keyword_window);
        if let Some(next) = chunk.find(SECTION_MARKER) {
            chunk = &chunk[..next];
        }

        extract_keywords(&strip_html(chunk), self.config.max_keywords)
    }
}
