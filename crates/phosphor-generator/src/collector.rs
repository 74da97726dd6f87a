//! Page collection.
//!
//! Reads the pages listed in the configuration, in order, from `pages/`.

use std::path::{Path, PathBuf};

use phosphor_core::{Config, config::is_safe_page_path};
use phosphor_parser::{MarkdownParser, ParserError};
use phosphor_search::PageData;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Page collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// The pages directory does not exist.
    #[error("pages/ directory not found at {0}")]
    MissingPagesDir(PathBuf),

    /// A configured page points outside the pages directory.
    #[error("page path escapes pages/ directory: {0}")]
    UnsafePath(String),

    /// A page could not be read.
    #[error(transparent)]
    Parse(#[from] ParserError),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Parsed pages plus the configured names that had no file.
#[derive(Debug, Default)]
pub struct CollectedPages {
    pub pages: Vec<PageData>,
    pub missing: Vec<String>,
}

/// Parses the configured pages of a project.
#[derive(Debug)]
pub struct PageCollector {
    pages: Vec<String>,
    pages_dir: PathBuf,
    parser: MarkdownParser,
}

impl PageCollector {
    #[must_use]
    pub fn new(config: &Config, pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages: config.pages.clone(),
            pages_dir: pages_dir.into(),
            parser: MarkdownParser::new(),
        }
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Parse every configured page. Missing files are skipped with a warning;
    /// an unsafe path fails the whole collection.
    pub fn collect(&self) -> Result<CollectedPages> {
        if !self.pages_dir.is_dir() {
            return Err(CollectorError::MissingPagesDir(self.pages_dir.clone()));
        }

        info!(dir = %self.pages_dir.display(), count = self.pages.len(), "collecting pages");

        let mut collected = CollectedPages::default();
        for page in &self.pages {
            if !is_safe_page_path(page) {
                return Err(CollectorError::UnsafePath(page.clone()));
            }

            let path = self.pages_dir.join(page);
            if !path.is_file() {
                warn!(page, "page not found, skipping");
                collected.missing.push(page.clone());
                continue;
            }

            let parsed = self.parser.parse_file(&path)?;
            debug!(page, headings = parsed.headings.len(), "collected page");
            collected.pages.push(PageData::new(page.clone(), parsed));
        }

        Ok(collected)
    }
}
