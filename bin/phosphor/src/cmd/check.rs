//! Check command - validate configuration and pages

use std::{collections::HashSet, path::Path};

use color_eyre::eyre::{Result, bail};
use phosphor_core::{Config, config::is_safe_page_path};
use phosphor_parser::MarkdownParser;
use phosphor_search::{IndexerConfig, MAX_INDEX_SIZE, PageData, SearchIndexer};

use super::{PAGES_DIR, load_config};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and every configured page.
pub fn run(project_dir: &Path, strict: bool) -> Result<()> {
    tracing::info!(?project_dir, strict, "Checking configuration and pages");

    let result = validate(project_dir);

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Collect errors and warnings for a project.
pub fn validate(project_dir: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    let config = match load_config(project_dir) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            return result;
        }
    };

    check_config_values(&config, &mut result);

    let pages_dir = project_dir.join(PAGES_DIR);
    if !pages_dir.is_dir() {
        result.add_error(format!("pages/ directory not found at {}", pages_dir.display()));
        return result;
    }

    let pages = check_pages(&config, &pages_dir, &mut result);
    check_nav(&config, &mut result);

    if config.search.enabled {
        check_index(&config, &pages, &mut result);
    }

    result
}

fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if config.pages.is_empty() {
        result.add_warning("No pages configured");
    }

    // The generated favicon embeds the theme colors, so bad ones fail the build
    for (key, value) in config.invalid_colors() {
        let msg = format!("Theme color {key} should be #hex or rgb(): {value:?}");
        if config.site.favicon.is_empty() {
            result.add_error(msg);
        } else {
            result.add_warning(msg);
        }
    }

    let favicon = &config.site.favicon;
    if !favicon.is_empty() && !is_safe_page_path(favicon) {
        result.add_error(format!("Favicon path escapes the project directory: {favicon}"));
    }

    let mut seen = HashSet::new();
    for page in &config.pages {
        if !seen.insert(page) {
            result.add_warning(format!("Page listed twice: {page}"));
        }
    }
}

fn check_pages(config: &Config, pages_dir: &Path, result: &mut ValidationResult) -> Vec<PageData> {
    let parser = MarkdownParser::new();
    let mut pages = Vec::new();

    for page in &config.pages {
        let path = pages_dir.join(page);
        if !path.exists() {
            result.add_warning(format!("Page not found: {page}"));
            continue;
        }

        match parser.parse_file(&path) {
            Ok(parsed) => {
                if parsed.headings.is_empty() {
                    result.add_warning(format!(
                        "{page} has no ## or ### headings and will not appear in search"
                    ));
                }
                pages.push(PageData::new(page.clone(), parsed));
            }
            Err(e) => result.add_error(format!("{page}: {e}")),
        }
    }

    pages
}

fn check_nav(config: &Config, result: &mut ValidationResult) {
    for group in &config.nav {
        for link in &group.items {
            if !link.page.is_empty() && !config.pages.contains(&link.page) {
                result.add_warning(format!(
                    "Nav link \"{}\" points to unlisted page {}",
                    link.label, link.page
                ));
            }
        }
    }
}

fn check_index(config: &Config, pages: &[PageData], result: &mut ValidationResult) {
    let index = SearchIndexer::new(IndexerConfig::from(&config.search)).build(pages);

    match index.to_json_pretty() {
        Ok(json) if json.len() > MAX_INDEX_SIZE => result.add_warning(format!(
            "Search index is {} KB, above the recommended {} KB",
            json.len() / 1024,
            MAX_INDEX_SIZE / 1024
        )),
        Ok(_) => {}
        Err(e) => result.add_error(format!("Search index cannot be serialized: {e}")),
    }
}
