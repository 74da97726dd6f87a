//! Index command - builds the search index for a project

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use phosphor_generator::{PageCollector, build::DEFAULT_OUTPUT_DIR};
use phosphor_search::{IndexerConfig, SearchIndexer, inject_search_index, write_index};

use super::{PAGES_DIR, load_config};

/// What an index run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Pages parsed and indexed.
    pub pages: usize,
    /// Configured pages that were not found.
    pub skipped: usize,
    /// Entries in the written index.
    pub entries: usize,
    /// Size of the index JSON in bytes.
    pub bytes: usize,
    /// Where the index was written, if search is enabled.
    pub index_path: Option<PathBuf>,
}

/// Run the index command.
///
/// Parses every configured page, builds the index and writes it under
/// `<output>/assets/`. With `template`, also writes `search.js` with the index
/// injected.
pub fn run(project_dir: &Path, output: Option<&Path>, template: Option<&Path>) -> Result<IndexStats> {
    let start = Instant::now();
    tracing::info!(?project_dir, ?output, ?template, "Starting index build");

    let config = load_config(project_dir).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    if !config.search.enabled {
        println!("Search is disabled in configuration, nothing to do");
        return Ok(IndexStats::default());
    }

    let collected = PageCollector::new(&config, project_dir.join(PAGES_DIR)).collect()?;
    for page in &collected.missing {
        println!("  ⚠ Page not found: {page}");
    }
    let pages = collected.pages;
    let skipped = collected.missing.len();

    let indexer = SearchIndexer::new(IndexerConfig::from(&config.search));
    let index = indexer.build(&pages);

    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_dir.join(DEFAULT_OUTPUT_DIR));
    let assets_dir = output_dir.join("assets");
    let index_path = assets_dir.join(&config.search.output);

    let bytes = write_index(&index, &index_path)
        .wrap_err_with(|| format!("Failed to write {}", index_path.display()))?;

    if let Some(template) = template {
        write_search_script(template, &index, &assets_dir)?;
    }

    let duration = start.elapsed();

    println!();
    println!("✓ Search index built in {:.2}s", duration.as_secs_f64());
    println!("  Pages:   {}", pages.len());
    if skipped > 0 {
        println!("  Skipped: {skipped}");
    }
    println!("  Entries: {}", index.len());
    println!("  Size:    {:.1} KB", bytes as f64 / 1024.0);
    println!("  Output:  {}", index_path.display());

    Ok(IndexStats {
        pages: pages.len(),
        skipped,
        entries: index.len(),
        bytes,
        index_path: Some(index_path),
    })
}

/// Write `search.js` from a template containing `{{SEARCH_INDEX}}`.
fn write_search_script(
    template: &Path,
    index: &phosphor_search::SearchIndex,
    assets_dir: &Path,
) -> Result<()> {
    let source = fs::read_to_string(template)
        .wrap_err_with(|| format!("Failed to read template {}", template.display()))?;

    if !source.contains(phosphor_search::INDEX_PLACEHOLDER) {
        tracing::warn!(?template, "Template has no search index placeholder");
    }

    let json = index
        .to_json_pretty()
        .wrap_err("Failed to serialize search index")?;
    let script_path = assets_dir.join("search.js");
    fs::write(&script_path, inject_search_index(&source, &json))
        .wrap_err_with(|| format!("Failed to write {}", script_path.display()))?;

    tracing::info!(path = %script_path.display(), "Wrote search script");
    Ok(())
}
