//! Build orchestration.
//!
//! Cleans the output directory, writes theme assets and the favicon, parses
//! the configured pages, writes the search index and `search.js`, then renders
//! every page.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use phosphor_core::Config;
use phosphor_search::{
    IndexerConfig, PageData, SearchError, SearchIndexer, inject_search_index, write_index,
};
use phosphor_search_wasm::IndexError;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assets::{AssetError, SEARCH_SCRIPT_FILE, ThemeAssets, write_favicon},
    collector::{CollectorError, PageCollector},
    html::{HtmlError, HtmlGenerator},
    template::{PAGE_TEMPLATE, Template, TemplateRegistry},
};

/// Directory holding the Markdown pages, relative to the project.
pub const PAGES_DIR: &str = "pages";

/// Optional theme overrides, relative to the project.
pub const THEME_DIR: &str = "theme";

/// Default output directory, relative to the project.
pub const DEFAULT_OUTPUT_DIR: &str = "_site";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error(transparent)]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Writing the index failed.
    #[error("search index error: {0}")]
    Search(#[from] SearchError),

    /// Serializing the index failed.
    #[error("search index error: {0}")]
    Index(#[from] IndexError),

    /// The output directory would swallow the project.
    #[error("refusing to clean {0}: it contains the project")]
    UnsafeOutput(PathBuf),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// HTML pages written.
    pub pages: usize,

    /// Configured pages with no file.
    pub missing: usize,

    /// Theme files and favicon written under `assets/`.
    pub assets: usize,

    /// Entries in the search index (0 when search is disabled).
    pub index_entries: usize,

    /// Size of the index JSON in bytes.
    pub index_bytes: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    project_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    #[must_use]
    pub fn new(
        config: Config,
        project_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            project_dir: project_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            project = %self.project_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        // Pages are parsed first so a missing pages/ leaves the old output alone
        let collected =
            PageCollector::new(&self.config, self.project_dir.join(PAGES_DIR)).collect()?;
        stats.missing = collected.missing.len();

        self.clean_output()?;

        let assets_dir = self.output_dir.join("assets");
        let theme = ThemeAssets::new(self.project_dir.join(THEME_DIR));
        stats.assets = theme.copy_to(&assets_dir)?;
        if write_favicon(&self.config, &self.project_dir, &assets_dir)? {
            stats.assets += 1;
        }

        let (entries, bytes) = self.write_search(&theme, &collected.pages, &assets_dir)?;
        stats.index_entries = entries;
        stats.index_bytes = bytes;

        stats.pages = self.generate_pages(&theme, &collected.pages)?;
        stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            pages = stats.pages,
            missing = stats.missing,
            assets = stats.assets,
            entries = stats.index_entries,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    fn clean_output(&self) -> Result<()> {
        if !self.output_dir.exists() {
            return Ok(());
        }

        let output = self.output_dir.canonicalize()?;
        let project = self.project_dir.canonicalize()?;
        if project.starts_with(&output) {
            return Err(BuildError::UnsafeOutput(self.output_dir.clone()));
        }

        debug!(dir = %self.output_dir.display(), "cleaning output directory");
        fs::remove_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Write the index JSON and `search.js`. A disabled search still gets a
    /// script with an empty index so pages load without errors.
    fn write_search(
        &self,
        theme: &ThemeAssets,
        pages: &[PageData],
        assets_dir: &Path,
    ) -> Result<(usize, usize)> {
        let template = theme.search_script_template()?;
        let script_path = assets_dir.join(SEARCH_SCRIPT_FILE);

        if !self.config.search.enabled {
            debug!("search disabled, writing empty index script");
            fs::write(&script_path, inject_search_index(&template, "[]"))?;
            return Ok((0, 0));
        }

        let index = SearchIndexer::new(IndexerConfig::from(&self.config.search)).build(pages);
        let bytes = write_index(&index, &assets_dir.join(&self.config.search.output))?;
        fs::write(
            &script_path,
            inject_search_index(&template, &index.to_json_pretty()?),
        )?;

        info!(entries = index.len(), bytes, "wrote search index");
        Ok((index.len(), bytes))
    }

    fn generate_pages(&self, theme: &ThemeAssets, pages: &[PageData]) -> Result<usize> {
        let mut templates = TemplateRegistry::new();
        if let Some(custom) = theme.page_template()? {
            templates.register(Template::new(PAGE_TEMPLATE, custom));
        }
        let generator = HtmlGenerator::new(self.config.clone()).with_templates(templates);

        info!(count = pages.len(), "generating HTML pages");
        for page in pages {
            let html = generator.render_page(page)?;
            let path = self.output_dir.join(HtmlGenerator::output_name(page));

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, html)?;
            debug!(path = %path.display(), "wrote page");
        }

        Ok(pages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(config: &str, pages: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("docs.yaml"), config).unwrap();
        for (name, body) in pages {
            let path = dir.path().join(PAGES_DIR).join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        dir
    }

    fn load(dir: &Path) -> Config {
        Config::load(&dir.join("docs.yaml")).unwrap()
    }

    #[test]
    fn test_build_site() {
        let dir = project(
            "site:\n  title: Demo\npages: [index.md, guide/usage.md, missing.md]\n",
            &[
                ("index.md", "## Install\n\nRun it.\n\n### Linux\n\nTarball.\n"),
                ("guide/usage.md", "## Usage\n\nUse it.\n"),
            ],
        );
        let out = dir.path().join(DEFAULT_OUTPUT_DIR);

        let stats = Builder::new(load(dir.path()), dir.path(), &out).build().unwrap();

        assert_eq!(stats.pages, 2);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.assets, 2);
        assert_eq!(stats.index_entries, 3);
        assert!(stats.index_bytes > 0);

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("<title>Demo</title>"));
        assert!(index.contains("<a href=\"#linux\" class=\"toc-h3\">Linux</a>"));

        let usage = fs::read_to_string(out.join("guide/usage.html")).unwrap();
        assert!(usage.contains("href=\"../assets/style.css\""));

        let script = fs::read_to_string(out.join("assets/search.js")).unwrap();
        assert!(script.contains("guide/usage.html#usage"));
        assert!(out.join("assets/search-index.json").exists());
        assert!(out.join("assets/favicon.svg").exists());
    }

    #[test]
    fn test_build_cleans_previous_output() {
        let dir = project("pages: [index.md]\n", &[("index.md", "Hi\n")]);
        let out = dir.path().join("public");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.html"), "old").unwrap();

        Builder::new(load(dir.path()), dir.path(), &out).build().unwrap();
        assert!(!out.join("stale.html").exists());
        assert!(out.join("index.html").exists());
    }

    #[test]
    fn test_build_refuses_to_clean_project() {
        let dir = project("pages: [index.md]\n", &[("index.md", "Hi\n")]);

        let err = Builder::new(load(dir.path()), dir.path(), dir.path())
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::UnsafeOutput(_)));
        assert!(dir.path().join("docs.yaml").exists());
    }

    #[test]
    fn test_build_with_search_disabled() {
        let dir = project(
            "pages: [index.md]\nsearch:\n  enabled: false\n",
            &[("index.md", "## A\n")],
        );
        let out = dir.path().join(DEFAULT_OUTPUT_DIR);

        let stats = Builder::new(load(dir.path()), dir.path(), &out).build().unwrap();
        assert_eq!(stats.index_entries, 0);
        assert!(!out.join("assets/search-index.json").exists());

        let script = fs::read_to_string(out.join("assets/search.js")).unwrap();
        assert!(script.contains("window.SEARCH_INDEX = [];"));
    }

    #[test]
    fn test_build_uses_theme_overrides() {
        let dir = project("pages: [index.md]\n", &[("index.md", "Hello\n")]);
        let theme = dir.path().join(THEME_DIR);
        fs::create_dir_all(&theme).unwrap();
        fs::write(theme.join("base.html"), "<main>{{ content }}</main>").unwrap();
        fs::write(theme.join("search.js"), "const IDX = {{SEARCH_INDEX}};").unwrap();
        let out = dir.path().join(DEFAULT_OUTPUT_DIR);

        Builder::new(load(dir.path()), dir.path(), &out).build().unwrap();

        let page = fs::read_to_string(out.join("index.html")).unwrap();
        assert_eq!(page, "<main><p>Hello</p>\n</main>");
        let script = fs::read_to_string(out.join("assets/search.js")).unwrap();
        assert!(script.starts_with("const IDX = ["));
    }

    #[test]
    fn test_invalid_theme_color_fails_build() {
        let dir = project(
            "theme:\n  accent: \"javascript:alert(1)\"\npages: [index.md]\n",
            &[("index.md", "Hi\n")],
        );
        let out = dir.path().join(DEFAULT_OUTPUT_DIR);

        let err = Builder::new(load(dir.path()), dir.path(), &out)
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::Asset(AssetError::InvalidColor { .. })));
    }

    #[test]
    fn test_missing_pages_dir_keeps_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("docs.yaml"), "pages: [index.md]\n").unwrap();
        let out = dir.path().join(DEFAULT_OUTPUT_DIR);
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("keep.html"), "x").unwrap();

        let err = Builder::new(load(dir.path()), dir.path(), &out)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Collector(CollectorError::MissingPagesDir(_))
        ));
        assert!(out.join("keep.html").exists());
    }
}
