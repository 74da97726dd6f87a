//! Site configuration management.
//!
//! Sites are described by a `docs.yaml` file at the project root. TOML is
//! accepted as well when the file has a `.toml` extension.

use std::{
    collections::BTreeMap,
    path::{Component, Path},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Theme keys whose values end up inside generated SVG and CSS.
const COLOR_KEYS: [&str; 3] = ["accent", "accent_dim", "bg_deep"];

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3,8}|rgba?\([^)]+\))$").expect("color pattern is valid")
});

/// Main configuration structure for Phosphor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Theme overrides (color name to CSS value).
    #[serde(default)]
    pub theme: BTreeMap<String, String>,

    /// Sidebar navigation groups.
    #[serde(default)]
    pub nav: Vec<NavGroup>,

    /// Markdown pages to build, relative to `pages/`, in order.
    #[serde(default)]
    pub pages: Vec<String>,

    /// Search index settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Short tagline shown under the logo.
    #[serde(default)]
    pub tagline: String,

    /// Text rendered inside the logo badge.
    #[serde(default = "default_logo_text")]
    pub logo_text: String,

    /// Repository URL.
    #[serde(default)]
    pub github: String,

    /// Custom favicon path, relative to the project.
    #[serde(default)]
    pub favicon: String,
}

/// A labelled group of sidebar links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavGroup {
    /// Group heading.
    #[serde(default)]
    pub group: String,

    /// Links in this group.
    #[serde(default)]
    pub items: Vec<NavLink>,
}

/// A sidebar link to a page or an anchor within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    #[serde(default)]
    pub label: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    /// Markdown page name.
    #[serde(default)]
    pub page: String,

    /// Heading ID within the page.
    #[serde(default)]
    pub anchor: String,
}

impl NavLink {
    /// Link target in the built site.
    pub fn href(&self) -> String {
        let page = if self.page.is_empty() {
            String::new()
        } else {
            html_file_name(&self.page)
        };

        if self.anchor.is_empty() {
            page
        } else {
            format!("{page}#{}", self.anchor)
        }
    }
}

/// Search index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether search is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Index file name written under `assets/`.
    #[serde(default = "default_search_output")]
    pub output: String,

    /// Maximum number of keywords kept per entry.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Bytes of HTML after a heading scanned for keywords.
    #[serde(default = "default_keyword_window")]
    pub keyword_window: usize,
}

// Default value functions
fn default_title() -> String {
    "Documentation".to_string()
}

fn default_logo_text() -> String {
    "PD".to_string()
}

fn default_icon() -> String {
    "file".to_string()
}

fn default_true() -> bool {
    true
}

fn default_search_output() -> String {
    "search-index.json".to_string()
}

fn default_max_keywords() -> usize {
    100
}

fn default_keyword_window() -> usize {
    2000
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: String::new(),
            logo_text: default_logo_text(),
            github: String::new(),
            favicon: String::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output: default_search_output(),
            max_keywords: default_max_keywords(),
            keyword_window: default_keyword_window(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path)?;

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, path)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `PHOSPHOR__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        ensure_exists(path)?;

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("PHOSPHOR").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        // An empty docs.yaml means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let parsed = if is_toml {
            toml::from_str(content).map_err(|e| {
                CoreError::config_with_source(
                    format!("Failed to parse config file: {}", path.display()),
                    e,
                )
            })
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                CoreError::config_with_source(
                    format!("Failed to parse config file: {}", path.display()),
                    e,
                )
            })
        };

        let config = parsed?;
        tracing::debug!(?config, "Parsed configuration");
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if let Some(page) = self.pages.iter().find(|p| !is_safe_page_path(p)) {
            return Err(CoreError::unsafe_path(page));
        }

        for (key, value) in self.invalid_colors() {
            tracing::warn!(key, value, "Theme color is not a hex or rgb() value");
        }

        Ok(())
    }

    /// Theme colors that would be unsafe to inject into generated assets.
    pub fn invalid_colors(&self) -> Vec<(&str, &str)> {
        COLOR_KEYS
            .iter()
            .filter_map(|key| {
                self.theme
                    .get_key_value(*key)
                    .filter(|(_, value)| !is_valid_color(value))
                    .map(|(k, v)| (k.as_str(), v.as_str()))
            })
            .collect()
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CoreError::config(format!(
            "Configuration file not found: {}",
            path.display()
        )))
    }
}

/// Whether a CSS color is a `#hex` (3 to 8 digits) or `rgb()`/`rgba()` value.
pub fn is_valid_color(value: &str) -> bool {
    COLOR_RE.is_match(value)
}

/// Whether a page path stays inside the pages directory.
///
/// Absolute paths and any `..` component are rejected.
pub fn is_safe_page_path(page: &str) -> bool {
    let path = Path::new(page);
    !page.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Output file name for a Markdown page (`guide.md` becomes `guide.html`).
pub fn html_file_name(page: &str) -> String {
    match page.strip_suffix(".md") {
        Some(stem) => format!("{stem}.html"),
        None => page.to_string(),
    }
}
