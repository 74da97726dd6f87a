//! Theme assets and the favicon.
//!
//! A project may keep a `theme/` directory next to `docs.yaml`. Its files are
//! copied into `assets/`, except `base.html` and `search.js`, which are
//! templates. Without one the built-in stylesheet and script are used.

use std::{
    fs,
    path::{Path, PathBuf},
};

use phosphor_core::{
    Config,
    config::{is_safe_page_path, is_valid_color},
};
use phosphor_search_wasm::escape_html;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Asset errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A theme color that would be unsafe inside the generated SVG.
    #[error("invalid theme color for {key}: {value:?}")]
    InvalidColor { key: String, value: String },

    /// A configured asset path leaves the project directory.
    #[error("favicon path escapes project directory: {0}")]
    UnsafePath(String),

    /// A theme file path outside the theme directory.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Page template file inside `theme/`.
pub const PAGE_TEMPLATE_FILE: &str = "base.html";

/// Search script template file inside `theme/`.
pub const SEARCH_SCRIPT_FILE: &str = "search.js";

const DEFAULT_STYLE: &str = include_str!("../theme/style.css");
const DEFAULT_SEARCH_SCRIPT: &str = include_str!("../theme/search.js");

const DEFAULT_ACCENT: &str = "#22d3a7";
const DEFAULT_ACCENT_DIM: &str = "#1a9e7e";
const DEFAULT_BG_DEEP: &str = "#080c14";

/// A project's `theme/` directory, which may not exist.
#[derive(Debug, Clone)]
pub struct ThemeAssets {
    theme_dir: PathBuf,
}

impl ThemeAssets {
    #[must_use]
    pub fn new(theme_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme_dir: theme_dir.into(),
        }
    }

    /// Custom page template, if the theme has one.
    pub fn page_template(&self) -> Result<Option<String>> {
        let path = self.theme_dir.join(PAGE_TEMPLATE_FILE);
        if path.is_file() {
            debug!(path = %path.display(), "using custom page template");
            Ok(Some(fs::read_to_string(path)?))
        } else {
            Ok(None)
        }
    }

    /// The `search.js` template, falling back to the built-in one.
    pub fn search_script_template(&self) -> Result<String> {
        let path = self.theme_dir.join(SEARCH_SCRIPT_FILE);
        if path.is_file() {
            Ok(fs::read_to_string(path)?)
        } else {
            Ok(DEFAULT_SEARCH_SCRIPT.to_string())
        }
    }

    /// Copy theme files into `assets_dir`, writing the built-in stylesheet
    /// when the theme has none. Returns the number of files written.
    pub fn copy_to(&self, assets_dir: &Path) -> Result<usize> {
        fs::create_dir_all(assets_dir)?;
        let mut count = 0;

        if self.theme_dir.is_dir() {
            info!(source = %self.theme_dir.display(), "copying theme assets");
            count += self.copy_dir(&self.theme_dir, assets_dir)?;
        }

        let style = assets_dir.join("style.css");
        if !style.exists() {
            fs::write(&style, DEFAULT_STYLE)?;
            count += 1;
        }

        Ok(count)
    }

    fn copy_dir(&self, current: &Path, dest_base: &Path) -> Result<usize> {
        let mut count = 0;

        for entry in fs::read_dir(current)? {
            let path = entry?.path();

            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if path.is_dir() {
                count += self.copy_dir(&path, dest_base)?;
                continue;
            }

            let relative = path
                .strip_prefix(&self.theme_dir)
                .map_err(|_| AssetError::InvalidPath(path.clone()))?;
            if relative == Path::new(PAGE_TEMPLATE_FILE) || relative == Path::new(SEARCH_SCRIPT_FILE)
            {
                continue;
            }

            let dest = dest_base.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &dest)?;
            debug!(src = %path.display(), dest = %dest.display(), "copied asset");
            count += 1;
        }

        Ok(count)
    }
}

/// Square SVG favicon: the logo text on an accent gradient.
pub fn favicon_svg(config: &Config) -> Result<String> {
    let color = |key: &str, default: &str| -> Result<String> {
        let value = config.theme.get(key).map_or(default, String::as_str);
        if is_valid_color(value) {
            Ok(value.to_string())
        } else {
            Err(AssetError::InvalidColor {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
    };

    let accent = color("accent", DEFAULT_ACCENT)?;
    let accent_dim = color("accent_dim", DEFAULT_ACCENT_DIM)?;
    let bg_deep = color("bg_deep", DEFAULT_BG_DEEP)?;
    let logo = escape_html(&config.site.logo_text);

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32">
  <defs>
    <linearGradient id="g" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="{accent}"/>
      <stop offset="100%" stop-color="{accent_dim}"/>
    </linearGradient>
  </defs>
  <rect width="32" height="32" rx="6" fill="url(#g)"/>
  <text x="16" y="22" text-anchor="middle" font-family="system-ui,sans-serif" font-weight="700" font-size="14" fill="{bg_deep}">{logo}</text>
</svg>
"#
    ))
}

/// Write `assets/favicon.svg`: the configured file when `site.favicon` is
/// set, a generated one otherwise.
///
/// Returns whether a favicon was written. A configured favicon that does not
/// exist is only a warning.
pub fn write_favicon(config: &Config, project_dir: &Path, assets_dir: &Path) -> Result<bool> {
    let dest = assets_dir.join("favicon.svg");
    let custom = &config.site.favicon;

    if custom.is_empty() {
        fs::write(&dest, favicon_svg(config)?)?;
        return Ok(true);
    }

    if !is_safe_page_path(custom) {
        return Err(AssetError::UnsafePath(custom.clone()));
    }

    let source = project_dir.join(custom);
    if source.is_file() {
        fs::copy(&source, &dest)?;
        Ok(true)
    } else {
        warn!(favicon = %custom, "favicon not found");
        Ok(false)
    }
}
