//! Command implementations.

pub mod build;
pub mod check;
pub mod index;
pub mod init;
pub mod search;

use std::path::{Path, PathBuf};

use phosphor_core::Config;

/// Configuration file names looked up in a project directory, in order.
pub const CONFIG_FILES: [&str; 2] = ["docs.yaml", "docs.toml"];

pub use phosphor_generator::build::PAGES_DIR;

/// Locate the project's configuration file.
///
/// Falls back to `docs.yaml` when none exists so the error names the
/// expected file.
pub fn config_path(project_dir: &Path) -> PathBuf {
    CONFIG_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.exists())
        .unwrap_or_else(|| project_dir.join(CONFIG_FILES[0]))
}

/// Load the project's configuration with `PHOSPHOR__*` environment overrides.
///
/// Every command reads configuration through here so they all see the same
/// values.
pub fn load_config(project_dir: &Path) -> phosphor_core::Result<Config> {
    Config::load_with_env(&config_path(project_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_prefers_yaml() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("docs.toml"), "").expect("write");
        assert_eq!(config_path(dir.path()), dir.path().join("docs.toml"));

        std::fs::write(dir.path().join("docs.yaml"), "").expect("write");
        assert_eq!(config_path(dir.path()), dir.path().join("docs.yaml"));
    }

    #[test]
    fn test_config_path_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert_eq!(config_path(dir.path()), dir.path().join("docs.yaml"));
    }

    #[test]
    fn test_load_config_applies_env_overrides() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(
            dir.path().join("docs.yaml"),
            "site:\n  tagline: \"~/from-file\"\npages: [index.md]\n",
        )
        .expect("write");

        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("PHOSPHOR__SITE__TAGLINE", "~/from-env") };
        let config = load_config(dir.path());
        unsafe { std::env::remove_var("PHOSPHOR__SITE__TAGLINE") };

        let config = config.expect("load config");
        assert_eq!(config.site.tagline, "~/from-env");
        assert_eq!(config.pages, vec!["index.md"]);
    }
}
