//! Build command - renders the documentation site

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use phosphor_generator::{BuildStats, Builder, build::DEFAULT_OUTPUT_DIR};

use super::load_config;

/// Run the build command.
///
/// Renders every configured page with the sidebar and table of contents, and
/// writes theme assets, the favicon and the search index under `assets/`.
pub fn run(project_dir: &Path, output: Option<&Path>) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?project_dir, ?output, "Starting build");

    let config = load_config(project_dir).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let output: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_dir.join(DEFAULT_OUTPUT_DIR));

    let stats = Builder::new(config, project_dir, &output)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("✓ Site built in {:.2}s", duration.as_secs_f64());
    println!("  Pages:   {}", stats.pages);
    if stats.missing > 0 {
        println!("  Missing: {}", stats.missing);
    }
    println!("  Assets:  {}", stats.assets);
    println!("  Entries: {}", stats.index_entries);
    println!("  Output:  {}", output.display());

    tracing::info!(?stats, ?duration, "Build completed successfully");
    Ok(stats)
}
