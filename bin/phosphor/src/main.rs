//! Phosphor CLI
//!
//! Builds Phosphor documentation sites and queries their search index.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Phosphor.
#[derive(Parser)]
#[command(
    name = "phosphor",
    version,
    about = "Documentation sites with instant client-side search"
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Create docs.yaml and example pages
    Init {
        /// Project directory (created if missing)
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Render the site: pages, theme assets and search index
    Build {
        /// Project directory containing docs.yaml and pages/
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Output directory (default: <DIR>/_site)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build only the search index from the configured pages
    Index {
        /// Project directory containing docs.yaml and pages/
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Output directory (default: <DIR>/_site)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// search.js template with a {{SEARCH_INDEX}} placeholder
        #[arg(short, long)]
        template: Option<PathBuf>,
    },
    /// Query a built index from the terminal
    Search {
        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Index file to query
        #[arg(short, long, default_value = "_site/assets/search-index.json")]
        index: PathBuf,
        /// Print titles without highlight markup
        #[arg(long)]
        plain: bool,
    },
    /// Validate configuration and pages
    Check {
        /// Project directory containing docs.yaml and pages/
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    phosphor::init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { dir } => {
            phosphor::cmd::init::run(&dir)?;
        }
        Commands::Build { dir, output } => {
            phosphor::cmd::build::run(&dir, output.as_deref())?;
        }
        Commands::Index {
            dir,
            output,
            template,
        } => {
            phosphor::cmd::index::run(&dir, output.as_deref(), template.as_deref())?;
        }
        Commands::Search {
            query,
            index,
            plain,
        } => {
            phosphor::cmd::search::run(&index, &query.join(" "), plain)?;
        }
        Commands::Check { dir, strict } => {
            phosphor::cmd::check::run(&dir, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_index_command_parsing() {
        let args = ["phosphor", "index", "docs", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Index {
                dir,
                output,
                template,
            } => {
                assert_eq!(dir, PathBuf::from("docs"));
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert!(template.is_none());
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_cli_build_command_parsing() {
        let cli = Cli::parse_from(["phosphor", "build", "docs", "-o", "public", "-v"]);
        assert_eq!(cli.verbose, 1);

        match cli.command {
            Commands::Build { dir, output } => {
                assert_eq!(dir, PathBuf::from("docs"));
                assert_eq!(output, Some(PathBuf::from("public")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_init_defaults() {
        let cli = Cli::parse_from(["phosphor", "init"]);

        match cli.command {
            Commands::Init { dir } => assert_eq!(dir, PathBuf::from(".")),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_index_defaults() {
        let cli = Cli::parse_from(["phosphor", "index"]);

        match cli.command {
            Commands::Index { dir, output, .. } => {
                assert_eq!(dir, PathBuf::from("."));
                assert!(output.is_none());
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_cli_search_joins_words() {
        let args = ["phosphor", "search", "quick", "start", "--plain"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Search {
                query,
                index,
                plain,
            } => {
                assert_eq!(query.join(" "), "quick start");
                assert_eq!(index, PathBuf::from("_site/assets/search-index.json"));
                assert!(plain);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["phosphor", "search"]).is_err());
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["phosphor", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { dir, strict } => {
                assert_eq!(dir, PathBuf::from("."));
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["phosphor", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);

        let cli = Cli::parse_from(["phosphor", "index", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
