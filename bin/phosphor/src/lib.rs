//! Phosphor CLI Library
//!
//! Command implementations for the `phosphor` binary, exposed as a library so
//! they can be driven from tests and build scripts.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (init, build, index, search, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use phosphor::cmd;
//!
//! // Render the project in the current directory into _site/
//! cmd::build::run(Path::new("."), None).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use phosphor_core::Config;
pub use phosphor_search::{SearchIndex, SearchIndexer};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// phosphor::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
