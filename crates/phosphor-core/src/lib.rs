//! Phosphor Core Library
//!
//! Configuration and error handling shared by the Phosphor build tools.

pub mod config;
pub mod error;

pub use config::{Config, NavGroup, NavLink, SearchConfig, SiteConfig};
pub use error::{CoreError, Result};
