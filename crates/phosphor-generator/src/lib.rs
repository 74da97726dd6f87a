//! Phosphor Generator Library
//!
//! Renders a Phosphor project into a static site: one HTML page per
//! configured Markdown page, a sidebar built from `nav`, a per-page table of
//! contents, a generated favicon and the embedded search index.
//!
//! # Modules
//!
//! - [`template`] - `{{ variable }}` interpolation
//! - [`html`] - sidebar, table of contents and page rendering
//! - [`collector`] - reading and parsing the configured pages
//! - [`assets`] - theme files and the favicon
//! - [`build`] - build orchestration

pub mod assets;
pub mod build;
pub mod collector;
pub mod html;
pub mod template;

pub use assets::{AssetError, ThemeAssets, favicon_svg};
pub use build::{BuildError, BuildStats, Builder};
pub use collector::{CollectedPages, CollectorError, PageCollector};
pub use html::{HtmlError, HtmlGenerator, nav_html, root_prefix, toc_html};
pub use template::{Template, TemplateContext, TemplateError, TemplateRegistry};
