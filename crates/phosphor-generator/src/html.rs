//! HTML generation.
//!
//! Every page shares the same sidebar (built from `nav`) and gets its own
//! table of contents from its `##`/`###` headings.

use phosphor_core::{Config, NavGroup, config::is_valid_color};
use phosphor_parser::Heading;
use phosphor_search::PageData;
use phosphor_search_wasm::escape_html;
use thiserror::Error;

use crate::template::{PAGE_TEMPLATE, TemplateContext, TemplateError, TemplateRegistry};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for HTML operations.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Relative path from a page back to the site root.
///
/// ```
/// assert_eq!(phosphor_generator::root_prefix("index.html"), "");
/// assert_eq!(phosphor_generator::root_prefix("guide/usage.html"), "../");
/// ```
pub fn root_prefix(page: &str) -> String {
    "../".repeat(page.matches('/').count())
}

/// Sidebar groups and links.
pub fn nav_html(groups: &[NavGroup], root: &str) -> String {
    let mut html = String::new();

    for group in groups {
        html.push_str("<div class=\"nav-group\">\n");
        html.push_str(&format!(
            "  <div class=\"nav-group-label\">{}</div>\n",
            escape_html(&group.group)
        ));

        for item in &group.items {
            let href = item.href();
            let href = if item.page.is_empty() {
                href
            } else {
                format!("{root}{href}")
            };
            html.push_str(&format!(
                "  <a href=\"{}\"><i data-lucide=\"{}\" class=\"nav-icon\"></i>{}</a>\n",
                escape_html(&href),
                escape_html(&item.icon),
                escape_html(&item.label)
            ));
        }

        html.push_str("</div>\n");
    }

    html
}

/// "On this page" links. Empty when there is at most one heading.
pub fn toc_html(headings: &[Heading]) -> String {
    if headings.len() <= 1 {
        return String::new();
    }

    let mut html = String::from("<div class=\"toc-label\">On this page</div>\n");
    for heading in headings {
        let class = if heading.level == 3 {
            " class=\"toc-h3\""
        } else {
            ""
        };
        html.push_str(&format!(
            "<a href=\"#{}\"{class}>{}</a>\n",
            escape_html(&heading.id),
            escape_html(&heading.text)
        ));
    }
    html
}

fn github_link_html(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    format!(
        "<a class=\"github-link\" href=\"{}\"><i data-lucide=\"github\"></i>GitHub</a>",
        escape_html(url)
    )
}

/// `:root` overrides for the configured theme colors.
///
/// Values that are not plain colors are left out.
fn theme_style(config: &Config) -> String {
    let vars: Vec<String> = config
        .theme
        .iter()
        .filter(|(_, value)| is_valid_color(value))
        .map(|(key, value)| format!("--{}: {value};", key.replace('_', "-")))
        .collect();

    if vars.is_empty() {
        String::new()
    } else {
        format!("<style>:root {{ {} }}</style>", vars.join(" "))
    }
}

/// Renders pages through the page template.
#[derive(Debug)]
pub struct HtmlGenerator {
    config: Config,
    templates: TemplateRegistry,
}

impl HtmlGenerator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            templates: TemplateRegistry::new(),
        }
    }

    /// Use a custom template registry.
    #[must_use]
    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    /// Output file name of a page (`guide/usage.md` becomes `guide/usage.html`).
    pub fn output_name(page: &PageData) -> String {
        phosphor_core::config::html_file_name(&page.filename)
    }

    /// Render a full HTML document for one page.
    pub fn render_page(&self, page: &PageData) -> Result<String> {
        let site = &self.config.site;
        let root = root_prefix(&Self::output_name(page));

        let context = TemplateContext::new()
            .with_var("title", escape_html(&site.title))
            .with_var("site_title", escape_html(&site.title))
            .with_var("tagline", escape_html(&site.tagline))
            .with_var("logo_text", escape_html(&site.logo_text))
            .with_var("favicon", format!("{root}assets/favicon.svg"))
            .with_var("theme_style", theme_style(&self.config))
            .with_var("nav", nav_html(&self.config.nav, &root))
            .with_var("github_link", github_link_html(&site.github))
            .with_var("toc", toc_html(&page.headings))
            .with_var("content", page.html.as_str())
            .with_var("root", root);

        Ok(self.templates.render(PAGE_TEMPLATE, &context)?)
    }
}
