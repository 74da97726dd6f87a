//! Page templates.
//!
//! Templates are plain HTML with `{{ variable }}` placeholders. A trailing
//! `?` (`{{ toc? }}`) makes a variable optional.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with `context`.
    ///
    /// Substituted values are not scanned again, so page content containing
    /// `{{` is left as written.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..].find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed {{{{ in template {}", self.name))
            })?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim(), true),
                None => (var_name, false),
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Templates by name, seeded with the built-in page template.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

/// Name of the template every page is rendered with.
pub const PAGE_TEMPLATE: &str = "page";

impl TemplateRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new(PAGE_TEMPLATE, DEFAULT_PAGE_TEMPLATE));
        registry
    }

    /// Register a template, replacing any with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        self.get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?
            .render(context)
    }
}

/// Built-in page layout: sidebar, content column and table of contents.
///
/// `root` is the relative path back to the site root (`""` or `"../"`), so
/// pages in subdirectories still find `assets/`.
pub const DEFAULT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
  <link rel="icon" type="image/svg+xml" href="{{ favicon }}">
  <link rel="stylesheet" href="{{ root }}assets/style.css">
  {{ theme_style? }}
  <script src="https://unpkg.com/lucide@0.468.0/dist/umd/lucide.min.js" defer></script>
</head>
<body>
  <aside class="sidebar">
    <div class="sidebar-header">
      <a class="logo" href="{{ root }}index.html">
        <span class="logo-mark">{{ logo_text }}</span>
        <span class="logo-text">
          <span class="site-title">{{ site_title }}</span>
          <span class="tagline">{{ tagline? }}</span>
        </span>
      </a>
    </div>
    <div id="search" class="search-mount"></div>
    <nav class="sidebar-nav">
{{ nav }}
    </nav>
    {{ github_link? }}
  </aside>
  <div id="sidebar-toggle"></div>
  <main class="content">
{{ content }}
  </main>
  <aside class="toc">
{{ toc? }}
  </aside>
  <script src="{{ root }}assets/search.js"></script>
  <script type="module">
    try {
      const ui = await import('{{ root }}assets/phosphor_ui.js');
      await ui.default();
      ui.mountSearch('#search', JSON.stringify(window.SEARCH_INDEX || []));
      ui.mountToc('.toc');
      ui.mountNav('.sidebar-nav', '#sidebar-toggle');
    } catch (err) {
      console.warn('phosphor: interactive UI unavailable', err);
    }
    window.lucide?.createIcons();
  </script>
</body>
</html>
"##;
