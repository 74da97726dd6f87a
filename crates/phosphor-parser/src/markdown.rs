//! Markdown parser using pulldown-cmark.
//!
//! Every `##` heading opens a `<div class="section">` that runs until the next
//! `##` heading or the end of the page. The search indexer and the scroll spy
//! both rely on that wrapper to find where a section ends.
//!
//! `:::` component blocks are expanded first (see [`crate::components`]), and
//! a link followed by `{.class}` becomes a `hero-btn` styled button.

use std::{collections::HashMap, path::Path};

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use serde::{Deserialize, Serialize};

use crate::{ParserError, Result, components};

/// A level 2 or level 3 heading with its anchor ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Rendered page body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Body HTML.
    pub html: String,
    /// `##` and `###` headings in document order.
    pub headings: Vec<Heading>,
}

/// Per-page heading ID allocator.
///
/// The first heading with a given slug keeps it; later ones get `-2`, `-3`
/// and so on.
#[derive(Debug, Default)]
pub struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an unused ID derived from `base`.
    pub fn unique(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let mut count = self.seen.get(base).copied().unwrap_or(0);

        let id = if count == 0 {
            base.to_string()
        } else {
            loop {
                count += 1;
                let candidate = format!("{base}-{count}");
                if !self.seen.contains_key(&candidate) {
                    break candidate;
                }
            }
        };

        self.seen.insert(base.to_string(), count.max(1));
        if id != base {
            self.seen.insert(id.clone(), 1);
        }
        id
    }

    /// Record an explicit `{#id}` so generated IDs steer clear of it.
    ///
    /// An explicit ID that is already taken on the page is suffixed like a
    /// generated one.
    pub fn claim(&mut self, id: &str) -> String {
        if self.seen.contains_key(id) {
            let suffixed = self.unique(id);
            tracing::warn!(id, suffixed, "Explicit heading id already in use");
            return suffixed;
        }

        self.seen.insert(id.to_string(), 1);
        id.to_string()
    }
}

/// Markdown parser.
#[derive(Debug)]
pub struct MarkdownParser {
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

struct OpenHeading {
    level: u8,
    explicit_id: Option<String>,
    start: usize,
    text: String,
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Read and parse a page from disk.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedPage> {
        let content = std::fs::read_to_string(path).map_err(|source| ParserError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let page = self.parse(&content);
        tracing::debug!(
            path = %path.display(),
            headings = page.headings.len(),
            "Parsed page"
        );
        Ok(page)
    }

    /// Render a Markdown body to HTML, collecting `##`/`###` headings.
    pub fn parse(&self, content: &str) -> ParsedPage {
        let expanded = components::expand(content);
        let parser = TextMergeStream::new(Parser::new_ext(&expanded.markdown, self.options));
        let mut ids = HeadingIds::new();
        for id in &expanded.reserved_ids {
            ids.claim(id);
        }
        let mut headings = Vec::new();
        let mut html = String::new();
        let mut section_open = false;
        let mut heading: Option<OpenHeading> = None;
        let mut code_block: Option<Option<String>> = None;
        let mut code_content = String::new();
        let mut in_table_head = false;
        let mut link_start = 0;
        let mut closed_link: Option<usize> = None;

        for event in parser {
            let after_link = closed_link.take();
            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(OpenHeading {
                        level: level as u8,
                        explicit_id: id.map(|i| i.to_string()),
                        start: html.len(),
                        text: String::new(),
                    });
                }

                Event::End(TagEnd::Heading(_)) => {
                    let Some(open) = heading.take() else {
                        continue;
                    };
                    let inner = html.split_off(open.start);
                    let text = open.text.trim().to_string();
                    let level = open.level;

                    if level != 2 && level != 3 {
                        let id_attr = open
                            .explicit_id
                            .map(|i| format!(" id=\"{}\"", html_escape(&i)))
                            .unwrap_or_default();
                        html.push_str(&format!("<h{level}{id_attr}>{inner}</h{level}>\n"));
                        continue;
                    }

                    let id = match open.explicit_id {
                        Some(explicit) => ids.claim(&explicit),
                        None => ids.unique(&slugify(&text)),
                    };
                    let id_attr = html_escape(&id);

                    if level == 2 {
                        if section_open {
                            html.push_str("</div>\n");
                        }
                        html.push_str(&format!(
                            "<div class=\"section\" id=\"{id_attr}\">\n\
                             <span class=\"section-anchor\"></span>\n\
                             <h2>{inner}</h2>\n\
                             <hr class=\"section-rule\">\n"
                        ));
                        section_open = true;
                    } else {
                        html.push_str(&format!("<h3 id=\"{id_attr}\">{inner}</h3>\n"));
                    }

                    headings.push(Heading { level, text, id });
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.trim_end_matches(',').to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code_content.clear();
                }

                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    html.push_str(&render_code_block(&code_content, lang.as_deref()));
                    code_content.clear();
                }

                Event::Text(text) if code_block.is_some() => {
                    code_content.push_str(&text);
                }

                Event::Text(text) => {
                    let text = match after_link {
                        Some(start) => attach_link_class(&mut html, start, &text),
                        None => &*text,
                    };
                    if let Some(open) = heading.as_mut() {
                        open.text.push_str(text);
                    }
                    html.push_str(&html_escape(text));
                }

                Event::Code(code) => {
                    if let Some(open) = heading.as_mut() {
                        open.text.push_str(&code);
                    }
                    html.push_str(&format!("<code>{}</code>", html_escape(&code)));
                }

                Event::SoftBreak => {
                    html.push('\n');
                }

                Event::HardBreak => {
                    html.push_str("<br />\n");
                }

                Event::Start(Tag::TableHead) => {
                    in_table_head = true;
                    html.push_str("<thead><tr>");
                }

                Event::End(TagEnd::TableHead) => {
                    in_table_head = false;
                    html.push_str("</tr></thead>\n<tbody>\n");
                }

                Event::Start(Tag::TableCell) => {
                    html.push_str(if in_table_head { "<th>" } else { "<td>" });
                }

                Event::End(TagEnd::TableCell) => {
                    html.push_str(if in_table_head { "</th>" } else { "</td>" });
                }

                Event::Start(tag @ Tag::Link { .. }) => {
                    link_start = html.len();
                    html.push_str(&tag_to_html_start(&tag));
                }

                Event::End(TagEnd::Link) => {
                    html.push_str("</a>");
                    closed_link = Some(link_start);
                }

                Event::Start(tag) => {
                    html.push_str(&tag_to_html_start(&tag));
                }

                Event::End(tag) => {
                    html.push_str(&tag_to_html_end(&tag));
                }

                Event::Html(raw) | Event::InlineHtml(raw) => {
                    html.push_str(&raw);
                }

                Event::FootnoteReference(name) => {
                    let name = html_escape(&name);
                    html.push_str(&format!(
                        "<sup class=\"footnote-ref\"><a href=\"#fn-{name}\">[{name}]</a></sup>"
                    ));
                }

                Event::Rule => {
                    html.push_str("<hr>\n");
                }

                Event::TaskListMarker(checked) => {
                    let checkbox = if checked {
                        "<input type=\"checkbox\" checked disabled />"
                    } else {
                        "<input type=\"checkbox\" disabled />"
                    };
                    html.push_str(checkbox);
                }

                Event::InlineMath(math) => {
                    html.push_str(&format!(
                        "<span class=\"math inline\">\\({}\\)</span>",
                        html_escape(&math)
                    ));
                }

                Event::DisplayMath(math) => {
                    html.push_str(&format!(
                        "<div class=\"math display\">\\[{}\\]</div>",
                        html_escape(&math)
                    ));
                }
            }
        }

        if section_open {
            html.push_str("</div>\n");
        }

        ParsedPage { html, headings }
    }
}

/// Render one line of inline Markdown without the surrounding paragraph.
pub(crate) fn inline_html(text: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH));
    let mut html = String::new();
    let mut link_start = 0;
    let mut closed_link: Option<usize> = None;

    for event in parser {
        let after_link = closed_link.take();
        match event {
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph) => {}
            Event::Start(tag @ Tag::Link { .. }) => {
                link_start = html.len();
                html.push_str(&tag_to_html_start(&tag));
            }
            Event::End(TagEnd::Link) => {
                html.push_str("</a>");
                closed_link = Some(link_start);
            }
            Event::Start(tag) => html.push_str(&tag_to_html_start(&tag)),
            Event::End(tag) => html.push_str(&tag_to_html_end(&tag)),
            Event::Text(text) => {
                let text = match after_link {
                    Some(start) => attach_link_class(&mut html, start, &text),
                    None => &*text,
                };
                html.push_str(&html_escape(text));
            }
            Event::Code(code) => html.push_str(&format!("<code>{}</code>", html_escape(&code))),
            Event::Html(raw) | Event::InlineHtml(raw) => html.push_str(&raw),
            Event::SoftBreak => html.push(' '),
            Event::HardBreak => html.push_str("<br />"),
            _ => {}
        }
    }

    html.trim_end().to_string()
}

/// Give the link opened at `link_start` a button class when `text` begins
/// with `{.name}`; returns the text left after the attribute.
fn attach_link_class<'a>(html: &mut String, link_start: usize, text: &'a str) -> &'a str {
    match split_class_attr(text) {
        Some((class, rest)) => {
            html.insert_str(link_start + "<a".len(), &format!(" class=\"hero-btn {class}\""));
            rest
        }
        None => text,
    }
}

fn split_class_attr(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("{.")?;
    let end = rest.find('}')?;
    let class = &rest[..end];
    let valid = !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    valid.then(|| (class, &rest[end + 1..]))
}

/// Convert a pulldown-cmark tag to HTML opening tag.
fn tag_to_html_start(tag: &Tag) -> String {
    match tag {
        Tag::Paragraph => "<p>".to_string(),
        Tag::Heading { level, .. } => format!("<h{}>", *level as u8),
        Tag::BlockQuote(_) => "<blockquote>\n".to_string(),
        Tag::CodeBlock(_) => String::new(),
        Tag::List(Some(1)) => "<ol>\n".to_string(),
        Tag::List(Some(start)) => format!("<ol start=\"{start}\">\n"),
        Tag::List(None) => "<ul>\n".to_string(),
        Tag::Item => "<li>".to_string(),
        Tag::FootnoteDefinition(name) => {
            format!("<div class=\"footnote\" id=\"fn-{}\">", html_escape(name))
        }
        Tag::Table(_) => "<div class=\"table-wrap\">\n<table>\n".to_string(),
        Tag::TableHead => "<thead><tr>".to_string(),
        Tag::TableRow => "<tr>".to_string(),
        Tag::TableCell => "<td>".to_string(),
        Tag::Emphasis => "<em>".to_string(),
        Tag::Strong => "<strong>".to_string(),
        Tag::Strikethrough => "<del>".to_string(),
        Tag::Link {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", html_escape(title))
            };
            format!("<a href=\"{}\"{title_attr}>", safe_url(dest_url))
        }
        Tag::Image { dest_url, .. } => {
            format!("<img src=\"{}\" alt=\"", safe_url(dest_url))
        }
        Tag::HtmlBlock => String::new(),
        Tag::MetadataBlock(_) => String::new(),
        Tag::DefinitionList => "<dl>".to_string(),
        Tag::DefinitionListTitle => "<dt>".to_string(),
        Tag::DefinitionListDefinition => "<dd>".to_string(),
        Tag::Superscript => "<sup>".to_string(),
        Tag::Subscript => "<sub>".to_string(),
    }
}

/// Convert a pulldown-cmark tag end to HTML closing tag.
fn tag_to_html_end(tag: &TagEnd) -> String {
    match tag {
        TagEnd::Paragraph => "</p>\n".to_string(),
        TagEnd::Heading(level) => format!("</h{}>\n", *level as u8),
        TagEnd::BlockQuote(_) => "</blockquote>\n".to_string(),
        TagEnd::CodeBlock => String::new(),
        TagEnd::List(true) => "</ol>\n".to_string(),
        TagEnd::List(false) => "</ul>\n".to_string(),
        TagEnd::Item => "</li>\n".to_string(),
        TagEnd::FootnoteDefinition => "</div>\n".to_string(),
        TagEnd::Table => "</tbody>\n</table>\n</div>\n".to_string(),
        TagEnd::TableHead => "</tr></thead>\n".to_string(),
        TagEnd::TableRow => "</tr>\n".to_string(),
        TagEnd::TableCell => "</td>".to_string(),
        TagEnd::Emphasis => "</em>".to_string(),
        TagEnd::Strong => "</strong>".to_string(),
        TagEnd::Strikethrough => "</del>".to_string(),
        TagEnd::Link => "</a>".to_string(),
        TagEnd::Image => "\" />".to_string(),
        TagEnd::HtmlBlock => String::new(),
        TagEnd::MetadataBlock(_) => String::new(),
        TagEnd::DefinitionList => "</dl>\n".to_string(),
        TagEnd::DefinitionListTitle => "</dt>\n".to_string(),
        TagEnd::DefinitionListDefinition => "</dd>\n".to_string(),
        TagEnd::Superscript => "</sup>".to_string(),
        TagEnd::Subscript => "</sub>".to_string(),
    }
}

fn render_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some("terminal") => render_terminal(code),
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
    }
}

/// Render a ```` ```terminal ```` block: `$ ` lines are commands, `# ` lines
/// comments, everything else output.
fn render_terminal(code: &str) -> String {
    let mut body = String::new();
    for line in code.lines() {
        if let Some(cmd) = line.strip_prefix("$ ") {
            body.push_str(&format!(
                "<div><span class=\"prompt\">$ </span><span class=\"cmd\">{}</span></div>\n",
                html_escape(cmd)
            ));
        } else if line.starts_with("# ") {
            body.push_str(&format!(
                "<div><span class=\"comment\">{}</span></div>\n",
                html_escape(line)
            ));
        } else {
            body.push_str(&format!(
                "<div><span class=\"output\">{}</span></div>\n",
                html_escape(line)
            ));
        }
    }

    format!(
        "<div class=\"terminal\">\n\
         <div class=\"terminal-bar\">\
         <span class=\"terminal-dot red\"></span>\
         <span class=\"terminal-dot yellow\"></span>\
         <span class=\"terminal-dot green\"></span>\
         <span class=\"terminal-title\">terminal</span>\
         </div>\n\
         <div class=\"terminal-body\">\n{body}</div>\n\
         </div>\n"
    )
}

/// Escape a link target, replacing `javascript:` URLs with `#`.
pub(crate) fn safe_url(url: &str) -> String {
    let lower = url.trim().to_ascii_lowercase();
    let is_script = lower
        .strip_prefix("javascript")
        .is_some_and(|rest| rest.trim_start().starts_with(':'));

    if is_script {
        "#".to_string()
    } else {
        html_escape(url.trim())
    }
}

/// Escape HTML special characters.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert heading text to an anchor slug.
///
/// Lowercases, collapses every run of characters outside `a-z0-9` into one
/// `-`, and trims dashes from both ends.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
