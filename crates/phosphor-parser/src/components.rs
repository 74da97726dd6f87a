//! `:::` component blocks.
//!
//! ```text
//! :::tip Before you start
//! Install the CLI first.
//! :::
//! ```
//!
//! Blocks are expanded into HTML before the page reaches pulldown-cmark.
//! Components with a Markdown body (callouts and accordions) leave the body
//! between blank-line separated HTML blocks, so it is parsed with the rest of
//! the page and its headings draw from the same ID pool. Unknown block types
//! are left untouched.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::markdown::{html_escape, inline_html, safe_url};

static OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:::([a-z][a-z0-9-]*)\s*(\{[^}]*\})?\s*(.*)$").expect("valid opener regex")
});

static NESTED_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:::[a-z][a-z0-9-]*").expect("valid nested opener regex"));

static ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).expect("valid attribute regex"));

static CHILD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^::([a-z]+)\{([^}]*)\}\s*(.*)$").expect("valid child regex")
});

static CLASS_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)\{\.([\w-]+)\}").expect("valid class link regex")
});

static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?\s*[-:]+").expect("valid separator regex"));

/// Result of expanding a page's component blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expanded {
    /// Markdown with every known block replaced by HTML.
    pub markdown: String,
    /// Element IDs the generated HTML already uses.
    pub reserved_ids: Vec<String>,
}

/// Replace every known `:::` block in `content`.
pub fn expand(content: &str) -> Expanded {
    let mut reserved_ids = Vec::new();
    let markdown = expand_into(content, &mut reserved_ids);
    Expanded {
        markdown,
        reserved_ids,
    }
}

fn expand_into(content: &str, reserved_ids: &mut Vec<String>) -> String {
    if !content.contains(":::") {
        return content.to_string();
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fence = Fence::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if fence.step(trimmed) {
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let Some(caps) = OPENER.captures(trimmed) else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let kind = caps.get(1).map_or("", |m| m.as_str());
        let attrs = parse_attrs(caps.get(2).map_or("", |m| m.as_str()));
        let title = caps.get(3).map_or("", |m| m.as_str()).trim();
        let block = collect_block(&lines, i + 1);

        if !block.closed {
            tracing::warn!(
                block = kind,
                line = i + 1,
                "Unclosed ::: block runs to the end of the page"
            );
        }

        let body = block.body.join("\n");
        match render(kind, &attrs, title, &body, reserved_ids) {
            Some(html) => {
                out.push(String::new());
                out.push(html);
                out.push(String::new());
            }
            None => {
                tracing::debug!(block = kind, "Unknown component left as text");
                out.push(line.to_string());
                out.extend(block.body.iter().map(|l| l.to_string()));
                if block.closed {
                    out.push(lines[block.next - 1].to_string());
                }
            }
        }
        i = block.next;
    }

    let mut expanded = out.join("\n");
    if content.ends_with('\n') {
        expanded.push('\n');
    }
    expanded
}

struct Block<'a> {
    body: Vec<&'a str>,
    closed: bool,
    /// Index of the first line after the block.
    next: usize,
}

/// Gather lines up to the `:::` matching an opener on the line before `from`.
fn collect_block<'a>(lines: &[&'a str], from: usize) -> Block<'a> {
    let mut depth = 1;
    let mut fence = Fence::default();

    for (i, line) in lines.iter().enumerate().skip(from) {
        let trimmed = line.trim();
        if fence.step(trimmed) {
            continue;
        }

        if trimmed == ":::" {
            depth -= 1;
            if depth == 0 {
                return Block {
                    body: lines[from..i].to_vec(),
                    closed: true,
                    next: i + 1,
                };
            }
        } else if NESTED_OPENER.is_match(trimmed) {
            depth += 1;
        }
    }

    Block {
        body: lines.get(from..).map(<[&str]>::to_vec).unwrap_or_default(),
        closed: false,
        next: lines.len(),
    }
}

/// Tracks fenced code blocks so `:::` inside them is left alone.
#[derive(Debug, Default)]
struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    /// Feed a trimmed line; true when the line is part of a code block.
    fn step(&mut self, line: &str) -> bool {
        match self.open {
            Some((ch, len)) => {
                let run = line.chars().take_while(|c| *c == ch).count();
                if run >= len && line[run * ch.len_utf8()..].trim().is_empty() {
                    self.open = None;
                }
                true
            }
            None => {
                let Some(ch) = line.chars().next().filter(|c| *c == '`' || *c == '~') else {
                    return false;
                };
                let run = line.chars().take_while(|c| *c == ch).count();
                if run >= 3 {
                    self.open = Some((ch, run));
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Parse `key="value"` pairs.
pub fn parse_attrs(attrs: &str) -> HashMap<String, String> {
    ATTR.captures_iter(attrs)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

fn render(
    kind: &str,
    attrs: &HashMap<String, String>,
    title: &str,
    body: &str,
    reserved_ids: &mut Vec<String>,
) -> Option<String> {
    let html = match kind {
        "tip" | "info" | "warn" => callout(kind, title, body, reserved_ids),
        "cards" => cards(body),
        "decision-grid" => decision_grid(body),
        "command" => command(attrs, body),
        "accordion" => accordion(attrs, title, body, reserved_ids),
        "pipeline" => pipeline(body),
        "hero" => {
            reserved_ids.push("top".to_string());
            hero(attrs, body)
        }
        _ => return None,
    };
    Some(html)
}

fn attr<'a>(attrs: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    attrs.get(key).map_or(default, String::as_str)
}

/// `:::tip`, `:::info` and `:::warn`. The first line is the title.
fn callout(kind: &str, title: &str, body: &str, reserved_ids: &mut Vec<String>) -> String {
    let text = if title.is_empty() {
        body.trim().to_string()
    } else {
        format!("{title}\n{body}")
    };
    let text = text.trim();
    let (heading, rest) = text
        .split_once('\n')
        .map_or((text, ""), |(h, r)| (h.trim(), r.trim()));

    let heading = if heading.is_empty() {
        default_title(kind)
    } else {
        html_escape(heading)
    };

    let body_html = markdown_body(rest, reserved_ids);
    format!(
        "<div class=\"callout {kind}\">\n\
         <div class=\"callout-title\">{heading}</div>\n\
         <div class=\"callout-body\">{body_html}</div>\n\
         </div>"
    )
}

fn default_title(kind: &str) -> String {
    let mut chars = kind.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Leave a Markdown body between blank lines so the page parser renders it.
fn markdown_body(body: &str, reserved_ids: &mut Vec<String>) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    format!("\n\n{}\n\n", expand_into(body.trim(), reserved_ids))
}

/// `::card{...}` or `::flag{...}` children of a block.
struct Child {
    attrs: HashMap<String, String>,
    body: String,
}

fn children(body: &str, name: &str) -> Vec<Child> {
    let mut found: Vec<Child> = Vec::new();

    for line in body.lines() {
        match CHILD.captures(line.trim()) {
            Some(caps) if &caps[1] == name => found.push(Child {
                attrs: parse_attrs(&caps[2]),
                body: caps[3].to_string(),
            }),
            _ => {
                if let Some(child) = found.last_mut() {
                    child.body.push('\n');
                    child.body.push_str(line);
                }
            }
        }
    }

    for child in &mut found {
        child.body = child.body.trim().trim_end_matches(':').trim().to_string();
    }
    found
}

/// `:::cards` with `::card{icon="..." color="..." title="..."}` children.
fn cards(body: &str) -> String {
    let mut html = String::from("<div class=\"card-grid\">\n");

    for card in children(body, "card") {
        html.push_str(&format!(
            "<div class=\"card\">\n\
             <div class=\"card-header\">\
             <div class=\"card-icon {color}\"><i data-lucide=\"{icon}\"></i></div>\
             <div class=\"card-title\">{title}</div>\
             </div>\n\
             <p>{text}</p>\n\
             </div>\n",
            color = html_escape(attr(&card.attrs, "color", "teal")),
            icon = html_escape(attr(&card.attrs, "icon", "star")),
            title = html_escape(attr(&card.attrs, "title", "")),
            text = inline_html(&card.body),
        ));
    }

    html.push_str("</div>");
    html
}

fn table_cells(row: &str) -> Vec<&str> {
    row.trim_matches('|').split('|').map(str::trim).collect()
}

/// `:::decision-grid` holding a Markdown table.
fn decision_grid(body: &str) -> String {
    let rows: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some((header, data)) = rows.split_first().filter(|_| rows.len() >= 2) else {
        return format!("<p>{}</p>", inline_html(body.trim()));
    };

    let header = table_cells(header);
    let columns = format!("{}auto", "1fr ".repeat(header.len().saturating_sub(1)));
    let mut html = format!(
        "<div class=\"decision-grid\" style=\"grid-template-columns: {columns};\">\n"
    );

    for cell in &header {
        html.push_str(&format!("<div class=\"dg-header\">{}</div>", html_escape(cell)));
    }
    html.push('\n');

    for row in data.iter().filter(|row| !TABLE_SEPARATOR.is_match(row)) {
        html.push_str("<div class=\"dg-row\">");
        for cell in table_cells(row) {
            html.push_str(&format!("<div class=\"dg-cell\">{}</div>", inline_html(cell)));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>");
    html
}

/// `:::command{title="..." usage="..."}` with `::flag{name="..." short="..."}`
/// rows.
fn command(attrs: &HashMap<String, String>, body: &str) -> String {
    let name = attr(attrs, "title", "command");
    let usage = attr(attrs, "usage", name);

    let mut rows = String::new();
    for flag in children(body, "flag") {
        let mut label = format!("<code>{}</code>", html_escape(attr(&flag.attrs, "name", "")));
        if let Some(short) = flag.attrs.get("short").filter(|s| !s.is_empty()) {
            label.push_str(&format!(", <code>{}</code>", html_escape(short)));
        }
        rows.push_str(&format!(
            "<tr><td>{label}</td><td>{}</td></tr>\n",
            inline_html(&flag.body)
        ));
    }

    let table = if rows.is_empty() {
        String::new()
    } else {
        format!(
            "<table class=\"cmd-arg-table\">\n\
             <thead><tr><th>Flag</th><th>Description</th></tr></thead>\n\
             <tbody>\n{rows}</tbody>\n\
             </table>\n"
        )
    };

    format!(
        "<div class=\"cmd-block\">\n\
         <div class=\"cmd-block-header\"><span class=\"cmd-block-name\">{}</span></div>\n\
         <div class=\"cmd-block-body\">\n\
         <div class=\"cmd-block-usage\">{}</div>\n\
         {table}</div>\n\
         </div>",
        html_escape(name),
        html_escape(usage),
    )
}

/// `:::accordion{title="..."}`, a collapsible `<details>` item.
fn accordion(
    attrs: &HashMap<String, String>,
    title: &str,
    body: &str,
    reserved_ids: &mut Vec<String>,
) -> String {
    let fallback = if title.is_empty() { "Details" } else { title };
    let summary = html_escape(attr(attrs, "title", fallback));
    let body_html = markdown_body(body, reserved_ids);

    format!(
        "<details class=\"trouble-item\">\n\
         <summary class=\"trouble-summary\">{summary}</summary>\n\
         <div class=\"trouble-body\">{body_html}</div>\n\
         </details>"
    )
}

/// `:::pipeline` with `Stage -> Stage -> Stage`.
fn pipeline(body: &str) -> String {
    let stages: Vec<String> = body
        .split("->")
        .map(|stage| stage.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|stage| !stage.is_empty())
        .collect();

    let mut html = String::from("<div class=\"pipeline-flow\">\n");
    for (i, stage) in stages.iter().enumerate() {
        if i > 0 {
            html.push_str("<div class=\"pipeline-arrow\"><i data-lucide=\"arrow-right\"></i></div>\n");
        }
        html.push_str(&format!(
            "<div class=\"pipeline-stage\"><div class=\"pipeline-node\">\
             <span class=\"stage-num\">{:02}</span> {}\
             </div></div>\n",
            i + 1,
            html_escape(stage)
        ));
    }
    html.push_str("</div>");
    html
}

/// `:::hero{badge="..."}`: a `# ` title, description lines and
/// `[Label](url){.class}` buttons.
fn hero(attrs: &HashMap<String, String>, body: &str) -> String {
    let mut title = String::new();
    let mut description = String::new();
    let mut buttons = Vec::new();

    for line in body.lines().map(str::trim) {
        if let Some(text) = line.strip_prefix("# ") {
            title = inline_html(text)
                .replace("<strong>", "<span class=\"accent\">")
                .replace("</strong>", "</span>");
        } else if line.starts_with('[') {
            if let Some(caps) = CLASS_LINK.captures(line) {
                buttons.push(format!(
                    "<a href=\"{}\" class=\"hero-btn {}\">{}</a>",
                    safe_url(&caps[2]),
                    &caps[3],
                    inline_html(&caps[1])
                ));
            }
        } else if !line.is_empty() {
            description.push_str(&format!("<p>{}</p>\n", inline_html(line)));
        }
    }

    let badge = attrs
        .get("badge")
        .filter(|b| !b.is_empty())
        .map(|b| format!("<div class=\"hero-badge\">&#9679; {}</div>\n", html_escape(b)))
        .unwrap_or_default();

    format!(
        "<div class=\"hero\" id=\"top\">\n\
         {badge}<h1>{title}</h1>\n\
         {description}<div class=\"hero-actions\">{}</div>\n\
         </div>",
        buttons.join("\n")
    )
}
