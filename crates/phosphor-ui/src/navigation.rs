//! Table of contents, scroll spy and mobile sidebar components.
//!
//! None of these depend on search state. The sidebar signal is the only thing
//! shared with search, which closes it before navigating.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, prelude::*};

/// Pixels below the top of the viewport at which a section counts as current.
pub const SPY_OFFSET: f64 = 120.0;

/// Table of contents entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocEntry {
    /// Heading level (2 or 3).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID.
    pub id: String,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(level: u8, text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            id: id.into(),
        }
    }

    /// CSS class for the entry's indentation.
    pub fn class(&self) -> String {
        format!("toc-h{}", self.level)
    }
}

/// Entries worth rendering: a page with a single heading gets no TOC.
pub fn toc_entries(entries: Vec<TocEntry>) -> Vec<TocEntry> {
    if entries.len() > 1 { entries } else { Vec::new() }
}

/// ID of the last anchor whose top is at or above `scroll_y + SPY_OFFSET`.
///
/// `anchors` are `(id, offset_top)` pairs in document order.
pub fn active_id<'a>(anchors: &'a [(String, f64)], scroll_y: f64) -> Option<&'a str> {
    let line = scroll_y + SPY_OFFSET;
    anchors
        .iter()
        .filter(|(_, top)| *top <= line)
        .last()
        .map(|(id, _)| id.as_str())
}

/// Whether a sidebar link points at the section `current`.
pub fn is_active_href(href: &str, current: &str) -> bool {
    !current.is_empty() && href.ends_with(&format!("#{current}"))
}

/// Track the current section while the page scrolls.
///
/// Returns the ID of the section under the spy line, or an empty string.
pub fn use_scroll_spy(ids: Vec<String>) -> ReadSignal<String> {
    let (current, set_current) = signal(String::new());

    let measure = move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let anchors: Vec<(String, f64)> = ids
            .iter()
            .filter_map(|id| {
                let el = document
                    .get_element_by_id(id)?
                    .dyn_into::<web_sys::HtmlElement>()
                    .ok()?;
                Some((id.clone(), f64::from(el.offset_top())))
            })
            .collect();

        let scroll_y = window.scroll_y().unwrap_or_default();
        let next = active_id(&anchors, scroll_y).unwrap_or_default().to_string();
        if current.get_untracked() != next {
            set_current.set(next);
        }
    };

    Effect::new(move |_| {
        let Some(window) = web_sys::window() else {
            return;
        };

        measure();
        let handler = Closure::<dyn Fn()>::new(measure.clone());
        let _ =
            window.add_event_listener_with_callback("scroll", handler.as_ref().unchecked_ref());

        // Leak the closure to keep it alive
        handler.forget();
    });

    current
}

/// Links in `nav` that should carry the `active` class for `current`.
///
/// `hrefs` are the links' `href` attributes in document order.
pub fn active_links(hrefs: &[String], current: &str) -> Vec<bool> {
    hrefs.iter().map(|href| is_active_href(href, current)).collect()
}

/// Keep the sidebar's links in step with the section being read.
///
/// Marks the links pointing at the current section `active` while the page
/// scrolls, and closes the mobile sidebar when any link is followed. Must be
/// called inside a reactive owner.
pub fn bind_nav_links(nav: &web_sys::Element, section_ids: Vec<String>, open: RwSignal<bool>) {
    let Ok(nodes) = nav.query_selector_all("a") else {
        return;
    };
    let links: Vec<web_sys::Element> = (0..nodes.length())
        .filter_map(|i| nodes.item(i)?.dyn_into::<web_sys::Element>().ok())
        .collect();
    let hrefs: Vec<String> = links
        .iter()
        .map(|link| link.get_attribute("href").unwrap_or_default())
        .collect();

    for link in &links {
        let handler = Closure::<dyn Fn()>::new(move || open.set(false));
        let _ = link.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        handler.forget();
    }

    let current = use_scroll_spy(section_ids);
    Effect::new(move |_| {
        let flags = active_links(&hrefs, &current.get());
        for (link, active) in links.iter().zip(flags) {
            let _ = link.class_list().toggle_with_force("active", active);
        }
    });
}

/// Table of contents component.
#[component]
pub fn TableOfContents(
    /// TOC entries.
    entries: Signal<Vec<TocEntry>>,
    /// Currently active heading ID.
    #[prop(default = "".to_string().into())]
    active_id: Signal<String>,
) -> impl IntoView {
    view! {
      <Show when=move || entries.with(|e| e.len() > 1)>
        <nav class="toc" aria-label="Table of contents">
          <div class="toc-label">"On this page"</div>
          <For
            each=move || toc_entries(entries.get())
            key=|entry| entry.id.clone()
            children=move |entry| {
              let id = entry.id.clone();
              let is_active = Memo::new(move |_| active_id.get() == id);
              let href = format!("#{}", entry.id);

              view! {
                <a href=href class=entry.class() class:active=is_active>
                  {entry.text.clone()}
                </a>
              }
            }
          />
        </nav>
      </Show>
    }
}

/// Hamburger button that toggles the mobile sidebar.
#[component]
pub fn SidebarToggle(
    /// Whether the sidebar is open.
    open: RwSignal<bool>,
) -> impl IntoView {
    view! {
      <button
        class="sidebar-toggle"
        aria-label="Toggle navigation"
        aria-expanded=move || open.get().to_string()
        on:click=move |_| open.update(|o| *o = !*o)
      >
        <span></span>
        <span></span>
        <span></span>
      </button>
    }
}
