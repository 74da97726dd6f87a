//! Phosphor UI Components
//!
//! Leptos components that bind the search controller to a documentation
//! page, plus the page collaborators search relies on.
//!
//! # Components
//!
//! ## Search
//! - [`SearchBox`] - Input and result list driven by the controller
//! - [`SearchResults`] - Highlighted, keyboard-navigable result list
//! - [`SearchShortcut`] - Global `/` shortcut that focuses the input
//!
//! ## Navigation
//! - [`TableOfContents`] - "On this page" links with scroll spy
//! - [`SidebarToggle`] - Mobile sidebar button
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { mountSearch, mountToc, mountNav } from 'phosphor-ui';
//!
//! await init();
//! mountSearch('#search', JSON.stringify(SEARCH_INDEX));
//! mountToc('.toc');
//! mountNav('.sidebar-nav', '#sidebar-toggle');
//! ```
//!
//! The search box and the sidebar toggle share one open/closed signal, so a
//! search navigation closes a sidebar opened from the toggle.

pub mod navigation;
pub mod search;

use leptos::prelude::*;
use std::cell::OnceCell;

pub use navigation::{
    SPY_OFFSET, SidebarToggle, TableOfContents, TocEntry, active_id, active_links,
    bind_nav_links, is_active_href, toc_entries, use_scroll_spy,
};
use phosphor_search_wasm::SearchIndex;
pub use search::{
    BrowserHost, EffectHost, SearchBox, SearchHandle, SearchResults, SearchShortcut,
    apply_effects, is_editable, is_plain_click,
};
use wasm_bindgen::{JsCast, prelude::*};

/// Selector of the static sidebar whose `open` class mirrors the signal.
const SIDEBAR_SELECTOR: &str = ".sidebar";

thread_local! {
    static SIDEBAR_OPEN: OnceCell<RwSignal<bool>> = const { OnceCell::new() };
}

/// The page's single sidebar signal, created by whichever mount runs first.
///
/// Must be called inside a mount so the signal and its class binding have a
/// live owner.
fn shared_sidebar() -> RwSignal<bool> {
    SIDEBAR_OPEN.with(|cell| {
        *cell.get_or_init(|| {
            let open = RwSignal::new(false);
            bind_sidebar_class(open);
            open
        })
    })
}

/// Mount the search box into the element matching `selector`.
#[wasm_bindgen(js_name = mountSearch)]
pub fn mount_search(selector: &str, index_json: &str) -> Result<(), JsValue> {
    let index = SearchIndex::from_json(index_json)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse index: {e}")))?;
    let target = find_element(selector)?;

    tracing::debug!(entries = index.len(), selector, "Mounting search");

    let handle = SearchHandle::from_index(index);
    leptos::mount::mount_to(target, move || {
        let sidebar_open = shared_sidebar();

        view! {
          <SearchBox handle=handle sidebar_open=sidebar_open />
          <SearchShortcut handle=handle />
        }
    })
    .forget();

    Ok(())
}

/// Build a table of contents from the page's `.content` headings.
///
/// Replaces whatever the target holds, such as a pre-rendered list.
#[wasm_bindgen(js_name = mountToc)]
pub fn mount_toc(selector: &str) -> Result<(), JsValue> {
    let target = find_element(selector)?;
    target.set_inner_html("");
    let entries = collect_headings()?;
    let ids = entries.iter().map(|e| e.id.clone()).collect();

    leptos::mount::mount_to(target, move || {
        let current = use_scroll_spy(ids);
        view! { <TableOfContents entries=Signal::stored(entries) active_id=current.into() /> }
    })
    .forget();

    Ok(())
}

/// Wire the sidebar: mount the mobile toggle and spy on the nav links.
#[wasm_bindgen(js_name = mountNav)]
pub fn mount_nav(nav_selector: &str, toggle_selector: &str) -> Result<(), JsValue> {
    let nav: web_sys::Element = find_element(nav_selector)?.into();
    let toggle = find_element(toggle_selector)?;
    let section_ids = collect_section_ids()?;

    tracing::debug!(sections = section_ids.len(), nav_selector, "Mounting navigation");

    leptos::mount::mount_to(toggle, move || {
        let open = shared_sidebar();
        bind_nav_links(&nav, section_ids, open);

        view! { <SidebarToggle open=open /> }
    })
    .forget();

    Ok(())
}

fn find_element(selector: &str) -> Result<web_sys::HtmlElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    document
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("no element matches {selector}")))
}

/// Headings in document order. An `h2` links to its enclosing section.
fn collect_headings() -> Result<Vec<TocEntry>, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let nodes = document.query_selector_all(".content h2, .content h3")?;

    let mut entries = Vec::new();
    for i in 0..nodes.length() {
        let Some(el) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };

        let level = if el.tag_name().eq_ignore_ascii_case("h2") {
            2
        } else {
            3
        };
        let id = if level == 2 {
            el.closest(".section[id]")
                .ok()
                .flatten()
                .map(|section| section.id())
                .unwrap_or_else(|| el.id())
        } else {
            el.id()
        };
        if id.is_empty() {
            continue;
        }

        let text = el.text_content().unwrap_or_default();
        entries.push(TocEntry::new(level, text.trim(), id));
    }

    Ok(entries)
}

/// IDs of the page's `.section` wrappers in document order.
fn collect_section_ids() -> Result<Vec<String>, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let nodes = document.query_selector_all(".section[id]")?;

    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i)?.dyn_into::<web_sys::Element>().ok())
        .map(|el| el.id())
        .filter(|id| !id.is_empty())
        .collect())
}

/// Mirror the sidebar signal onto the static sidebar's `open` class.
fn bind_sidebar_class(open: RwSignal<bool>) {
    Effect::new(move |_| {
        let is_open = open.get();
        let sidebar = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(SIDEBAR_SELECTOR).ok().flatten());

        if let Some(sidebar) = sidebar {
            let _ = sidebar.class_list().toggle_with_force("open", is_open);
        }
    });
}
