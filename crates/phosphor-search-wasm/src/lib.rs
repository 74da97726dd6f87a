//! Phosphor Search Runtime
//!
//! In-page search for Phosphor documentation sites, compiled to WebAssembly
//! for the browser and used natively by the `phosphor` CLI.
//!
//! # Components
//!
//! - [`SearchIndex`]: the precomputed, read-only entry list embedded at build time
//! - [`SearchEngine`]: ranks the index against a query (at most eight matches)
//! - [`highlight`]: wraps query matches in `<mark>`, escaping everything else
//! - [`SearchController`]: keyboard-navigable result list state machine
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { SearchWidget } from 'phosphor-search-wasm';
//!
//! await init();
//! const widget = new SearchWidget(SEARCH_INDEX);
//!
//! input.addEventListener('input', () => render(widget.input(input.value)));
//! input.addEventListener('keydown', (e) => apply(e, widget.keyDown(e.key)));
//! ```

pub mod controller;
pub mod engine;
pub mod highlight;
pub mod index;
pub mod tokenize;

pub use controller::{
    DEFAULT_SHORTCUT, Effect, Key, KeyInput, Mode, ResultView, SearchController, SearchEvent,
    ViewModel,
};
pub use engine::{MAX_RESULTS, ScoredMatch, SearchEngine, score};
pub use highlight::{escape_html, highlight, match_ranges, wrap_matches};
pub use index::{Entry, IndexError, SearchIndex};
use serde::Serialize;
pub use tokenize::tokenize;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// Sets up the panic hook and forwards log output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A logger may already be installed by the host page.
    let _ = console_log::init_with_level(log::Level::Warn);
}

/// Get the version of the search library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check if the library is ready.
#[wasm_bindgen(js_name = isReady)]
pub fn is_ready() -> bool {
    true
}

/// Highlight query matches in a title.
#[wasm_bindgen(js_name = highlight)]
pub fn highlight_js(title: &str, query: &str) -> String {
    highlight(title, query)
}

/// Escape HTML special characters.
#[wasm_bindgen(js_name = escapeHtml)]
pub fn escape_html_js(s: &str) -> String {
    escape_html(s)
}

/// State change produced by one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Update {
    /// What to render now.
    pub view: ViewModel,
    /// Side effects to perform, in order.
    pub effects: Vec<Effect>,
}

/// Search box state for one page, driven from JavaScript event handlers.
#[wasm_bindgen]
pub struct SearchWidget {
    controller: SearchController,
}

impl SearchWidget {
    /// Create a widget over an already loaded index.
    pub fn from_index(index: SearchIndex) -> Self {
        Self {
            controller: SearchController::new(SearchEngine::new(index)),
        }
    }

    /// Dispatch an event and collect the resulting view and effects.
    pub fn apply(&mut self, event: SearchEvent) -> Update {
        let effects = self.controller.handle(event);
        Update {
            view: self.controller.view(),
            effects,
        }
    }

    /// The underlying controller.
    pub fn controller(&self) -> &SearchController {
        &self.controller
    }
}

#[wasm_bindgen]
impl SearchWidget {
    /// Create a widget from the index array embedded in the page.
    #[wasm_bindgen(constructor)]
    pub fn new(entries: JsValue) -> Result<SearchWidget, JsValue> {
        let index: SearchIndex = serde_wasm_bindgen::from_value(entries)
            .map_err(|e| JsValue::from_str(&format!("Failed to read index: {e}")))?;
        Ok(Self::from_index(index))
    }

    /// Create a widget from a JSON string.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<SearchWidget, JsValue> {
        let index = SearchIndex::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse index: {e}")))?;
        Ok(Self::from_index(index))
    }

    /// Change the key that focuses the search input.
    #[wasm_bindgen(js_name = setShortcut)]
    pub fn set_shortcut(&mut self, key: char) {
        self.controller.set_shortcut(key);
    }

    /// Rank the index without touching the result list.
    pub fn search(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.controller.engine().search(query))
    }

    /// The search input's value changed.
    pub fn input(&mut self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.apply(SearchEvent::QueryChanged(query.to_string())))
    }

    /// A key was pressed inside the search input.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> Result<JsValue, JsValue> {
        to_js(&self.apply(SearchEvent::Key(Key::from_name(key))))
    }

    /// A rendered result was clicked.
    #[wasm_bindgen(js_name = resultClicked)]
    pub fn result_clicked(&mut self, index: usize) -> Result<JsValue, JsValue> {
        to_js(&self.apply(SearchEvent::ResultClicked(index)))
    }

    /// A pointer action landed outside the search region.
    #[wasm_bindgen(js_name = pointerOutside)]
    pub fn pointer_outside(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.apply(SearchEvent::PointerOutside))
    }

    /// A key was pressed anywhere in the document.
    #[wasm_bindgen(js_name = globalKey)]
    pub fn global_key(
        &mut self,
        key: &str,
        ctrl: bool,
        meta: bool,
        alt: bool,
        editable: bool,
    ) -> Result<JsValue, JsValue> {
        to_js(&self.apply(SearchEvent::GlobalKey(KeyInput {
            key: key.to_string(),
            ctrl,
            meta,
            alt,
            editable_target: editable,
        })))
    }

    /// Current view without changing state.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller.view())
    }

    /// Number of indexed entries.
    #[wasm_bindgen(js_name = entryCount)]
    pub fn entry_count(&self) -> usize {
        self.controller.engine().index().len()
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> SearchWidget {
        SearchWidget::from_index(SearchIndex::new(vec![
            Entry::new("Deploy", "release ship", "Operations", "ops.html#deploy"),
            Entry::new("Deploy Keys", "ssh", "Security", "security.html#deploy-keys"),
        ]))
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_is_ready() {
        assert!(is_ready());
    }

    #[test]
    fn test_widget_apply_sequence() {
        let mut widget = widget();

        let update = widget.apply(SearchEvent::QueryChanged("deploy".to_string()));
        assert_eq!(update.view.mode, Mode::Results);
        assert_eq!(update.view.items.len(), 2);
        assert!(update.effects.is_empty());

        let update = widget.apply(SearchEvent::Key(Key::ArrowUp));
        assert_eq!(update.view.active_index, Some(1));
        assert_eq!(
            update.effects,
            vec![Effect::PreventDefault, Effect::ScrollIntoView(1)]
        );

        let update = widget.apply(SearchEvent::Key(Key::Enter));
        assert_eq!(update.view.mode, Mode::Idle);
        assert_eq!(
            update.effects.last(),
            Some(&Effect::Navigate("security.html#deploy-keys".to_string()))
        );
    }

    #[test]
    fn test_widget_controller_access() {
        let widget = widget();
        assert_eq!(widget.controller().engine().index().len(), 2);
        assert_eq!(widget.controller().mode(), Mode::Idle);
    }
}
