//! Result list controller.
//!
//! A small state machine over `Idle`, `Results` and `NoResults`. The host
//! feeds it typed [`SearchEvent`]s and performs the returned [`Effect`]s;
//! what to draw is read back through [`SearchController::view`].

use serde::{Serialize, Serializer};

use crate::{
    engine::{ScoredMatch, SearchEngine},
    highlight::{escape_html, highlight},
    tokenize::MIN_WORD_LEN,
};

/// Default key that focuses the search input.
pub const DEFAULT_SHORTCUT: char = '/';

/// What the result list is currently showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Nothing rendered.
    #[default]
    Idle,
    /// One or more ranked results.
    Results,
    /// An explicit "no results" message.
    NoResults,
}

/// Keys the result list reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            _ => Self::Other,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// A document-level key press, as seen by the global shortcut handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// DOM key name.
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    /// Whether focus is inside a text-editable control.
    pub editable_target: bool,
}

impl KeyInput {
    /// A bare key press outside any editable control.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}

/// Input events driving the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The search input's value changed.
    QueryChanged(String),
    /// A key was pressed inside the search input.
    Key(Key),
    /// A rendered result was clicked.
    ResultClicked(usize),
    /// A pointer action landed outside the search region.
    PointerOutside,
    /// A key was pressed anywhere in the document.
    GlobalKey(KeyInput),
}

/// Side effects the host must perform, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Effect {
    /// Suppress the browser's default handling of the event.
    PreventDefault,
    /// Scroll the result at this index into view (nearest block).
    ScrollIntoView(usize),
    /// Collapse the mobile sidebar.
    CloseSidebar,
    /// Assign the page location.
    Navigate(String),
    /// Remove focus from the search input.
    BlurInput,
    /// Focus the search input.
    FocusInput,
}

/// One rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    /// Highlighted, escaped title markup.
    pub title_html: String,
    /// Escaped section label.
    pub section_html: String,
    /// Navigation target.
    pub url: String,
    /// Whether this is the keyboard-selected result.
    pub active: bool,
}

/// Pure projection of controller state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub mode: Mode,
    pub items: Vec<ResultView>,
    /// Selected index, serialized as `-1` when nothing is selected.
    #[serde(serialize_with = "serialize_active_index")]
    pub active_index: Option<usize>,
    /// Escaped "no results" message, only in [`Mode::NoResults`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_html: Option<String>,
}

fn serialize_active_index<S>(index: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match index {
        Some(i) => serializer.serialize_i64(*i as i64),
        None => serializer.serialize_i64(-1),
    }
}

/// Stateful controller for the search result list.
#[derive(Debug, Clone)]
pub struct SearchController {
    engine: SearchEngine,
    shortcut: char,
    query: String,
    results: Vec<ScoredMatch>,
    active: Option<usize>,
    mode: Mode,
}

impl SearchController {
    /// Create a controller using the default `/` shortcut.
    pub fn new(engine: SearchEngine) -> Self {
        Self::with_shortcut(engine, DEFAULT_SHORTCUT)
    }

    /// Create a controller with a custom focus shortcut.
    pub fn with_shortcut(engine: SearchEngine, shortcut: char) -> Self {
        Self {
            engine,
            shortcut,
            query: String::new(),
            results: Vec::new(),
            active: None,
            mode: Mode::Idle,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Currently rendered results.
    pub fn results(&self) -> &[ScoredMatch] {
        &self.results
    }

    /// Keyboard-selected result, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Last evaluated query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The engine this controller queries.
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Change the focus shortcut key.
    pub fn set_shortcut(&mut self, shortcut: char) {
        self.shortcut = shortcut;
    }

    /// Dispatch an event and return the effects to perform.
    pub fn handle(&mut self, event: SearchEvent) -> Vec<Effect> {
        match event {
            SearchEvent::QueryChanged(query) => {
                self.set_query(&query);
                Vec::new()
            }
            SearchEvent::Key(key) => self.key_down(key),
            SearchEvent::ResultClicked(index) => self.select(index),
            SearchEvent::PointerOutside => {
                self.dismiss();
                Vec::new()
            }
            SearchEvent::GlobalKey(input) => {
                if self.is_focus_shortcut(&input) {
                    vec![Effect::PreventDefault, Effect::FocusInput]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Re-run the search for a new input value.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.results = self.engine.search(query);
        self.active = None;

        self.mode = if !self.results.is_empty() {
            Mode::Results
        } else if query.trim().chars().count() >= MIN_WORD_LEN {
            Mode::NoResults
        } else {
            Mode::Idle
        };
    }

    /// Handle a key pressed inside the search input.
    pub fn key_down(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::ArrowDown => self.step(Self::next_index),
            Key::ArrowUp => self.step(Self::prev_index),
            Key::Enter => {
                let target = self.active.unwrap_or(0);
                let mut effects = vec![Effect::PreventDefault];
                effects.extend(self.select(target));
                effects
            }
            Key::Escape => {
                self.dismiss();
                vec![Effect::BlurInput]
            }
            Key::Other => Vec::new(),
        }
    }

    /// Clear rendered results and return to idle.
    pub fn dismiss(&mut self) {
        self.results.clear();
        self.active = None;
        self.mode = Mode::Idle;
    }

    /// Whether a document-level key press should focus the search input.
    pub fn is_focus_shortcut(&self, input: &KeyInput) -> bool {
        let mut chars = input.key.chars();
        chars.next() == Some(self.shortcut)
            && chars.next().is_none()
            && !input.ctrl
            && !input.meta
            && !input.alt
            && !input.editable_target
    }

    /// Project the current state for rendering.
    pub fn view(&self) -> ViewModel {
        match self.mode {
            Mode::Idle => ViewModel::default(),
            Mode::Results => ViewModel {
                mode: Mode::Results,
                items: self
                    .results
                    .iter()
                    .enumerate()
                    .map(|(i, m)| ResultView {
                        title_html: highlight(&m.entry.title, &self.query),
                        section_html: escape_html(&m.entry.section),
                        url: m.entry.url.clone(),
                        active: self.active == Some(i),
                    })
                    .collect(),
                active_index: self.active,
                message_html: None,
            },
            Mode::NoResults => ViewModel {
                mode: Mode::NoResults,
                items: Vec::new(),
                active_index: None,
                message_html: Some(format!(
                    "No results for \"{}\"",
                    escape_html(self.query.trim())
                )),
            },
        }
    }

    fn step(&mut self, advance: fn(Option<usize>, usize) -> usize) -> Vec<Effect> {
        let mut effects = vec![Effect::PreventDefault];
        if !self.results.is_empty() {
            let index = advance(self.active, self.results.len());
            self.active = Some(index);
            effects.push(Effect::ScrollIntoView(index));
        }
        effects
    }

    fn next_index(active: Option<usize>, len: usize) -> usize {
        match active {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        }
    }

    fn prev_index(active: Option<usize>, len: usize) -> usize {
        match active {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        }
    }

    /// Navigate to the result at `index`, closing the sidebar first.
    fn select(&mut self, index: usize) -> Vec<Effect> {
        let Some(url) = self.results.get(index).map(|m| m.entry.url.clone()) else {
            return Vec::new();
        };

        tracing::debug!(index, url = %url, "Navigating to search result");
        self.dismiss();
        vec![Effect::CloseSidebar, Effect::Navigate(url)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Entry, SearchIndex};

    fn controller() -> SearchController {
        let index = SearchIndex::new(vec![
            Entry::new("Install", "setup", "Guide", "guide.html#install"),
            Entry::new("Install Plugins", "extend", "Plugins", "plugins.html#install"),
            Entry::new("Uninstall", "remove", "Guide", "guide.html#uninstall"),
            Entry::new("Routing", "paths <urls>", "Core & API", "core.html#routing"),
        ]);
        SearchController::new(SearchEngine::new(index))
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.active_index(), None);
        assert!(c.results().is_empty());
        assert_eq!(c.view(), ViewModel::default());
    }

    #[test]
    fn test_query_with_results() {
        let mut c = controller();
        c.set_query("install");

        assert_eq!(c.mode(), Mode::Results);
        assert_eq!(c.results().len(), 3);
        assert_eq!(c.active_index(), None);
        assert_eq!(c.results()[0].entry.title, "Install");
    }

    #[test]
    fn test_query_without_results() {
        let mut c = controller();
        c.set_query("  python ");

        assert_eq!(c.mode(), Mode::NoResults);
        let view = c.view();
        assert!(view.items.is_empty());
        assert_eq!(view.message_html.as_deref(), Some("No results for \"python\""));
    }

    #[test]
    fn test_short_query_is_idle() {
        let mut c = controller();
        c.set_query("install");
        c.set_query("x");

        assert_eq!(c.mode(), Mode::Idle);
        assert!(c.results().is_empty());
        assert_eq!(c.view(), ViewModel::default());
    }

    #[test]
    fn test_no_results_message_is_escaped() {
        let mut c = controller();
        c.set_query("<zz>");
        assert_eq!(
            c.view().message_html.as_deref(),
            Some("No results for \"&lt;zz&gt;\"")
        );
    }

    #[test]
    fn test_new_query_resets_selection() {
        let mut c = controller();
        c.set_query("install");
        c.key_down(Key::ArrowDown);
        assert_eq!(c.active_index(), Some(0));

        c.set_query("install plugins");
        assert_eq!(c.active_index(), None);
    }

    #[test]
    fn test_arrow_down_wraps() {
        let mut c = controller();
        c.set_query("install");

        assert_eq!(
            c.key_down(Key::ArrowDown),
            vec![Effect::PreventDefault, Effect::ScrollIntoView(0)]
        );
        c.key_down(Key::ArrowDown);
        c.key_down(Key::ArrowDown);
        assert_eq!(c.active_index(), Some(2));

        c.key_down(Key::ArrowDown);
        assert_eq!(c.active_index(), Some(0));
    }

    #[test]
    fn test_arrow_up_wraps() {
        let mut c = controller();
        c.set_query("install");

        c.key_down(Key::ArrowUp);
        assert_eq!(c.active_index(), Some(2));

        c.key_down(Key::ArrowUp);
        c.key_down(Key::ArrowUp);
        assert_eq!(c.active_index(), Some(0));

        c.key_down(Key::ArrowUp);
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn test_arrows_without_results() {
        let mut c = controller();
        assert_eq!(c.key_down(Key::ArrowDown), vec![Effect::PreventDefault]);
        assert_eq!(c.key_down(Key::ArrowUp), vec![Effect::PreventDefault]);
        assert_eq!(c.active_index(), None);
    }

    #[test]
    fn test_exactly_one_active_item() {
        let mut c = controller();
        c.set_query("install");
        c.key_down(Key::ArrowDown);
        c.key_down(Key::ArrowDown);

        let view = c.view();
        assert_eq!(view.active_index, Some(1));
        let active: Vec<_> = view.items.iter().filter(|item| item.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].url, "plugins.html#install");
    }

    #[test]
    fn test_enter_navigates_to_active() {
        let mut c = controller();
        c.set_query("install");
        c.key_down(Key::ArrowDown);
        c.key_down(Key::ArrowDown);

        let effects = c.key_down(Key::Enter);
        assert_eq!(
            effects,
            vec![
                Effect::PreventDefault,
                Effect::CloseSidebar,
                Effect::Navigate("plugins.html#install".to_string()),
            ]
        );
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.active_index(), None);
    }

    #[test]
    fn test_enter_defaults_to_first() {
        let mut c = controller();
        c.set_query("install");

        let effects = c.key_down(Key::Enter);
        assert!(effects.contains(&Effect::Navigate("guide.html#install".to_string())));
    }

    #[test]
    fn test_enter_without_results_is_noop() {
        let mut c = controller();
        c.set_query("python");
        assert_eq!(c.key_down(Key::Enter), vec![Effect::PreventDefault]);
        assert_eq!(c.mode(), Mode::NoResults);
    }

    #[test]
    fn test_escape_clears_and_blurs() {
        let mut c = controller();
        c.set_query("install");
        c.key_down(Key::ArrowDown);

        assert_eq!(c.key_down(Key::Escape), vec![Effect::BlurInput]);
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.active_index(), None);
        assert!(c.results().is_empty());

        // From no-results too
        c.set_query("python");
        c.key_down(Key::Escape);
        assert_eq!(c.mode(), Mode::Idle);
    }

    #[test]
    fn test_pointer_outside_dismisses_without_blur() {
        let mut c = controller();
        c.set_query("install");

        assert!(c.handle(SearchEvent::PointerOutside).is_empty());
        assert_eq!(c.mode(), Mode::Idle);
        assert!(c.results().is_empty());
    }

    #[test]
    fn test_result_click() {
        let mut c = controller();
        c.set_query("routing");

        let effects = c.handle(SearchEvent::ResultClicked(0));
        assert_eq!(
            effects,
            vec![
                Effect::CloseSidebar,
                Effect::Navigate("core.html#routing".to_string()),
            ]
        );

        assert!(c.handle(SearchEvent::ResultClicked(5)).is_empty());
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut c = controller();
        c.set_query("install");
        assert!(c.handle(SearchEvent::Key(Key::from_name("Tab"))).is_empty());
        assert_eq!(c.mode(), Mode::Results);
    }

    #[test]
    fn test_view_escapes_section_and_highlights_title() {
        let mut c = controller();
        c.handle(SearchEvent::QueryChanged("rout".to_string()));

        let view = c.view();
        assert_eq!(view.mode, Mode::Results);
        assert_eq!(view.items[0].title_html, "<mark>Rout</mark>ing");
        assert_eq!(view.items[0].section_html, "Core &amp; API");
        assert_eq!(view.active_index, None);
    }

    #[test]
    fn test_focus_shortcut() {
        let mut c = controller();

        assert_eq!(
            c.handle(SearchEvent::GlobalKey(KeyInput::plain("/"))),
            vec![Effect::PreventDefault, Effect::FocusInput]
        );

        let with_ctrl = KeyInput {
            ctrl: true,
            ..KeyInput::plain("/")
        };
        assert!(!c.is_focus_shortcut(&with_ctrl));

        let in_textarea = KeyInput {
            editable_target: true,
            ..KeyInput::plain("/")
        };
        assert!(!c.is_focus_shortcut(&in_textarea));

        assert!(!c.is_focus_shortcut(&KeyInput::plain("?")));
        assert!(!c.is_focus_shortcut(&KeyInput::plain("//")));
    }

    #[test]
    fn test_custom_shortcut() {
        let engine = SearchEngine::new(SearchIndex::default());
        let c = SearchController::with_shortcut(engine, 's');
        assert!(c.is_focus_shortcut(&KeyInput::plain("s")));
        assert!(!c.is_focus_shortcut(&KeyInput::plain("/")));
    }

    #[test]
    fn test_view_model_serialization() {
        let mut c = controller();
        c.set_query("install");
        let json = serde_json::to_string(&c.view()).unwrap();
        assert!(json.contains("\"mode\":\"results\""));
        assert!(json.contains("\"activeIndex\":-1"));
        assert!(json.contains("\"titleHtml\""));
        assert!(!json.contains("messageHtml"));

        let effect = serde_json::to_string(&Effect::Navigate("a.html".to_string())).unwrap();
        assert_eq!(effect, r#"{"type":"navigate","value":"a.html"}"#);
    }
}
