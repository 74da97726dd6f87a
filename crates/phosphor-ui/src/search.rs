//! Search components for the Phosphor frontend.
//!
//! The components own no search logic. Every DOM event becomes a
//! [`SearchEvent`] for the shared [`SearchController`], and the returned
//! effects are carried out by an [`EffectHost`].

use leptos::{html, prelude::*};
use phosphor_search_wasm::{
    Effect as SearchEffect, Key, KeyInput, Mode, SearchController, SearchEvent, SearchIndex,
    ViewModel,
};
use wasm_bindgen::{JsCast, prelude::*};

/// Performs controller effects against some environment.
pub trait EffectHost {
    fn prevent_default(&mut self);
    fn scroll_into_view(&mut self, index: usize);
    fn close_sidebar(&mut self);
    fn navigate(&mut self, url: &str);
    fn blur_input(&mut self);
    fn focus_input(&mut self);
}

/// Apply effects in order.
pub fn apply_effects<H: EffectHost + ?Sized>(host: &mut H, effects: &[SearchEffect]) {
    for effect in effects {
        match effect {
            SearchEffect::PreventDefault => host.prevent_default(),
            SearchEffect::ScrollIntoView(index) => host.scroll_into_view(*index),
            SearchEffect::CloseSidebar => host.close_sidebar(),
            SearchEffect::Navigate(url) => host.navigate(url),
            SearchEffect::BlurInput => host.blur_input(),
            SearchEffect::FocusInput => host.focus_input(),
        }
    }
}

/// Whether a focused element accepts typing, so shortcuts must not fire.
pub fn is_editable(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || matches!(
            tag_name.to_ascii_uppercase().as_str(),
            "INPUT" | "TEXTAREA" | "SELECT"
        )
}

/// Whether a click is a primary-button click with no modifier held.
pub fn is_plain_click(button: i16, ctrl: bool, meta: bool, shift: bool, alt: bool) -> bool {
    button == 0 && !ctrl && !meta && !shift && !alt
}

fn plain_click(ev: &web_sys::MouseEvent) -> bool {
    is_plain_click(
        ev.button(),
        ev.ctrl_key(),
        ev.meta_key(),
        ev.shift_key(),
        ev.alt_key(),
    )
}

/// Reactive handle to one search box's controller.
#[derive(Clone, Copy)]
pub struct SearchHandle {
    controller: StoredValue<SearchController>,
    view: RwSignal<ViewModel>,
    input_ref: NodeRef<html::Input>,
    list_ref: NodeRef<html::Div>,
}

impl SearchHandle {
    pub fn new(controller: SearchController) -> Self {
        let view = RwSignal::new(controller.view());
        Self {
            controller: StoredValue::new(controller),
            view,
            input_ref: NodeRef::new(),
            list_ref: NodeRef::new(),
        }
    }

    /// Handle over a fresh controller for `index`.
    pub fn from_index(index: SearchIndex) -> Self {
        Self::new(SearchController::new(phosphor_search_wasm::SearchEngine::new(
            index,
        )))
    }

    /// Current view model.
    pub fn view(&self) -> Signal<ViewModel> {
        self.view.into()
    }

    /// Feed an event to the controller and publish the new view.
    pub fn dispatch(&self, event: SearchEvent) -> Vec<SearchEffect> {
        let mut effects = Vec::new();
        self.controller
            .update_value(|controller| effects = controller.handle(event));
        self.view
            .set(self.controller.with_value(|controller| controller.view()));
        effects
    }

    /// Dispatch and carry out the effects in the browser.
    pub fn run(
        &self,
        event: SearchEvent,
        dom_event: &web_sys::Event,
        sidebar_open: Option<RwSignal<bool>>,
    ) {
        let effects = self.dispatch(event);
        let mut host = BrowserHost {
            handle: *self,
            event: Some(dom_event),
            sidebar_open,
        };
        apply_effects(&mut host, &effects);
    }
}

/// [`EffectHost`] backed by the live DOM.
pub struct BrowserHost<'a> {
    handle: SearchHandle,
    event: Option<&'a web_sys::Event>,
    sidebar_open: Option<RwSignal<bool>>,
}

impl EffectHost for BrowserHost<'_> {
    fn prevent_default(&mut self) {
        if let Some(event) = self.event {
            event.prevent_default();
        }
    }

    fn scroll_into_view(&mut self, index: usize) {
        let Some(list) = self.handle.list_ref.get_untracked() else {
            return;
        };
        let Ok(items) = list.query_selector_all(".search-result") else {
            return;
        };
        let Some(item) = items
            .item(index as u32)
            .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };

        let options = web_sys::ScrollIntoViewOptions::new();
        options.set_block(web_sys::ScrollLogicalPosition::Nearest);
        item.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn close_sidebar(&mut self) {
        if let Some(open) = self.sidebar_open {
            open.set(false);
        }
    }

    fn navigate(&mut self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            tracing::warn!(url, error = ?e, "Navigation failed");
        }
    }

    fn blur_input(&mut self) {
        if let Some(input) = self.handle.input_ref.get_untracked() {
            let _ = input.blur();
        }
    }

    fn focus_input(&mut self) {
        if let Some(input) = self.handle.input_ref.get_untracked() {
            let _ = input.focus();
        }
    }
}

/// Search input with its result dropdown.
#[component]
pub fn SearchBox(
    /// Controller handle shared with [`SearchShortcut`].
    handle: SearchHandle,
    /// Mobile sidebar state, closed before navigating.
    #[prop(optional)]
    sidebar_open: Option<RwSignal<bool>>,
    /// Placeholder text for the input.
    #[prop(default = "Search docs...".to_string())]
    placeholder: String,
) -> impl IntoView {
    let wrap_ref = NodeRef::<html::Div>::new();

    let on_input = move |ev: web_sys::Event| {
        let query = event_target_value(&ev);
        handle.run(SearchEvent::QueryChanged(query), &ev, sidebar_open);
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let key = Key::from_name(&ev.key());
        if key != Key::Other {
            handle.run(SearchEvent::Key(key), &ev, sidebar_open);
        }
    };

    // Clicks anywhere outside the search region close the results
    Effect::new(move |_| {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let handler =
            Closure::<dyn Fn(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
                let target = ev.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
                let inside = wrap_ref
                    .get_untracked()
                    .is_some_and(|wrap| wrap.contains(target.as_ref()));
                if !inside {
                    handle.run(SearchEvent::PointerOutside, &ev, sidebar_open);
                }
            });

        let _ =
            document.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref());

        // Leak the closure to keep it alive
        handler.forget();
    });

    view! {
      <div class="sidebar-search" node_ref=wrap_ref>
        <input
          node_ref=handle.input_ref
          type="text"
          class="search-input"
          placeholder=placeholder
          autocomplete="off"
          spellcheck="false"
          aria-label="Search documentation"
          on:input=on_input
          on:keydown=on_keydown
        />
        <SearchResults handle=handle sidebar_open=sidebar_open />
      </div>
    }
}

/// Rendered result list, driven by the controller's view model.
#[component]
pub fn SearchResults(
    /// Controller handle.
    handle: SearchHandle,
    /// Mobile sidebar state.
    sidebar_open: Option<RwSignal<bool>>,
) -> impl IntoView {
    let model = handle.view();

    view! {
      <div
        class="search-results"
        class:visible=move || model.with(|m| m.mode != Mode::Idle)
        node_ref=handle.list_ref
      >
        {move || {
          let current = model.get();
          match current.mode {
            Mode::Idle => ().into_any(),
            Mode::NoResults => {
              view! {
                <div
                  class="search-no-results"
                  inner_html=current.message_html.unwrap_or_default()
                ></div>
              }
                .into_any()
            }
            Mode::Results => {
              current
                .items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                  let on_click = move |ev: web_sys::MouseEvent| {
                    // Modified and non-primary clicks keep the browser's new-tab behavior
                    if !plain_click(&ev) {
                      return;
                    }
                    ev.prevent_default();
                    handle.run(SearchEvent::ResultClicked(i), &ev, sidebar_open);
                  };
                  view! {
                    <a class="search-result" class:active=item.active href=item.url on:click=on_click>
                      <div class="search-result-title" inner_html=item.title_html></div>
                      <div class="search-result-section" inner_html=item.section_html></div>
                    </a>
                  }
                })
                .collect_view()
                .into_any()
            }
          }
        }}
      </div>
    }
}

/// Global shortcut that focuses the search input.
///
/// Fires on the controller's shortcut key (`/` by default) when no modifier
/// is held and focus is not in an editable control.
#[component]
#[allow(clippy::unused_unit)]
pub fn SearchShortcut(
    /// Controller handle.
    handle: SearchHandle,
) -> impl IntoView {
    Effect::new(move |_| {
        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
                let editable_target = ev
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .is_some_and(|el| is_editable(&el.tag_name(), el.is_content_editable()));

                let input = KeyInput {
                    key: ev.key(),
                    ctrl: ev.ctrl_key(),
                    meta: ev.meta_key(),
                    alt: ev.alt_key(),
                    editable_target,
                };
                handle.run(SearchEvent::GlobalKey(input), &ev, None);
            });

        let Some(window) = web_sys::window() else {
            return;
        };
        let _ =
            window.add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref());

        // Leak the closure to keep it alive
        handler.forget();
    });
}
