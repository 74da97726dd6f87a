//! Ranking behaviour over realistic documentation indexes.

use phosphor_search_wasm::{
    Entry, Key, MAX_RESULTS, Mode, SearchController, SearchEngine, SearchIndex, score,
};

fn docs_index() -> SearchIndex {
    SearchIndex::new(vec![
        Entry::new(
            "Quickstart Guide",
            "setup install",
            "Getting Started",
            "index.html#quickstart-guide",
        ),
        Entry::new(
            "Installation",
            "pip install package requirements",
            "Getting Started",
            "index.html#installation",
        ),
        Entry::new(
            "Configuration",
            "docs yaml site title nav pages",
            "Reference",
            "reference.html#configuration",
        ),
        Entry::new(
            "Theme Colors",
            "accent background palette",
            "Configuration",
            "reference.html#theme-colors",
        ),
        Entry::new(
            "Search",
            "keyboard shortcut slash results",
            "Features",
            "features.html#search",
        ),
        Entry::new(
            "Search Index",
            "build json keywords",
            "Search",
            "features.html#search-index",
        ),
    ])
}

#[test]
fn test_quickstart_prefix_score() {
    let index = SearchIndex::new(vec![Entry::new(
        "Quickstart Guide",
        "setup install",
        "Getting Started",
        "",
    )]);

    let results = score(&index, "quick");
    assert_eq!(results.len(), 1);
    assert!(results[0].score >= 80);
}

#[test]
fn test_quickstart_exact_score() {
    let index = SearchIndex::new(vec![Entry::new(
        "Quickstart Guide",
        "setup install",
        "Getting Started",
        "",
    )]);

    let results = score(&index, "quickstart guide");
    assert_eq!(results.len(), 1);
    assert!(results[0].score >= 100);
}

#[test]
fn test_title_match_outranks_keyword_match() {
    let index = SearchIndex::new(vec![
        Entry::new("Auth", "token login", "", "auth.html"),
        Entry::new("Login Flow", "", "", "login.html"),
    ]);

    let results = score(&index, "login");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].entry.title, "Login Flow");
    assert_eq!(results[1].entry.title, "Auth");
    assert!(results[0].score >= results[1].score);
}

#[test]
fn test_single_character_query_matches_nothing() {
    let index = SearchIndex::new(vec![Entry::new("a", "a", "a", "a.html")]);
    assert!(score(&index, "a").is_empty());
}

#[test]
fn test_whitespace_queries_match_nothing() {
    let index = docs_index();
    for query in ["", " ", "\t", "\n  \t"] {
        assert!(score(&index, query).is_empty(), "query {query:?}");
    }
}

#[test]
fn test_scores_descend_and_ties_keep_order() {
    let index = docs_index();

    for query in ["search", "config", "getting started", "install", "theme"] {
        let results = score(&index, query);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score, "query {query:?}");

            if pair[0].score == pair[1].score {
                let pos = |url: &str| {
                    index
                        .entries()
                        .iter()
                        .position(|e| e.url == url)
                        .unwrap()
                };
                assert!(pos(&pair[0].entry.url) < pos(&pair[1].entry.url));
            }
        }
        assert!(results.iter().all(|m| m.score >= 1));
    }
}

#[test]
fn test_result_cap_on_large_index() {
    let entries = (0..100)
        .map(|i| {
            Entry::new(
                format!("Page {i}"),
                "common",
                "Section",
                format!("p{i}.html"),
            )
        })
        .collect();
    let index = SearchIndex::new(entries);

    let results = score(&index, "common page");
    assert_eq!(results.len(), MAX_RESULTS);
    // All tie, so the first eight in index order win
    assert_eq!(results[0].entry.url, "p0.html");
    assert_eq!(results[7].entry.url, "p7.html");
}

#[test]
fn test_search_is_idempotent() {
    let engine = SearchEngine::new(docs_index());
    assert_eq!(engine.search("search index"), engine.search("search index"));
}

#[test]
fn test_multi_word_bonus_ranks_complete_match_first() {
    let results = score(&docs_index(), "search keywords");
    assert_eq!(results[0].entry.title, "Search Index");
}

#[test]
fn test_engines_share_one_index() {
    let index = std::sync::Arc::new(docs_index());
    let a = SearchEngine::new(index.clone());
    let b = SearchEngine::new(index);
    assert_eq!(a.search("theme"), b.search("theme"));
}

#[test]
fn test_controller_round_trip_over_index() {
    let mut controller = SearchController::new(SearchEngine::new(docs_index()));

    controller.set_query("search");
    assert_eq!(controller.mode(), Mode::Results);
    let count = controller.results().len();
    assert!(count >= 2);

    for _ in 0..count {
        controller.key_down(Key::ArrowDown);
    }
    assert_eq!(controller.active_index(), Some(count - 1));
    controller.key_down(Key::ArrowDown);
    assert_eq!(controller.active_index(), Some(0));

    controller.key_down(Key::Escape);
    assert_eq!(controller.mode(), Mode::Idle);
    assert_eq!(controller.active_index(), None);
}
