//! Search command - queries a built index from the terminal

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use phosphor_search::read_index;
use phosphor_search_wasm::{Mode, SearchController, SearchEngine};

/// Run the search command.
///
/// Ranks the index exactly as the browser does and prints one block per
/// match.
pub fn run(index_path: &Path, query: &str, plain: bool) -> Result<()> {
    tracing::info!(?index_path, query, "Searching index");

    let index = read_index(index_path)
        .wrap_err_with(|| format!("Failed to load search index {}", index_path.display()))?;

    let mut controller = SearchController::new(SearchEngine::new(index));
    controller.set_query(query);

    for line in render(&controller, plain) {
        println!("{line}");
    }

    Ok(())
}

/// Terminal lines for the controller's current state.
pub fn render(controller: &SearchController, plain: bool) -> Vec<String> {
    match controller.mode() {
        Mode::Idle => vec!["Enter at least one word of two or more characters".to_string()],
        Mode::NoResults => {
            vec![format!("No results for \"{}\"", controller.query().trim())]
        }
        Mode::Results => {
            let view = controller.view();
            controller
                .results()
                .iter()
                .zip(view.items)
                .enumerate()
                .flat_map(|(rank, (matched, item))| {
                    let title = if plain {
                        matched.entry.title.clone()
                    } else {
                        item.title_html
                    };
                    let section = if plain {
                        matched.entry.section.clone()
                    } else {
                        item.section_html
                    };

                    [
                        format!("{:>2}. [{:>3}] {title}  ({section})", rank + 1, matched.score),
                        format!("             {}", matched.entry.url),
                    ]
                })
                .collect()
        }
    }
}
