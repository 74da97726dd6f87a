//! End-to-end site builds.

use std::fs;

use phosphor_core::Config;
use phosphor_generator::{Builder, build::DEFAULT_OUTPUT_DIR};
use phosphor_search_wasm::{SearchEngine, SearchIndex};

const CONFIG: &str = r##"
site:
  title: "Phosphor Docs"
  tagline: "~/phosphor"
  logo_text: "PH"
theme:
  accent: "#ff8800"
nav:
  - group: "Start"
    items:
      - label: "Install"
        icon: "download"
        page: "index.md"
        anchor: "install"
      - label: "Components"
        page: "guide/components.md"
pages:
  - index.md
  - guide/components.md
"##;

const INDEX_PAGE: &str = r#":::hero{badge="v0.1"}
# Docs that **search themselves**
Instant results from a tiny index.
[Get started](#install){.primary}
:::

## Install

```terminal
$ cargo install phosphor
```

:::tip Prerequisites
You need a recent Rust toolchain.
:::
"#;

const COMPONENTS_PAGE: &str = r#"## Components

:::cards
::card{icon="zap" title="Fast"}
Ranks in microseconds.
::card{icon="box" color="blue" title="Small"}
One JSON file.
:::

## Pipeline

:::pipeline
Markdown -> Index -> Browser
:::

:::accordion{title="Search finds nothing"}
### Rebuild the index

Run `phosphor build` again.
:::
"#;

#[test]
fn test_build_documentation_site() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("docs.yaml"), CONFIG).unwrap();
    fs::create_dir_all(dir.path().join("pages/guide")).unwrap();
    fs::write(dir.path().join("pages/index.md"), INDEX_PAGE).unwrap();
    fs::write(dir.path().join("pages/guide/components.md"), COMPONENTS_PAGE).unwrap();

    let config = Config::load(&dir.path().join("docs.yaml")).unwrap();
    let out = dir.path().join(DEFAULT_OUTPUT_DIR);
    let stats = Builder::new(config, dir.path(), &out).build().unwrap();

    assert_eq!(stats.pages, 2);
    assert_eq!(stats.missing, 0);

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("<div class=\"hero\" id=\"top\">"));
    assert!(index.contains("<span class=\"accent\">search themselves</span>"));
    assert!(index.contains("<a href=\"#install\" class=\"hero-btn primary\">Get started</a>"));
    assert!(index.contains("<div class=\"callout tip\">"));
    assert!(index.contains("<div class=\"terminal\">"));
    assert!(index.contains("<style>:root { --accent: #ff8800; }</style>"));
    assert!(index.contains("<a href=\"guide/components.html\">"));

    let components = fs::read_to_string(out.join("guide/components.html")).unwrap();
    assert!(components.contains("<div class=\"card-icon blue\">"));
    assert!(components.contains("<span class=\"stage-num\">03</span> Browser"));
    assert!(components.contains("<details class=\"trouble-item\">"));
    assert!(components.contains("<h3 id=\"rebuild-the-index\">Rebuild the index</h3>"));
    assert!(components.contains("<a href=\"../index.html#install\">"));
    assert!(components.contains("<a href=\"#rebuild-the-index\" class=\"toc-h3\">"));

    let favicon = fs::read_to_string(out.join("assets/favicon.svg")).unwrap();
    assert!(favicon.contains("stop-color=\"#ff8800\""));
    assert!(favicon.contains(">PH</text>"));

    let json = fs::read_to_string(out.join("assets/search-index.json")).unwrap();
    let engine = SearchEngine::new(SearchIndex::from_json(&json).unwrap());
    let results = engine.search("rebuild");
    assert_eq!(results[0].entry.url, "guide/components.html#rebuild-the-index");
    assert_eq!(results[0].entry.section, "Pipeline");
}
