//! Init command - scaffold a new documentation project

use std::{fs, path::Path, process::Command};

use color_eyre::eyre::{Result, WrapErr};

use super::{CONFIG_FILES, PAGES_DIR};

/// Example pages written into a new project.
const EXAMPLE_PAGES: [(&str, &str); 2] = [
    ("index.md", include_str!("../../templates/pages/index.md")),
    ("guide.md", include_str!("../../templates/pages/guide.md")),
];

/// Site details written into `docs.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub title: String,
    pub tagline: String,
    pub logo_text: String,
    pub github: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            title: "My Project Docs".to_string(),
            tagline: "~/my-project".to_string(),
            logo_text: "MP".to_string(),
            github: String::new(),
        }
    }
}

impl ProjectInfo {
    /// Derive site details from a repository name.
    pub fn from_repo(owner: &str, repo: &str) -> Self {
        let logo_text: String = repo
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .take(2)
            .collect();

        Self {
            title: title_case(&repo.replace(['-', '_'], " ")),
            tagline: format!("~/{repo}"),
            logo_text: logo_text.to_uppercase(),
            github: format!("https://github.com/{owner}/{repo}"),
        }
    }
}

/// Files created and skipped by an init run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Run the init command.
///
/// Creates `docs.yaml` and example pages in `project_dir`, never overwriting
/// existing files. Site details are filled in from the `origin` remote when
/// the directory is inside a git repository.
pub fn run(project_dir: &Path) -> Result<InitReport> {
    tracing::info!(?project_dir, "Initializing project");

    let pages_dir = project_dir.join(PAGES_DIR);
    fs::create_dir_all(&pages_dir)
        .wrap_err_with(|| format!("Cannot create {}", pages_dir.display()))?;

    let info = detect_git_info(project_dir);
    let mut report = InitReport::default();

    let existing_config = CONFIG_FILES
        .iter()
        .find(|name| project_dir.join(name).exists());
    match existing_config {
        Some(name) => {
            println!("  Skipped: {name} (already exists)");
            report.skipped.push(name.to_string());
        }
        None => {
            let config = docs_yaml(info.as_ref().unwrap_or(&ProjectInfo::default()));
            fs::write(project_dir.join(CONFIG_FILES[0]), config)
                .wrap_err("Failed to write docs.yaml")?;
            match &info {
                Some(info) => println!(
                    "  Created: {} (auto-detected from git: {})",
                    CONFIG_FILES[0], info.title
                ),
                None => println!("  Created: {}", CONFIG_FILES[0]),
            }
            report.created.push(CONFIG_FILES[0].to_string());
        }
    }

    for (name, body) in EXAMPLE_PAGES {
        let path = pages_dir.join(name);
        let display = format!("{PAGES_DIR}/{name}");
        if path.exists() {
            println!("  Skipped: {display} (already exists)");
            report.skipped.push(display);
        } else {
            fs::write(&path, body).wrap_err_with(|| format!("Failed to write {display}"))?;
            println!("  Created: {display}");
            report.created.push(display);
        }
    }

    println!();
    println!("✓ Docs project initialized in {}", project_dir.display());
    println!("Next steps:");
    println!("  1. Edit docs.yaml to configure your site");
    println!("  2. Edit pages/*.md to write your content");
    println!("  3. Run: phosphor build");

    Ok(report)
}

/// Site details from `git remote get-url origin`, if available.
fn detect_git_info(dir: &Path) -> Option<ProjectInfo> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(dir)
        .output()
        .ok()
        .filter(|out| out.status.success())?;

    let url = String::from_utf8_lossy(&output.stdout);
    let (owner, repo) = parse_remote(url.trim())?;
    tracing::debug!(owner, repo, "Detected git remote");
    Some(ProjectInfo::from_repo(owner, repo))
}

/// Owner and repository name from a remote URL.
///
/// Accepts `https://host/owner/repo(.git)` and `git@host:owner/repo(.git)`.
pub fn parse_remote(url: &str) -> Option<(&str, &str)> {
    let url = url.trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let (rest, repo) = url.rsplit_once('/')?;
    let owner = rest.rsplit(['/', ':']).next()?;

    (!owner.is_empty() && !repo.is_empty()).then_some((owner, repo))
}

/// Python-style title case: first letter of each word upper, the rest lower.
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn docs_yaml(info: &ProjectInfo) -> String {
    format!(
        r##"site:
  title: {title}
  tagline: {tagline}
  logo_text: {logo_text}
  github: {github}

theme:
  accent: "#22d3a7"
  accent_dim: "#1a9e7e"
  bg_deep: "#080c14"

nav:
  - group: "Getting Started"
    items:
      - label: "Installation"
        icon: "download"
        page: "index.md"
        anchor: "installation"
      - label: "Features"
        icon: "sparkles"
        page: "index.md"
        anchor: "features"
  - group: "Guide"
    items:
      - label: "Configuration"
        icon: "settings"
        page: "guide.md"
        anchor: "configuration"
      - label: "Commands"
        icon: "terminal"
        page: "guide.md"
        anchor: "commands"
      - label: "Troubleshooting"
        icon: "life-buoy"
        page: "guide.md"
        anchor: "troubleshooting"

pages:
  - index.md
  - guide.md

search:
  enabled: true
"##,
        title = yaml_quote(&info.title),
        tagline = yaml_quote(&info.tagline),
        logo_text = yaml_quote(&info.logo_text),
        github = yaml_quote(&info.github),
    )
}
