//! # seosuggest
//!
//! Batch tool that scans HTML files, asks a chat-completion API to suggest
//! SEO metadata (title, description, Open Graph tags, keywords, canonical
//! URL), and writes a JSON report. With apply mode enabled, the suggested
//! tags are also written back into each file's `<head>`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use seosuggest::{Config, run_seosuggest};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let root = std::env::current_dir()?;
//!     let config = Config {
//!         pattern: "**/*.html".to_string(),
//!         apply: false,
//!         overrides_path: root.join("metadata/overrides.json"),
//!         report_path: root.join("metadata/suggestions.json"),
//!         project_root: root,
//!     };
//!
//!     run_seosuggest(config).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod extractor;
pub mod filewalker;
pub mod patcher;
pub mod report;

pub use api::{Metadata, OpenAiClient, Suggestion, SuggestionSource};
pub use cli::Config;
pub use extractor::extract_text;
pub use filewalker::collect_html_files;
pub use patcher::patch_head;
pub use report::{Report, ReportEntry};

use anyhow::{Context, Result};
use log::{debug, info};

/// Runs the full pipeline against the completion API.
pub async fn run_seosuggest(config: Config) -> Result<()> {
    let source = OpenAiClient::from_env();
    run_with_source(config, &source).await
}

/// Runs the pipeline with an explicit suggestion source. Processing is
/// strictly sequential: one file and one in-flight request at a time, and
/// any fatal error aborts the run before the report is written.
pub async fn run_with_source<S: SuggestionSource>(config: Config, source: &S) -> Result<()> {
    let files = collect_html_files(&config.project_root, &config.pattern)?;

    if files.is_empty() {
        println!("No HTML files matched pattern {}", config.pattern);
        return Ok(());
    }

    let overrides = report::load_overrides(&config.overrides_path).await?;
    let mut entries = Report::new();

    for path in &files {
        let rel_path = path.strip_prefix(&config.project_root).unwrap_or(path);
        let key = rel_path.display().to_string();
        info!("Processing {key}");

        let html = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let text = extract_text(&html);
        let suggestion = source.suggest(&text).await?;

        if config.apply {
            if let Some(meta) = suggestion.fields() {
                let patched = patch_head(&html, meta);
                tokio::fs::write(path, patched)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                debug!("Applied suggested metadata to {key}");
            }
        }

        let override_entry = overrides.get(&key).cloned();
        entries.insert(
            key,
            ReportEntry {
                suggestion,
                override_entry,
            },
        );
    }

    report::write_report(&config.report_path, &entries).await
}
