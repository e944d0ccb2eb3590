use anyhow::{Context, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use log::debug;
use std::path::{Path, PathBuf};

/// Expands a glob pattern into the list of matching `.html` files under the
/// project root, sorted for deterministic processing order.
pub fn collect_html_files(project_root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // Override globs use gitignore semantics, where a slash-free pattern
    // like `*.html` matches at any depth. Shell globs are root-relative, so
    // anchor those patterns with a leading slash.
    let anchored = if pattern.contains('/') {
        pattern.to_string()
    } else {
        format!("/{pattern}")
    };

    let mut overrides = OverrideBuilder::new(project_root);
    overrides
        .add(&anchored)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?;
    let overrides = overrides
        .build()
        .with_context(|| format!("Failed to compile glob pattern: {pattern}"))?;

    let mut builder = WalkBuilder::new(project_root);
    // Selection is driven purely by the glob; ignore files must not filter
    // the candidate set the way they would in a source-tree walk.
    builder
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .overrides(overrides);

    let mut files = Vec::new();

    for result in builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();

                if path.is_file() && has_html_extension(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => {
                eprintln!("Error walking path: {err}");
            }
        }
    }

    files.sort();
    debug!("Matched {} file(s) for pattern {pattern}", files.len());

    Ok(files)
}

fn has_html_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("html")
}
