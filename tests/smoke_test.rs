use anyhow::Result;
use seosuggest::api::parse_suggestion;
use seosuggest::{Config, Suggestion, SuggestionSource, run_with_source};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Canned suggestion source: pages mentioning "beta" get a non-JSON model
/// reply, everything else gets a full suggestion.
struct StubSource;

impl SuggestionSource for StubSource {
    async fn suggest(&self, text: &str) -> Result<Suggestion> {
        if text.contains("beta") {
            Ok(parse_suggestion("I'm sorry, here is some prose instead."))
        } else {
            Ok(parse_suggestion(
                r#"{
                    "title": "Alpha Title",
                    "description": "Alpha description.",
                    "ogTitle": "Alpha OG",
                    "ogDescription": "Alpha OG description.",
                    "keywords": "alpha, example",
                    "canonical": "https://example.com/alpha"
                }"#,
            ))
        }
    }
}

/// Suggestion source that always fails, as a non-2xx API response would.
struct FailingSource;

impl SuggestionSource for FailingSource {
    async fn suggest(&self, _text: &str) -> Result<Suggestion> {
        anyhow::bail!("Completion request failed with status 500: upstream error")
    }
}

fn test_config(project_root: &Path, apply: bool) -> Config {
    Config {
        pattern: "**/*.html".to_string(),
        apply,
        project_root: project_root.to_path_buf(),
        overrides_path: project_root.join("metadata/overrides.json"),
        report_path: project_root.join("metadata/suggestions.json"),
    }
}

fn write_page(dir: &Path, name: &str, body_word: &str) -> PathBuf {
    let path = dir.join(name);
    let html = format!(
        "<html><head>\n<title>Old</title>\n</head><body><p>Page about {body_word}.</p></body></html>"
    );
    fs::write(&path, html).unwrap();
    path
}

#[tokio::test]
async fn apply_patches_good_files_and_skips_invalid_ones() -> Result<()> {
    let dir = tempdir()?;
    let file_a = write_page(dir.path(), "alpha.html", "alpha");
    let file_b = write_page(dir.path(), "beta.html", "beta");
    let original_b = fs::read(&file_b)?;

    run_with_source(test_config(dir.path(), true), &StubSource).await?;

    // File A: title replaced exactly once, new tags present.
    let patched = fs::read_to_string(&file_a)?;
    assert_eq!(patched.matches("<title>").count(), 1);
    assert!(patched.contains("<title>Alpha Title</title>"));
    assert!(patched.contains(r#"<meta name="description" content="Alpha description.">"#));
    assert!(patched.contains(r#"<meta property="og:title" content="Alpha OG">"#));
    assert!(patched.contains(r#"<link rel="canonical" href="https://example.com/alpha">"#));

    // File B: the model reply was not JSON, so the file is untouched.
    assert_eq!(fs::read(&file_b)?, original_b);

    // Report: two entries, B carries the error sentinel.
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("metadata/suggestions.json"))?)?;
    let entries = report.as_object().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        report["beta.html"]["suggestion"]["error"],
        "Invalid JSON from model"
    );
    assert_eq!(report["alpha.html"]["suggestion"]["title"], "Alpha Title");

    Ok(())
}

#[tokio::test]
async fn report_only_mode_leaves_files_untouched() -> Result<()> {
    let dir = tempdir()?;
    let file_a = write_page(dir.path(), "alpha.html", "alpha");
    let original = fs::read(&file_a)?;

    run_with_source(test_config(dir.path(), false), &StubSource).await?;

    assert_eq!(fs::read(&file_a)?, original);
    assert!(dir.path().join("metadata/suggestions.json").exists());

    Ok(())
}

#[tokio::test]
async fn zero_matches_exits_cleanly_without_a_report() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.txt"), "no html here")?;

    run_with_source(test_config(dir.path(), false), &StubSource).await?;

    assert!(!dir.path().join("metadata/suggestions.json").exists());

    Ok(())
}

#[tokio::test]
async fn api_failure_aborts_without_a_partial_report() {
    let dir = tempdir().unwrap();
    write_page(dir.path(), "alpha.html", "alpha");
    write_page(dir.path(), "beta.html", "beta");

    let result = run_with_source(test_config(dir.path(), false), &FailingSource).await;

    assert!(result.is_err());
    assert!(!dir.path().join("metadata/suggestions.json").exists());
}

#[tokio::test]
async fn overrides_are_attached_but_never_applied() -> Result<()> {
    let dir = tempdir()?;
    let file_a = write_page(dir.path(), "alpha.html", "alpha");
    fs::create_dir_all(dir.path().join("metadata"))?;
    fs::write(
        dir.path().join("metadata/overrides.json"),
        r#"{"alpha.html": {"title": "Curated Title"}}"#,
    )?;

    run_with_source(test_config(dir.path(), true), &StubSource).await?;

    // The override rides along in the report.
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("metadata/suggestions.json"))?)?;
    assert_eq!(report["alpha.html"]["override"]["title"], "Curated Title");
    assert_eq!(report["alpha.html"]["suggestion"]["title"], "Alpha Title");

    // The applied file uses the suggestion, not the override.
    let patched = fs::read_to_string(&file_a)?;
    assert!(patched.contains("<title>Alpha Title</title>"));
    assert!(!patched.contains("Curated Title"));

    Ok(())
}

#[tokio::test]
async fn glob_pattern_limits_the_file_set() -> Result<()> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("blog"))?;
    write_page(dir.path(), "index.html", "alpha");
    write_page(&dir.path().join("blog"), "post.html", "alpha");

    let mut config = test_config(dir.path(), false);
    config.pattern = "blog/*.html".to_string();

    run_with_source(config, &StubSource).await?;

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("metadata/suggestions.json"))?)?;
    let entries = report.as_object().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.contains_key("blog/post.html"));

    Ok(())
}
