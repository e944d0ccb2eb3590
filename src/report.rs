use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::api::Suggestion;

/// One report entry: the generated suggestion plus, for reference, any
/// manually curated override for the same file. Overrides are never merged
/// into the applied output.
#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub suggestion: Suggestion,
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_entry: Option<Value>,
}

/// Full run output, keyed by project-root-relative file path. A `BTreeMap`
/// keeps report ordering stable across runs.
pub type Report = BTreeMap<String, ReportEntry>;

/// Loads the overrides mapping. A missing file is an empty mapping; a file
/// that exists but cannot be read or parsed is a fatal error.
pub async fn load_overrides(path: &Path) -> Result<HashMap<String, Value>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("No overrides file at {}", path.display());
            return Ok(HashMap::new());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read overrides file: {}", path.display()));
        }
    };

    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse overrides file: {}", path.display()))
}

/// Serializes the report as indented JSON, creating parent directories as
/// needed and overwriting any previous report.
pub async fn write_report(path: &Path, report: &Report) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report).context("Failed to serialize the report")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}
