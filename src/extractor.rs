//! Visible-text extraction for prompt building.
//!
//! The output is intentionally rough: the goal is a compact plain-text
//! rendering of the page for the completion prompt, not faithful HTML
//! processing. Entities are left as-is.

use once_cell::sync::Lazy;
use regex::Regex;

/// Extracted text is capped at this many characters to keep the prompt small.
/// Anything beyond the cap is invisible to the suggestion step.
pub const MAX_TEXT_LEN: usize = 8000;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static STRAY_ANGLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strips an HTML document down to its visible text.
///
/// Script and style blocks are removed wholesale (including their contents),
/// remaining tags become single spaces, whitespace runs collapse to one
/// space, and the result is trimmed and truncated to [`MAX_TEXT_LEN`]
/// characters.
pub fn extract_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");
    // Unpaired brackets in visible text (`a > b`) are not tags but must not
    // survive either.
    let without_brackets = STRAY_ANGLE_RE.replace_all(&without_tags, " ");
    let collapsed = WHITESPACE_RE.replace_all(&without_brackets, " ");
    let trimmed = collapsed.trim();

    if trimmed.chars().count() > MAX_TEXT_LEN {
        trimmed.chars().take(MAX_TEXT_LEN).collect()
    } else {
        trimmed.to_string()
    }
}
