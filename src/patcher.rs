//! In-place `<head>` patching.
//!
//! Each tag is handled with the same replace-or-append rule: if a regex
//! finds an existing tag it is replaced in place, otherwise the new tag is
//! inserted just before `</head>`. Matching is best-effort string surgery,
//! not DOM manipulation; unusually formatted existing tags (multi-line
//! attributes and the like) may be duplicated rather than replaced.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::api::Metadata;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>.*?</title\s*>").expect("valid regex"));
static META_DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*\bname\s*=\s*["']description["'][^>]*>"#).expect("valid regex")
});
static META_KEYWORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*\bname\s*=\s*["']keywords["'][^>]*>"#).expect("valid regex")
});
static OG_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*\bproperty\s*=\s*["']og:title["'][^>]*>"#).expect("valid regex")
});
static OG_DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*\bproperty\s*=\s*["']og:description["'][^>]*>"#)
        .expect("valid regex")
});
static CANONICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<link[^>]*\brel\s*=\s*["']canonical["'][^>]*>"#).expect("valid regex")
});
static HEAD_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</head\s*>").expect("valid regex"));

/// Applies suggested metadata to an HTML document, returning the patched
/// markup. Fields absent from the suggestion leave the corresponding tag
/// untouched. A document without `</head>` cannot receive appended tags and
/// is returned with replacements only.
pub fn patch_head(html: &str, meta: &Metadata) -> String {
    let mut out = html.to_string();

    if let Some(title) = &meta.title {
        let tag = format!("<title>{}</title>", escape_html(title));
        out = upsert(&out, &TITLE_RE, &tag);
    }

    if let Some(description) = &meta.description {
        let tag = format!(r#"<meta name="description" content="{}">"#, escape_html(description));
        out = upsert(&out, &META_DESCRIPTION_RE, &tag);
    }

    if let Some(keywords) = &meta.keywords {
        let tag = format!(r#"<meta name="keywords" content="{}">"#, escape_html(keywords));
        out = upsert(&out, &META_KEYWORDS_RE, &tag);
    }

    // OG fields fall back to their plain counterparts.
    if let Some(og_title) = meta.og_title.as_ref().or(meta.title.as_ref()) {
        let tag = format!(r#"<meta property="og:title" content="{}">"#, escape_html(og_title));
        out = upsert(&out, &OG_TITLE_RE, &tag);
    }

    if let Some(og_description) = meta.og_description.as_ref().or(meta.description.as_ref()) {
        let tag = format!(
            r#"<meta property="og:description" content="{}">"#,
            escape_html(og_description)
        );
        out = upsert(&out, &OG_DESCRIPTION_RE, &tag);
    }

    // No canonical suggestion means the document keeps whatever it has.
    if let Some(canonical) = &meta.canonical {
        let tag = format!(r#"<link rel="canonical" href="{}">"#, escape_html(canonical));
        out = upsert(&out, &CANONICAL_RE, &tag);
    }

    out
}

/// Replaces the first match of `re` with `tag`, or appends `tag` before the
/// closing head tag when there is no match.
fn upsert(html: &str, re: &Regex, tag: &str) -> String {
    if re.is_match(html) {
        re.replace(html, NoExpand(tag)).into_owned()
    } else {
        append_to_head(html, tag)
    }
}

fn append_to_head(html: &str, tag: &str) -> String {
    match HEAD_CLOSE_RE.find(html) {
        Some(m) => format!("{}  {tag}\n{}", &html[..m.start()], &html[m.start()..]),
        None => html.to_string(),
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
