//! Document metadata reads: title, description, primary heading.
//!
//! Runs before any mutation and never has side effects; missing pieces
//! degrade to `None` or the empty string.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static BODY_H1: Lazy<Selector> = Lazy::new(|| Selector::parse("body h1").unwrap());

#[derive(Debug, Clone, Default)]
pub(crate) struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub h1: String,
}

pub(crate) fn read(doc: &Html, use_first_h1: bool) -> Metadata {
    let title = doc
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>());
    let description = doc
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string);
    Metadata {
        title,
        description,
        h1: primary_heading(doc, use_first_h1),
    }
}

/// Resolve the document's primary heading.
///
/// A single `<h1>` speaks for itself. With several the document is
/// ambiguous: `use_first_h1` takes the first one with real text, otherwise
/// no heading is chosen at all.
fn primary_heading(doc: &Html, use_first_h1: bool) -> String {
    let headings: Vec<String> = doc
        .select(&BODY_H1)
        .map(|el| el.text().collect::<String>())
        .collect();
    match headings.len() {
        0 => String::new(),
        1 => headings[0].trim().to_string(),
        _ if use_first_h1 => headings
            .iter()
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_default(),
        _ => String::new(),
    }
}
