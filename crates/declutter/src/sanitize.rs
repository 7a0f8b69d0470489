//! Tree sanitation: strips structurally-known noise ahead of content
//! location. Every pass is infallible; absence of matches is a no-op, and a
//! second run over sanitized output removes nothing.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::dom;
use crate::heuristics::{self, NOISE_CLASS_TOKENS, NOISE_ID_TOKENS, NOISE_TAGS};
use crate::service::DeclutterOptions;

static NOISE_TAG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&NOISE_TAGS.join(", ")).unwrap());
static FORM: Lazy<Selector> = Lazy::new(|| Selector::parse("form").unwrap());
static HEADINGS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

pub(crate) fn scrub(doc: &mut Html, options: &DeclutterOptions) {
    let mut removed = remove_noise_tags(doc, options);
    removed += remove_noise_class_id(doc);
    removed += remove_comments(doc);
    if options.remove_headers_without_text {
        removed += remove_decorative_headings(doc);
    }
    debug!(removed, "sanitized document");
}

/// Remove the fixed structural denylist, plus `<form>` and any caller tags
/// when configured. Every tag is removed document-wide.
fn remove_noise_tags(doc: &mut Html, options: &DeclutterOptions) -> usize {
    let mut ids = dom::select_ids(doc, &NOISE_TAG_SELECTOR);
    if options.remove_form {
        ids.extend(dom::select_ids(doc, &FORM));
    }
    for tag in parse_tag_list(&options.remove_tags) {
        if let Ok(selector) = Selector::parse(&tag) {
            ids.extend(dom::select_ids(doc, &selector));
        }
    }
    dom::detach_all(doc, &ids)
}

/// Split a caller-supplied tag list on commas and newlines.
fn parse_tag_list(list: &str) -> Vec<String> {
    list.split([',', '\n'])
        .map(|tag| tag.trim().to_ascii_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Remove elements whose `class` or `id` contains a noise token.
///
/// `html` and `body` are exempt so a noisy attribute on the document shell
/// cannot drop the whole page.
fn remove_noise_class_id(doc: &mut Html) -> usize {
    let mut ids = Vec::new();
    for node in doc.tree.root().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if matches!(element.name(), "html" | "body") {
            continue;
        }
        let class_hit = element
            .attr("class")
            .is_some_and(|value| contains_token(value, NOISE_CLASS_TOKENS));
        let id_hit = element
            .attr("id")
            .is_some_and(|value| contains_token(value, NOISE_ID_TOKENS));
        if class_hit || id_hit {
            ids.push(node.id());
        }
    }
    dom::detach_all(doc, &ids)
}

fn contains_token(value: &str, tokens: &[&str]) -> bool {
    let value = value.to_ascii_lowercase();
    tokens.iter().any(|token| value.contains(token))
}

fn remove_comments(doc: &mut Html) -> usize {
    let ids = dom::comment_ids(doc);
    dom::detach_all(doc, &ids)
}

/// Remove headings that look decorative or navigational: a negative
/// class/id weight, or more than a third of their text inside anchors.
fn remove_decorative_headings(doc: &mut Html) -> usize {
    let ids: Vec<_> = doc
        .select(&HEADINGS)
        .filter(|heading| {
            heuristics::class_id_weight(*heading) < 0
                || heuristics::link_density(*heading) > 0.33
        })
        .map(|heading| heading.id())
        .collect();
    dom::detach_all(doc, &ids)
}
