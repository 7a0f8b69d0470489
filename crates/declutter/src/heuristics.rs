//! Shared content heuristics and constant tables.
//!
//! Two separate mechanisms live here. The sanitizer matches class/id noise
//! with plain substring tokens; the locator weighs class/id hints with the
//! positive/negative regexes. They are intentionally not unified.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::dom;

/// Tags that never carry article content and are removed document-wide.
pub(crate) const NOISE_TAGS: &[&str] = &[
    "script", "link", "header", "style", "noscript", "object", "footer",
    "nav", "iframe", "br", "svg",
];

/// Substring tokens marking a `class` attribute as boilerplate.
pub(crate) const NOISE_CLASS_TOKENS: &[&str] = &[
    "comment", "sidebar", "sidenav", "footer", "footnote", "promo", "advert",
    "ads", "banner", "breadcrumb", "share", "social", "sponsor", "widget",
    "related", "popup", "cookie", "subscribe",
];

/// Substring tokens marking an `id` attribute as boilerplate.
pub(crate) const NOISE_ID_TOKENS: &[&str] = &[
    "comment", "sidebar", "footer", "footnote", "promo", "ads", "banner",
    "disqus", "share", "social", "menu", "cookie", "newsletter",
];

/// Tags that count as actual content when deciding whether a container is
/// worth keeping.
pub(crate) const BASIC_CONTENT_TAGS: &[&str] =
    &["p", "h1", "h2", "h3", "h4", "h5", "h6", "h7"];

static POSITIVE_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new("(?i)article|body|content|entry|hentry|page|pagination|post|text").unwrap()
});

static NEGATIVE_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "(?i)combx|comment|contact|foot|footer|footnote|link|media|meta|promo|related|scroll|shoutbox|sponsor|tags|widget",
    )
    .unwrap()
});

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Base content score contributed by an element's tag name.
pub(crate) fn tag_score(tag: &str) -> f64 {
    match tag {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Weight an element by its `class` and `id` attributes.
///
/// Each attribute is checked against both hint patterns independently and
/// contributes at most ±25, so the result is one of −50, −25, 0, +25, +50.
pub(crate) fn class_id_weight(element: ElementRef<'_>) -> i32 {
    let mut weight = 0;
    for attr in ["class", "id"] {
        if let Some(value) = element.value().attr(attr) {
            if POSITIVE_HINTS.is_match(value) {
                weight += 25;
            }
            if NEGATIVE_HINTS.is_match(value) {
                weight -= 25;
            }
        }
    }
    weight
}

/// Fraction of an element's text that comes from anchor elements.
///
/// The denominator is the element's text with whitespace collapsed and
/// trimmed; a zero denominator is defined as density 0.
pub(crate) fn link_density(element: ElementRef<'_>) -> f64 {
    let text: String = element.text().collect();
    let text_len = dom::collapse_whitespace(&text).trim().chars().count();
    if text_len == 0 {
        return 0.0;
    }
    let link_len: usize = element
        .select(&ANCHOR)
        .map(|a| a.text().map(|t| t.chars().count()).sum::<usize>())
        .sum();
    link_len as f64 / text_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_div(doc: &Html) -> ElementRef<'_> {
        doc.select(&Selector::parse("div").unwrap()).next().unwrap()
    }

    #[test]
    fn test_tag_score() {
        assert_eq!(tag_score("div"), 5.0);
        assert_eq!(tag_score("blockquote"), 3.0);
        assert_eq!(tag_score("ul"), -3.0);
        assert_eq!(tag_score("h2"), -5.0);
        assert_eq!(tag_score("p"), 0.0);
    }

    #[test]
    fn test_class_id_weight_positive() {
        let doc = Html::parse_document(r#"<body><div class="article">x</div></body>"#);
        assert_eq!(class_id_weight(first_div(&doc)), 25);
    }

    #[test]
    fn test_class_id_weight_negative() {
        let doc = Html::parse_document(r#"<body><div id="comments">x</div></body>"#);
        assert_eq!(class_id_weight(first_div(&doc)), -25);
    }

    #[test]
    fn test_class_id_weight_accumulates_across_attributes() {
        let doc =
            Html::parse_document(r#"<body><div class="entry" id="footer">x</div></body>"#);
        assert_eq!(class_id_weight(first_div(&doc)), 0);
    }

    #[test]
    fn test_class_id_weight_both_patterns_in_one_attribute() {
        // "article" and "comment" both live in class; contributions cancel
        let doc =
            Html::parse_document(r#"<body><div class="article comment">x</div></body>"#);
        assert_eq!(class_id_weight(first_div(&doc)), 0);
    }

    #[test]
    fn test_class_id_weight_case_insensitive() {
        let doc = Html::parse_document(r#"<body><div class="Article-Body">x</div></body>"#);
        assert_eq!(class_id_weight(first_div(&doc)), 25);
    }

    #[test]
    fn test_link_density_mixed() {
        let doc =
            Html::parse_document("<body><div><a>1234</a>567890</div></body>");
        let density = link_density(first_div(&doc));
        assert!((density - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_no_text_is_zero() {
        let doc = Html::parse_document("<body><div></div></body>");
        assert_eq!(link_density(first_div(&doc)), 0.0);
    }

    #[test]
    fn test_link_density_all_links() {
        let doc = Html::parse_document("<body><div><a>abcde</a></div></body>");
        assert!((link_density(first_div(&doc)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_monotonic_in_anchor_text() {
        // same total text, growing anchor share
        let low = Html::parse_document("<body><div><a>aa</a>bbbb</div></body>");
        let high = Html::parse_document("<body><div><a>aaaa</a>bb</div></body>");
        assert!(link_density(first_div(&low)) <= link_density(first_div(&high)));
    }
}
