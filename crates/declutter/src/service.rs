//! DeclutterService - the main entry point for content extraction.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom;
use crate::locate;
use crate::metadata;
use crate::postprocess::{self, Heading, Image, Link};
use crate::sanitize;
use crate::{DeclutterError, Result};

/// Output form of the extracted content body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Inner markup of the content subtree, unchanged
    #[default]
    Markup,
    /// Paragraph text only
    Text,
    /// Markup converted to markdown
    Markdown,
}

/// Options for DeclutterService
#[derive(Debug, Clone)]
pub struct DeclutterOptions {
    /// With several `<h1>`s, take the first one with real text instead of
    /// treating the document as ambiguous
    pub use_first_h1: bool,

    /// Drop a singular `<h1>` from the content body
    pub remove_h1_from_content: bool,

    /// Drop headings that look decorative or navigational
    pub remove_headers_without_text: bool,

    /// Strip all images document-wide after recording them
    pub remove_images: bool,

    /// Strip figure captions; only effective together with `remove_images`
    pub remove_figcaptions: bool,

    /// Substitute anchors with their bare text after recording them
    pub replace_links: bool,

    /// Treat `<form>` as a noise tag
    pub remove_form: bool,

    /// Drop `<div>`s whose direct children hold no basic content tag
    pub remove_empty_tag: bool,

    /// Extra tags to remove document-wide, comma or newline separated
    pub remove_tags: String,

    /// Selector override for the main-section search
    pub html_selector: Option<String>,
}

impl Default for DeclutterOptions {
    fn default() -> Self {
        Self {
            use_first_h1: false,
            remove_h1_from_content: false,
            remove_headers_without_text: false,
            remove_images: false,
            remove_figcaptions: false,
            replace_links: false,
            remove_form: false,
            remove_empty_tag: false,
            remove_tags: String::new(),
            html_selector: None,
        }
    }
}

/// Structured data extracted from one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Text of the first `<title>`, if any
    pub title: Option<String>,

    /// Content of `<meta name="description">`, if any
    pub description: Option<String>,

    /// The document's primary heading, empty when none could be chosen
    pub h1: String,

    /// Every image in the document
    pub images: Vec<Image>,

    /// Every link in the content subtree
    pub links: Vec<Link>,

    /// Every sub-heading in the content subtree with real text
    pub headings: Vec<Heading>,

    /// The content body, rendered per the requested output format
    pub content: String,
}

/// The main service for extracting article content from HTML
pub struct DeclutterService {
    options: DeclutterOptions,
}

impl DeclutterService {
    /// Create a new DeclutterService with default options
    pub fn new() -> Self {
        Self {
            options: DeclutterOptions::default(),
        }
    }

    /// Create a DeclutterService with custom options
    pub fn with_options(options: DeclutterOptions) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &DeclutterOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut DeclutterOptions {
        &mut self.options
    }

    /// Extract the main content from an HTML document
    pub fn extract(&self, html: &str, format: OutputFormat) -> Result<Extraction> {
        let mut document = Html::parse_document(html);
        self.extract_document(&mut document, format)
    }

    /// Extract from an already parsed document, mutating it in place
    pub fn extract_document(
        &self,
        document: &mut Html,
        format: OutputFormat,
    ) -> Result<Extraction> {
        let meta = metadata::read(document, self.options.use_first_h1);
        sanitize::scrub(document, &self.options);
        let root = locate::main_section(document, self.options.html_selector.as_deref())?;
        let harvest = postprocess::run(document, root, &self.options);

        let markup = dom::inner_markup(document, root);
        if markup.trim().is_empty() {
            return Err(DeclutterError::ContentNotFound);
        }
        let content = match format {
            OutputFormat::Markup => markup,
            OutputFormat::Text => paragraph_text(document, root),
            OutputFormat::Markdown => html2md::parse_html(&markdown_input(document, root, markup)),
        };
        debug!(chars = content.chars().count(), "extraction complete");

        Ok(Extraction {
            title: meta.title,
            description: meta.description,
            h1: meta.h1,
            images: harvest.images,
            links: harvest.links,
            headings: harvest.headings,
            content,
        })
    }
}

impl Default for DeclutterService {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the main content from an HTML document with explicit options
pub fn extract(
    html: &str,
    format: OutputFormat,
    options: &DeclutterOptions,
) -> Result<Extraction> {
    DeclutterService::with_options(options.clone()).extract(html, format)
}

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Trimmed text of every paragraph in the subtree, concatenated in document
/// order with no separator.
fn paragraph_text(document: &Html, root: NodeId) -> String {
    let Some(root_el) = dom::element(document, root) else {
        return String::new();
    };
    let mut out = String::new();
    if root_el.value().name() == "p" {
        let text: String = root_el.text().collect();
        out.push_str(text.trim());
    }
    for paragraph in root_el.select(&PARAGRAPH) {
        let text: String = paragraph.text().collect();
        out.push_str(text.trim());
    }
    out.trim().to_string()
}

/// Markdown conversion normally gets the subtree's inner markup. A bare
/// table is the exception: without its `<table>` wrapper the converter
/// cannot recognize the rows, so the outer markup goes instead.
fn markdown_input(document: &Html, root: NodeId, markup: String) -> String {
    match dom::element(document, root) {
        Some(el) if el.value().name() == "table" => dom::outer_markup(document, root),
        _ => markup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_scenario_markup_passthrough() {
        let service = DeclutterService::new();
        let html = "<body><article><p>A short line with, one comma, repeated enough to exceed twenty five characters easily.</p></article></body>";
        let extraction = service.extract(html, OutputFormat::Markup).unwrap();
        assert_eq!(
            extraction.content,
            "<p>A short line with, one comma, repeated enough to exceed twenty five characters easily.</p>"
        );
        assert!(extraction.headings.is_empty());
        assert!(extraction.links.is_empty());
        assert!(extraction.images.is_empty());
    }

    #[test]
    fn test_sidebar_scenario_scoring_fallback() {
        let service = DeclutterService::new();
        let html = r#"<body>
            <div class="sidebar"><p>Navigation junk with plenty of words in it to look real.</p></div>
            <div><p>The main story continues here with enough length to be scored properly, and it keeps going for a while longer so the density bonus kicks in as well.</p></div>
            </body>"#;
        let extraction = service.extract(html, OutputFormat::Markup).unwrap();
        assert!(extraction.content.contains("The main story"));
        assert!(!extraction.content.contains("Navigation junk"));
    }

    #[test]
    fn test_markdown_table_scenario() {
        let service = DeclutterService::new();
        let html = "<body><table><tr><td>H</td></tr><tr><td>1</td></tr></table></body>";
        let extraction = service.extract(html, OutputFormat::Markdown).unwrap();
        assert!(extraction.content.contains('|'));
        let header = extraction.content.find('H').unwrap();
        let cell = extraction.content.find('1').unwrap();
        assert!(header < cell);
    }

    #[test]
    fn test_single_h1_metadata_and_removal() {
        let options = DeclutterOptions {
            remove_h1_from_content: true,
            ..Default::default()
        };
        let html = "<body><article><h1>The Headline</h1><p>Enough body text to make the article the obvious winner.</p></article></body>";
        let extraction = extract(html, OutputFormat::Markup, &options).unwrap();
        assert_eq!(extraction.h1, "The Headline");
        assert!(!extraction.content.contains("The Headline"));
        assert!(extraction.content.contains("Enough body text"));
    }

    #[test]
    fn test_zero_h1_yields_empty_string() {
        let html = "<body><article><p>No headline anywhere in this article body.</p></article></body>";
        let extraction =
            extract(html, OutputFormat::Markup, &DeclutterOptions::default()).unwrap();
        assert_eq!(extraction.h1, "");
    }

    #[test]
    fn test_ambiguous_h1_tie_break() {
        let html = "<body><article><h1>First</h1><h1>Second</h1><p>Body text of a reasonable length here.</p></article></body>";

        let extraction =
            extract(html, OutputFormat::Markup, &DeclutterOptions::default()).unwrap();
        assert_eq!(extraction.h1, "");

        let options = DeclutterOptions {
            use_first_h1: true,
            ..Default::default()
        };
        let extraction = extract(html, OutputFormat::Markup, &options).unwrap();
        assert_eq!(extraction.h1, "First");
    }

    #[test]
    fn test_text_output_concatenates_paragraphs() {
        let html = "<body><article><p> First part. </p><p> Second part. </p></article></body>";
        let extraction =
            extract(html, OutputFormat::Text, &DeclutterOptions::default()).unwrap();
        assert_eq!(extraction.content, "First part.Second part.");
    }

    #[test]
    fn test_selector_override_and_content_not_found() {
        let html = r#"<body><div id="empty"></div><article><p>Real content lives over here instead.</p></article></body>"#;
        let options = DeclutterOptions {
            html_selector: Some("#empty".to_string()),
            ..Default::default()
        };
        let err = extract(html, OutputFormat::Markup, &options).unwrap_err();
        assert!(matches!(err, DeclutterError::ContentNotFound));
    }

    #[test]
    fn test_metadata_survives_sanitization() {
        let html = r#"<html><head><title>Title</title><meta name="description" content="Desc"></head>
            <body><article><p>Body content with a sensible amount of text.</p></article></body></html>"#;
        let extraction =
            extract(html, OutputFormat::Markup, &DeclutterOptions::default()).unwrap();
        assert_eq!(extraction.title.as_deref(), Some("Title"));
        assert_eq!(extraction.description.as_deref(), Some("Desc"));
    }

    #[test]
    fn test_headings_and_links_harvested() {
        let html = r#"<body><article>
            <h2>Section</h2>
            <p>Intro text that is long enough to matter for this check, truly.</p>
            <p>See the <a href="/guide">guide</a> for details.</p>
            </article></body>"#;
        let extraction =
            extract(html, OutputFormat::Markup, &DeclutterOptions::default()).unwrap();
        assert_eq!(extraction.headings.len(), 1);
        assert_eq!(extraction.headings[0].tag, "h2");
        assert_eq!(extraction.headings[0].text, "Section");
        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.links[0].href, "/guide");
        assert_eq!(extraction.links[0].text, "guide");
    }

    #[test]
    fn test_markdown_output_for_article() {
        let html = "<body><article><h2>Part One</h2><p>Some paragraph prose of a decent length for conversion.</p></article></body>";
        let extraction =
            extract(html, OutputFormat::Markdown, &DeclutterOptions::default()).unwrap();
        assert!(extraction.content.contains("Part One"));
        assert!(extraction.content.contains("Some paragraph prose"));
    }

    #[test]
    fn test_options_accessors() {
        let mut service = DeclutterService::new();
        assert!(!service.options().replace_links);
        service.options_mut().replace_links = true;
        assert!(service.options().replace_links);
    }
}
