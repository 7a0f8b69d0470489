//! # declutter
//!
//! Extract the main article content from HTML documents.
//!
//! Given an arbitrary HTML page, `declutter` locates the subtree a human
//! reader actually cares about — discarding navigation, ads, sidebars, and
//! other boilerplate — and returns it as structured data (title,
//! description, primary heading, sub-headings, links, images) together with
//! the cleaned content body as raw markup, plain text, or markdown.
//!
//! ## Design
//!
//! Location runs as an ordered chain of strategies: an optional caller
//! selector override, then a structural pass that prefers semantic
//! containers with the most paragraphs, then a heuristic scoring pass over
//! paragraph candidates (tag semantics, class/id hints, text density), and
//! finally the document body itself. The winning subtree is pruned and
//! repaired before serialization.
//!
//! ## Example
//!
//! ```rust
//! use declutter::{DeclutterService, OutputFormat};
//!
//! let service = DeclutterService::new();
//! let html = "<html><head><title>Post</title></head><body><article>\
//!     <p>The article body a reader actually cares about, long enough to matter.</p>\
//!     </article></body></html>";
//!
//! let extraction = service.extract(html, OutputFormat::Markup).unwrap();
//! assert_eq!(extraction.title.as_deref(), Some("Post"));
//! assert!(extraction.content.contains("article body"));
//! ```
//!
//! ## Example (options)
//!
//! ```rust
//! use declutter::{extract, DeclutterOptions, OutputFormat};
//!
//! let options = DeclutterOptions {
//!     replace_links: true,
//!     ..Default::default()
//! };
//! let html = r#"<body><article><p>Read the <a href="/docs">documentation</a> for the long version of this.</p></article></body>"#;
//!
//! let extraction = extract(html, OutputFormat::Text, &options).unwrap();
//! assert_eq!(extraction.links.len(), 1);
//! assert!(extraction.content.contains("documentation"));
//! ```

mod dom;
mod heuristics;
mod locate;
mod metadata;
mod postprocess;
mod sanitize;
mod service;

pub use postprocess::{Heading, Image, Link};
pub use service::{
    extract, DeclutterOptions, DeclutterService, Extraction, OutputFormat,
};

/// Error type for extraction operations
#[derive(Debug, thiserror::Error)]
pub enum DeclutterError {
    /// No content subtree could be serialized from the document.
    #[error("content not found; supply an explicit html_selector for this document")]
    ContentNotFound,

    /// The caller-supplied selector override does not parse.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

pub type Result<T> = std::result::Result<T, DeclutterError>;
