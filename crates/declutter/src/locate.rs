//! Main-section location.
//!
//! An ordered chain of strategies, first hit wins: the caller's selector
//! override, a structural pass over semantic containers, a content-scoring
//! pass over paragraph candidates, and finally the document body unmodified.

use ego_tree::NodeId;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::dom;
use crate::heuristics;
use crate::{DeclutterError, Result};

static STRUCTURAL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "body article, body .article, body #article, body section, body table, body .container",
    )
    .unwrap()
});
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static BODY_P: Lazy<Selector> = Lazy::new(|| Selector::parse("body p").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Paragraphs shorter than this stay in the tree but are not scored.
const MIN_PARAGRAPH_CHARS: usize = 25;

pub(crate) fn main_section(doc: &mut Html, html_selector: Option<&str>) -> Result<NodeId> {
    if let Some(selector) = html_selector {
        if let Some(id) = by_selector(doc, selector)? {
            debug!(selector, "main section from override selector");
            return Ok(id);
        }
    }
    if let Some(id) = structural(doc) {
        debug!("main section from structural candidates");
        return Ok(id);
    }
    if let Some(id) = scored(doc) {
        debug!("main section from content scoring");
        return Ok(id);
    }
    debug!("main section fell back to body");
    Ok(body_id(doc))
}

fn body_id(doc: &Html) -> NodeId {
    doc.select(&BODY)
        .next()
        .map(|el| el.id())
        .unwrap_or_else(|| doc.root_element().id())
}

/// First match of the caller's override selector, if any.
fn by_selector(doc: &Html, selector: &str) -> Result<Option<NodeId>> {
    let parsed = Selector::parse(selector)
        .map_err(|_| DeclutterError::InvalidSelector(selector.to_string()))?;
    Ok(doc.select(&parsed).next().map(|el| el.id()))
}

/// The semantic container with the most descendant paragraphs; first-seen
/// wins ties.
fn structural(doc: &Html) -> Option<NodeId> {
    let mut best: Option<(NodeId, usize)> = None;
    for candidate in doc.select(&STRUCTURAL) {
        let paragraphs = candidate.select(&PARAGRAPH).count();
        if best.map_or(true, |(_, most)| paragraphs > most) {
            best = Some((candidate.id(), paragraphs));
        }
    }
    best.map(|(id, _)| id)
}

struct Paragraph {
    id: NodeId,
    parent: Option<NodeId>,
    text: String,
}

/// Content-scoring fallback.
///
/// Accumulation runs to completion over every qualifying paragraph before
/// any candidate is compared; the link-density adjustment multiplies a
/// derived value and never touches the stored scores.
fn scored(doc: &mut Html) -> Option<NodeId> {
    let mut paragraphs = Vec::new();
    let mut empties = Vec::new();
    for paragraph in doc.select(&BODY_P) {
        let text: String = paragraph.text().collect();
        if text.is_empty() {
            empties.push(paragraph.id());
            continue;
        }
        let parent = paragraph
            .parent()
            .filter(|p| p.value().is_element())
            .map(|p| p.id());
        paragraphs.push(Paragraph {
            id: paragraph.id(),
            parent,
            text,
        });
    }
    dom::detach_all(doc, &empties);

    // Insertion order is first-seen order, which also settles ties later.
    let mut scores: IndexMap<NodeId, f64> = IndexMap::new();
    for paragraph in &paragraphs {
        let length = paragraph.text.chars().count();
        if length < MIN_PARAGRAPH_CHARS {
            continue;
        }
        ensure_record(doc, &mut scores, paragraph.id);
        if let Some(parent) = paragraph.parent {
            ensure_record(doc, &mut scores, parent);
        }
        let segments = paragraph.text.split(',').count();
        let increment = 1.0 + segments as f64 + (length / 100).min(3) as f64;
        if let Some(score) = scores.get_mut(&paragraph.id) {
            *score += increment;
        }
        if let Some(parent) = paragraph.parent {
            if let Some(score) = scores.get_mut(&parent) {
                *score += increment / 2.0;
            }
        }
    }

    let mut best: Option<(NodeId, f64)> = None;
    for (&id, &score) in &scores {
        let Some(element) = dom::element(doc, id) else {
            continue;
        };
        let adjusted = score * (1.0 - heuristics::link_density(element));
        if best.map_or(true, |(_, top)| adjusted > top) {
            best = Some((id, adjusted));
        }
    }
    best.map(|(id, _)| id)
}

/// Attach a score record on first encounter: tag base plus class/id weight.
fn ensure_record(doc: &Html, scores: &mut IndexMap<NodeId, f64>, id: NodeId) {
    if scores.contains_key(&id) {
        return;
    }
    let Some(element) = dom::element(doc, id) else {
        return;
    };
    let base = heuristics::tag_score(element.value().name())
        + f64::from(heuristics::class_id_weight(element));
    scores.insert(id, base);
}
