//! Thin helpers over the scraper/ego_tree document arena.
//!
//! scraper answers selector queries through immutable `ElementRef`s while
//! mutation goes through `ego_tree` node ids, so the pattern throughout the
//! crate is: collect the ids of interest first, then detach or reparent them.

use ego_tree::NodeId;
use html5ever::{namespace_url, ns, LocalName, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};

/// Look up an element by id. `None` for ids that no longer resolve to an
/// element node.
pub(crate) fn element(doc: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    doc.tree.get(id).and_then(ElementRef::wrap)
}

/// Inner markup of the element behind `id`, empty when it cannot be resolved.
pub(crate) fn inner_markup(doc: &Html, id: NodeId) -> String {
    element(doc, id).map(|el| el.inner_html()).unwrap_or_default()
}

/// Outer markup of the element behind `id`.
pub(crate) fn outer_markup(doc: &Html, id: NodeId) -> String {
    element(doc, id).map(|el| el.html()).unwrap_or_default()
}

/// Collapse runs of whitespace into single spaces.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Ids of every match of `selector`, in document order.
pub(crate) fn select_ids(doc: &Html, selector: &Selector) -> Vec<NodeId> {
    doc.select(selector).map(|el| el.id()).collect()
}

/// Ids of every match of `selector` below `root` (the root itself is never
/// included), in document order.
pub(crate) fn select_ids_in(doc: &Html, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    element(doc, root)
        .map(|el| el.select(selector).map(|m| m.id()).collect())
        .unwrap_or_default()
}

/// Ids of every comment node in the document.
pub(crate) fn comment_ids(doc: &Html) -> Vec<NodeId> {
    doc.tree
        .root()
        .descendants()
        .filter(|node| node.value().is_comment())
        .map(|node| node.id())
        .collect()
}

/// Detach every node in `ids` from the tree. Returns how many were detached.
pub(crate) fn detach_all(doc: &mut Html, ids: &[NodeId]) -> usize {
    let mut removed = 0;
    for &id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

/// Create a detached element node with the given tag name.
pub(crate) fn new_element(doc: &mut Html, tag: &str) -> NodeId {
    let name = QualName::new(None, ns!(html), LocalName::from(tag));
    doc.tree
        .orphan(Node::Element(Element::new(name, Vec::new())))
        .id()
}

/// Replace the node behind `id` with a bare text node.
pub(crate) fn replace_with_text(doc: &mut Html, id: NodeId, text: &str) {
    let text_id = doc
        .tree
        .orphan(Node::Text(Text { text: text.into() }))
        .id();
    let Some(mut node) = doc.tree.get_mut(id) else {
        return;
    };
    node.insert_id_after(text_id);
    node.detach();
}
