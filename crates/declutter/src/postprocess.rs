//! Post-processing of the chosen content subtree: pruning leftover shells,
//! repairing tables for the markdown collaborator, and harvesting the
//! structured data (links, images, sub-headings) for the result.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::heuristics::BASIC_CONTENT_TAGS;
use crate::service::DeclutterOptions;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static FIGCAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("figcaption").unwrap());
static DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div").unwrap());
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static THEAD: Lazy<Selector> = Lazy::new(|| Selector::parse("thead").unwrap());
static CAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("caption").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static HEADINGS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

/// A hyperlink found in the content subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// An image reference recorded from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// A sub-heading found in the content subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    #[serde(rename = "type")]
    pub tag: String,
    pub text: String,
}

pub(crate) struct Harvest {
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub headings: Vec<Heading>,
}

pub(crate) fn run(doc: &mut Html, root: NodeId, options: &DeclutterOptions) -> Harvest {
    if options.remove_h1_from_content {
        remove_single_h1(doc, root);
    }
    if options.remove_images && options.remove_figcaptions {
        let captions = dom::select_ids_in(doc, root, &FIGCAPTION);
        dom::detach_all(doc, &captions);
    }
    if options.remove_empty_tag {
        remove_contentless_divs(doc, root);
    }
    remove_hollow_divs(doc, root);
    remove_stray_spans(doc, root);
    repair_tables(doc, root);
    let links = collect_links(doc, root, options.replace_links);
    let images = collect_images(doc, options.remove_images);
    let headings = collect_headings(doc, root);
    Harvest {
        links,
        images,
        headings,
    }
}

/// Drop the subtree's H1, but only when the whole document holds exactly
/// one; zero or several means the document is ambiguous and every H1 stays.
fn remove_single_h1(doc: &mut Html, root: NodeId) {
    if dom::select_ids(doc, &H1).len() != 1 {
        return;
    }
    let ids = dom::select_ids_in(doc, root, &H1);
    dom::detach_all(doc, &ids);
}

/// Drop `<div>`s whose direct children hold no basic content tag.
fn remove_contentless_divs(doc: &mut Html, root: NodeId) {
    let mut ids = Vec::new();
    if let Some(root_el) = dom::element(doc, root) {
        for div in root_el.select(&DIV) {
            let has_content = div
                .children()
                .filter_map(|child| child.value().as_element())
                .any(|element| BASIC_CONTENT_TAGS.contains(&element.name()));
            if !has_content {
                ids.push(div.id());
            }
        }
    }
    dom::detach_all(doc, &ids);
}

/// Drop `<div>`s without a single element child, whatever text they hold.
fn remove_hollow_divs(doc: &mut Html, root: NodeId) {
    let mut ids = Vec::new();
    if let Some(root_el) = dom::element(doc, root) {
        for div in root_el.select(&DIV) {
            let has_element_child = div.children().any(|child| child.value().is_element());
            if !has_element_child {
                ids.push(div.id());
            }
        }
    }
    dom::detach_all(doc, &ids);
}

/// Drop `<span>`s that are not inside a paragraph.
fn remove_stray_spans(doc: &mut Html, root: NodeId) {
    let mut ids = Vec::new();
    if let Some(root_el) = dom::element(doc, root) {
        for span in root_el.select(&SPAN) {
            let inside_paragraph = span
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| ancestor.value().name() == "p");
            if !inside_paragraph {
                ids.push(span.id());
            }
        }
    }
    dom::detach_all(doc, &ids);
}

/// Give every headerless `<table>` an explicit `<thead>`/`<tbody>` shape.
/// The markdown collaborator cannot render a table without a header row.
fn repair_tables(doc: &mut Html, root: NodeId) {
    let mut tables = Vec::new();
    if let Some(root_el) = dom::element(doc, root) {
        if root_el.value().name() == "table" && root_el.select(&THEAD).next().is_none() {
            tables.push(root);
        }
        for table in root_el.select(&TABLE) {
            if table.select(&THEAD).next().is_none() {
                tables.push(table.id());
            }
        }
    }
    for table in tables {
        repair_table(doc, table);
    }
}

fn repair_table(doc: &mut Html, table: NodeId) {
    let captions = dom::select_ids_in(doc, table, &CAPTION);
    dom::detach_all(doc, &captions);

    match first_element_child(doc, table) {
        Some((tbody, name)) if name == "tbody" => {
            let head_row = first_element_child(doc, tbody).map(|(row, _)| row);
            let thead = dom::new_element(doc, "thead");
            if let Some(mut table_mut) = doc.tree.get_mut(table) {
                table_mut.prepend_id(thead);
            }
            if let Some(row) = head_row {
                if let Some(mut thead_mut) = doc.tree.get_mut(thead) {
                    thead_mut.append_id(row);
                }
            }
        }
        Some((first_row, _)) => {
            // no tbody at all: first row becomes the header, the rest get
            // wrapped so the table keeps a single body
            let rest: Vec<NodeId> = element_children(doc, table)
                .into_iter()
                .filter(|&id| id != first_row)
                .collect();
            let thead = dom::new_element(doc, "thead");
            let tbody = dom::new_element(doc, "tbody");
            if let Some(mut thead_mut) = doc.tree.get_mut(thead) {
                thead_mut.append_id(first_row);
            }
            for row in rest {
                if let Some(mut tbody_mut) = doc.tree.get_mut(tbody) {
                    tbody_mut.append_id(row);
                }
            }
            if let Some(mut table_mut) = doc.tree.get_mut(table) {
                table_mut.append_id(thead);
                table_mut.append_id(tbody);
            }
        }
        None => {}
    }
}

fn element_children(doc: &Html, id: NodeId) -> Vec<NodeId> {
    doc.tree
        .get(id)
        .map(|node| {
            node.children()
                .filter(|child| child.value().is_element())
                .map(|child| child.id())
                .collect()
        })
        .unwrap_or_default()
}

fn first_element_child(doc: &Html, id: NodeId) -> Option<(NodeId, String)> {
    doc.tree.get(id)?.children().find_map(|child| {
        child
            .value()
            .as_element()
            .map(|element| (child.id(), element.name().to_string()))
    })
}

/// Record every anchor in the subtree; optionally substitute each with its
/// bare text.
fn collect_links(doc: &mut Html, root: NodeId, replace: bool) -> Vec<Link> {
    let mut links = Vec::new();
    let mut anchors = Vec::new();
    if let Some(root_el) = dom::element(doc, root) {
        for anchor in root_el.select(&ANCHOR) {
            let text: String = anchor.text().collect();
            links.push(Link {
                href: anchor.value().attr("href").unwrap_or_default().to_string(),
                text: text.trim().to_string(),
            });
            anchors.push((anchor.id(), text));
        }
    }
    if replace {
        for (id, text) in anchors {
            dom::replace_with_text(doc, id, &text);
        }
    }
    links
}

/// Record every image in the whole document; optionally delete them all.
fn collect_images(doc: &mut Html, remove: bool) -> Vec<Image> {
    let mut images = Vec::new();
    let mut ids = Vec::new();
    for image in doc.select(&IMG) {
        images.push(Image {
            src: image.value().attr("src").unwrap_or_default().to_string(),
            alt: image.value().attr("alt").unwrap_or_default().to_string(),
        });
        ids.push(image.id());
    }
    if remove {
        dom::detach_all(doc, &ids);
    }
    images
}

/// Record every sub-heading in the subtree that carries real text.
fn collect_headings(doc: &Html, root: NodeId) -> Vec<Heading> {
    let Some(root_el) = dom::element(doc, root) else {
        return Vec::new();
    };
    let mut headings = Vec::new();
    for heading in root_el.select(&HEADINGS) {
        let text: String = heading.text().collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        headings.push(Heading {
            tag: heading.value().name().to_string(),
            text: text.to_string(),
        });
    }
    headings
}
