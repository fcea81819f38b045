//! HTML parser for extracting page text and links
//!
//! This module handles parsing fetched HTML to extract:
//! - Visible text, with block-level boundaries turned into line breaks
//! - Raw `href` values of every anchor, in document order

use ego_tree::iter::Edge;
use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose contents are never visible page text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line in the extracted text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol",
    "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Visible text, one block per line (not yet normalized)
    pub text: String,

    /// Raw `href` attribute values of `<a>` elements, duplicates included
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts text and anchors
///
/// html5ever recovers from any malformed markup, so this never fails.
///
/// # Example
///
/// ```
/// use address_scout::crawler::parse_page;
///
/// let html = r#"<html><body><p>Hello</p><a href="/contact">Contact</a></body></html>"#;
/// let parsed = parse_page(html);
/// assert_eq!(parsed.hrefs, vec!["/contact".to_string()]);
/// assert!(parsed.text.contains("Hello"));
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_text(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Walks the tree iteratively so deeply nested markup cannot exhaust the stack
fn extract_text(document: &Html) -> String {
    let mut text = String::new();
    let mut skip_depth = 0usize;

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) => {
                    let name = element.name();
                    if SKIPPED_ELEMENTS.contains(&name) {
                        skip_depth += 1;
                    } else if skip_depth == 0 && BLOCK_ELEMENTS.contains(&name) {
                        text.push('\n');
                    }
                }
                Node::Text(fragment) if skip_depth == 0 => text.push_str(fragment),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value() {
                    let name = element.name();
                    if SKIPPED_ELEMENTS.contains(&name) {
                        skip_depth = skip_depth.saturating_sub(1);
                    } else if skip_depth == 0 && BLOCK_ELEMENTS.contains(&name) {
                        text.push('\n');
                    }
                }
            }
        }
    }

    text
}

/// Collects raw href values of all anchors
fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

/// Resolves a raw href against the URL of the page it appeared on
///
/// Standard base-relative rules apply: scheme-relative, path-relative and fragment-only
/// hrefs all resolve against `base`. Returns `None` when the href cannot be resolved.
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    base.join(href).ok()
}
