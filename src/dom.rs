//! Node capabilities the formatter needs from the markup tree.
//!
//! The tree itself comes from `scraper` (html5ever + `ego-tree`). Everything
//! here is a read-only query over that tree: no node is cloned or mutated.

use crate::model::FormattingStyle;
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use scraper::{Html, Node};
use url::Url;

/// A borrowed node of a parsed markup tree.
pub type DomNode<'a> = NodeRef<'a, Node>;

/// Base used to resolve anchor targets when the caller supplies none.
/// Matches a freshly created browser document.
pub static BLANK_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("about:blank").expect("about:blank is a valid URL"));

/// Parses a markup fragment into a tree.
///
/// html5ever never rejects input; problems it recovers from are listed in
/// `Html::errors`.
pub fn parse_fragment(markup: &str) -> Html {
    Html::parse_fragment(markup)
}

/// Errors the markup parser reports while recovering from `markup`.
pub fn markup_errors(markup: &str) -> Vec<String> {
    parse_fragment(markup)
        .errors
        .iter()
        .map(|err| err.to_string())
        .collect()
}

/// The nodes directly under the fragment root, in document order.
pub fn top_level_nodes(html: &Html) -> impl Iterator<Item = DomNode<'_>> {
    html.root_element().children()
}

/// Lowercase element name, or `None` for text, comments, and other non-elements.
pub fn element_name<'a>(node: DomNode<'a>) -> Option<&'a str> {
    node.value().as_element().map(|el| el.name())
}

/// Leftmost-child descent to the deepest leaf.
///
/// Returns `node` itself when it has no children.
pub fn get_text_node(node: DomNode<'_>) -> DomNode<'_> {
    let mut current = node;
    while let Some(child) = current.first_child() {
        current = child;
    }
    current
}

/// Recursive concatenation of all descendant text, `node` included.
pub fn text_content(node: DomNode<'_>) -> String {
    node.descendants()
        .filter_map(|n| n.value().as_text())
        .map(|t| &**t)
        .collect()
}

/// Resolved URL of the first anchor found at or below `node`, following
/// only the leftmost child at each level.
pub fn find_node_href(node: DomNode<'_>) -> Option<String> {
    find_node_href_with_base(node, &BLANK_BASE)
}

/// Like [`find_node_href`], but resolves relative targets against `base`.
pub fn find_node_href_with_base(node: DomNode<'_>, base: &Url) -> Option<String> {
    let mut current = node;
    loop {
        if let Some(el) = current.value().as_element()
            && el.name() == FormattingStyle::Link.tag_name()
        {
            return el.attr("href").and_then(|raw| resolve_href(raw, base));
        }
        current = current.first_child()?;
    }
}

/// Resolves an `href` attribute value the way a browser's `HTMLAnchorElement.href` does:
/// the serialized URL when `raw` parses against `base`, otherwise `raw` unchanged.
///
/// A blank attribute resolves to nothing.
pub fn resolve_href(raw: &str, base: &Url) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match base.join(trimmed) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

/// Codes of every recognized formatting element in `node`'s subtree (itself
/// included), outer-to-inner in document order.
///
/// `b`, `i`, `u` and `s` are recorded where their tags open. A link is
/// recorded where its tag closes, after everything nested inside it.
///
/// `skip` excludes one node from the walk; the formatter passes the text leaf
/// so that a childless leaf element does not contribute its own code.
pub fn style_codes(node: DomNode<'_>, skip: Option<NodeId>) -> Vec<FormattingStyle> {
    let mut out = Vec::new();
    collect_style_codes(node, skip, &mut out);
    out
}

fn collect_style_codes(node: DomNode<'_>, skip: Option<NodeId>, out: &mut Vec<FormattingStyle>) {
    if Some(node.id()) == skip {
        return;
    }
    let style = element_name(node).and_then(FormattingStyle::from_tag_name);
    if let Some(style) = style
        && style != FormattingStyle::Link
    {
        out.push(style);
    }
    for child in node.children() {
        collect_style_codes(child, skip, out);
    }
    if style == Some(FormattingStyle::Link) {
        out.push(FormattingStyle::Link);
    }
}
