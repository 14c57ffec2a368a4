//! Markup fragments: `innerHTML` style assignment through html5ever, and
//! the matching serializer.

use crate::node::{NodeData, NodeId};
use crate::tree::DomTree;
use crate::tree_builder::DomTreeSink;
use html5ever::tendril::TendrilSink;
use html5ever::{namespace_url, ns, parse_fragment, LocalName, ParseOpts, QualName};

/// Parse a fragment in a `div` context and append the resulting nodes under
/// `parent`.
pub fn append_fragment(tree: &mut DomTree, parent: NodeId, html: &str) {
    let context = QualName::new(None, ns!(html), LocalName::from("div"));
    let parsed = parse_fragment(DomTreeSink::new(tree), ParseOpts::default(), context, vec![])
        .one(html);

    // The parser wraps fragment content in a root `html` element.
    let root = tree.first_child(parsed.document);
    let nodes: Vec<NodeId> = root
        .map(|root| tree.children(root).collect())
        .unwrap_or_default();
    for node in nodes {
        tree.append_child(parent, node);
    }

    for id in parsed.created {
        let kept = id == parent || tree.is_ancestor(parent, id);
        if !kept && tree.get(id).is_some() {
            tree.remove(id);
        }
    }
}

/// Replace a node's children with the parsed fragment.
pub fn set_inner_html(tree: &mut DomTree, node: NodeId, html: &str) {
    tree.remove_children(node);
    append_fragment(tree, node, html);
}

/// Serialize the whole document with its doctype.
pub fn serialize_document(tree: &DomTree) -> String {
    let mut output = String::from("<!DOCTYPE html>");
    serialize_children(tree, tree.root(), &mut output);
    output
}

/// Serialize a node and its subtree (outer HTML).
pub fn serialize_node(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    serialize_node_into(tree, node, &mut output);
    output
}

/// Serialize the children of a node (inner HTML).
pub fn serialize_inner_html(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    serialize_children(tree, node, &mut output);
    output
}

fn serialize_node_into(tree: &DomTree, node: NodeId, output: &mut String) {
    let Some(node_data) = tree.get(node) else {
        return;
    };

    match &node_data.data {
        NodeData::Document | NodeData::DocumentFragment => {
            serialize_children(tree, node, output);
        }
        NodeData::Element(elem) => {
            output.push('<');
            output.push_str(elem.tag_name.as_str());
            for (name, value) in elem.attributes.iter() {
                output.push(' ');
                output.push_str(name);
                if !value.is_empty() {
                    output.push_str("=\"");
                    output.push_str(&escape_html_attribute(value));
                    output.push('"');
                }
            }
            output.push('>');

            if elem.is_void() {
                return;
            }

            if elem.is_raw_text() {
                output.push_str(&tree.get_text_content(node));
            } else {
                serialize_children(tree, node, output);
            }

            output.push_str("</");
            output.push_str(elem.tag_name.as_str());
            output.push('>');
        }
        NodeData::Text { content } => {
            output.push_str(&escape_html_text(content));
        }
        NodeData::Comment { content } => {
            output.push_str("<!--");
            output.push_str(content);
            output.push_str("-->");
        }
    }
}

fn serialize_children(tree: &DomTree, node: NodeId, output: &mut String) {
    for child in tree.children(node) {
        serialize_node_into(tree, child, output);
    }
}

/// Escape HTML text content.
pub fn escape_html_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{00A0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape HTML attribute value.
pub fn escape_html_attribute(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementData, TagName};

    fn parse(html: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let host = tree.create_element(ElementData::new(TagName::div()));
        set_inner_html(&mut tree, host, html);
        (tree, host)
    }

    #[test]
    fn test_link_fragment_round_trip() {
        let html = "&nbsp;&nbsp;foo <a href=\"http://x.com/test.js\">test.js:</a><br>next";
        let (tree, host) = parse(html);

        assert_eq!(tree.child_count(host), 4);
        assert!(tree.query_selector("a").is_none(), "host is detached");

        let anchor = tree
            .children(host)
            .find(|&id| tree.get_element(id).map(|e| e.tag_name == "a").unwrap_or(false))
            .unwrap();
        assert_eq!(
            tree.get_element(anchor).unwrap().get_attribute("href"),
            Some("http://x.com/test.js")
        );
        assert_eq!(tree.get_text_content(anchor), "test.js:");
        assert_eq!(serialize_inner_html(&tree, host), html);
    }

    #[test]
    fn test_plain_text_with_angle_brackets() {
        let (tree, host) = parse("a < b && c > d");
        assert_eq!(tree.get_text_content(host), "a < b && c > d");
        assert_eq!(serialize_inner_html(&tree, host), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_unbalanced_end_tags_are_dropped() {
        let (tree, host) = parse("<b>bold</i> still bold</b> plain</span>");
        assert_eq!(
            serialize_inner_html(&tree, host),
            "<b>bold still bold</b> plain"
        );
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let (tree, host) = parse("<span class='x' data-flag>open");
        assert_eq!(
            serialize_inner_html(&tree, host),
            "<span class=\"x\" data-flag>open</span>"
        );
    }

    #[test]
    fn test_entities_and_attributes_are_decoded() {
        let (tree, host) = parse("<a href=x.js title=\"a &amp; b\">&lt;x&gt; &#60;</a>");
        let anchor = tree.first_child(host).unwrap();
        let elem = tree.get_element(anchor).unwrap();
        assert_eq!(elem.get_attribute("href"), Some("x.js"));
        assert_eq!(elem.get_attribute("title"), Some("a & b"));
        assert_eq!(tree.get_text_content(anchor), "<x> <");
    }

    #[test]
    fn test_parse_leaves_no_scratch_nodes() {
        let mut tree = DomTree::new();
        let host = tree.create_element(ElementData::new(TagName::div()));
        set_inner_html(&mut tree, host, "<b>one</b> two<br>");
        assert_eq!(tree.len(), 1 + 1 + 4);

        set_inner_html(&mut tree, host, "");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html_text("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html_attribute("\"q\""), "&quot;q&quot;");
    }
}
