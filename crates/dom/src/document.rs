//! DOM Document implementation.

use crate::element::{ElementData, TagName};
use crate::markup;
use crate::node::NodeId;
use crate::tree::DomTree;
use parking_lot::RwLock;
use std::sync::Arc;
use url::Url;

/// DOM Document.
///
/// Always carries the `<html><head><title/></head><body/></html>` skeleton so
/// there is a body to mount overlay content into.
pub struct Document {
    /// The DOM tree.
    pub tree: DomTree,
    /// Document URL.
    pub url: Url,
    /// Document element (`<html>`).
    pub document_element: NodeId,
    /// Head element.
    pub head: NodeId,
    /// Body element.
    pub body: NodeId,
}

impl Document {
    pub fn new(url: Url) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();

        let document_element = tree.create_element(ElementData::new(TagName::html()));
        let head = tree.create_element(ElementData::new(TagName::head()));
        let title = tree.create_element(ElementData::new(TagName::title()));
        let body = tree.create_element(ElementData::new(TagName::body()));

        tree.append_child(root, document_element);
        tree.append_child(document_element, head);
        tree.append_child(head, title);
        tree.append_child(document_element, body);

        Self {
            tree,
            url,
            document_element,
            head,
            body,
        }
    }

    /// Create a blank document.
    pub fn blank() -> Self {
        Self::new(Url::parse("about:blank").expect("about:blank is a valid URL"))
    }

    /// Wrap the document for sharing between the overlay and its host.
    pub fn into_shared(self) -> DocumentRef {
        Arc::new(RwLock::new(self))
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(ElementData::new(TagName::new(tag_name)))
    }

    /// Create a detached text node.
    pub fn create_text_node(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content.to_string())
    }

    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.tree.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.tree.query_selector_all(selector)
    }

    /// Append a node as the last child of `<body>`.
    pub fn append_to_body(&mut self, node: NodeId) {
        self.tree.append_child(self.body, node);
    }

    /// Whether the node is part of the rendered document.
    pub fn contains(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    /// Replace a node's children with parsed markup.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) {
        markup::set_inner_html(&mut self.tree, node, html);
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        markup::serialize_inner_html(&self.tree, node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        markup::serialize_node(&self.tree, node)
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        markup::serialize_document(&self.tree)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::blank()
    }
}

/// Shared document reference.
pub type DocumentRef = Arc<RwLock<Document>>;
