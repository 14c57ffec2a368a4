//! Tree builder sink for html5ever.
//!
//! Fragment parsing builds into a scratch document fragment inside the same
//! `DomTree`; the caller then moves the parsed nodes to their final parent.

use crate::element::{ElementData, TagName};
use crate::node::{NodeData, NodeId};
use crate::tree::DomTree;
use html5ever::tendril::StrTendril;
use html5ever::interface::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{namespace_url, ns, Attribute, ExpandedName, LocalName, QualName};
use std::borrow::Cow;
use std::collections::HashMap;

/// Handle for nodes in the tree sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle(pub NodeId);

/// Tree sink building into a `DomTree`.
pub struct DomTreeSink<'a> {
    tree: &'a mut DomTree,
    document: NodeId,
    /// Qualified names of the elements this sink created.
    names: HashMap<NodeId, QualName>,
    /// Name reported for handles that are not elements.
    unnamed: QualName,
    /// Every node this sink created, in creation order.
    created: Vec<NodeId>,
}

impl<'a> DomTreeSink<'a> {
    pub fn new(tree: &'a mut DomTree) -> Self {
        let document = tree.create_document_fragment();
        Self {
            tree,
            document,
            names: HashMap::new(),
            unnamed: QualName::new(None, ns!(), LocalName::from("")),
            created: vec![document],
        }
    }

    fn make_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let mut data = ElementData::new(TagName::new(&name.local));
        for attr in attrs {
            data.set_attribute(&attr.name.local, &attr.value);
        }

        let id = self.tree.create_element(data);
        self.names.insert(id, name);
        self.created.push(id);
        id
    }

    fn make_text(&mut self, text: &str) -> NodeId {
        let id = self.tree.create_text(text.to_string());
        self.created.push(id);
        id
    }

    /// Append to the text node that is the last child of `parent`, if any.
    fn merge_text(&mut self, parent: NodeId, text: &str) -> bool {
        let Some(last) = self.tree.last_child(parent) else {
            return false;
        };
        match self.tree.get_mut(last).map(|n| &mut n.data) {
            Some(NodeData::Text { content }) => {
                content.push_str(text);
                true
            }
            _ => false,
        }
    }
}

/// Result of a parse: the scratch document and every node created for it.
pub struct ParsedFragment {
    pub document: NodeId,
    pub created: Vec<NodeId>,
}

impl<'a> TreeSink for DomTreeSink<'a> {
    type Handle = Handle;
    type Output = ParsedFragment;

    fn finish(self) -> Self::Output {
        ParsedFragment {
            document: self.document,
            created: self.created,
        }
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        tracing::trace!("markup parse error: {}", msg);
    }

    fn get_document(&mut self) -> Self::Handle {
        Handle(self.document)
    }

    fn elem_name<'b>(&'b self, target: &'b Self::Handle) -> ExpandedName<'b> {
        self.names.get(&target.0).unwrap_or(&self.unnamed).expanded()
    }

    fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        Handle(self.make_element(name, attrs))
    }

    fn create_comment(&mut self, text: StrTendril) -> Self::Handle {
        let id = self.tree.create_comment(text.to_string());
        self.created.push(id);
        Handle(id)
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let id = self.tree.create_comment(format!("{} {}", target, data));
        self.created.push(id);
        Handle(id)
    }

    fn append(&mut self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(handle) => self.tree.append_child(parent.0, handle.0),
            NodeOrText::AppendText(text) => {
                if !self.merge_text(parent.0, &text) {
                    let id = self.make_text(&text);
                    self.tree.append_child(parent.0, id);
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.tree.parent(element.0).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &mut self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&mut self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&mut self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &mut self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let Some(parent) = self.tree.parent(sibling.0) else {
            return;
        };
        let id = match new_node {
            NodeOrText::AppendNode(handle) => handle.0,
            NodeOrText::AppendText(text) => self.make_text(&text),
        };
        self.tree.insert_before(parent, id, Some(sibling.0));
    }

    fn add_attrs_if_missing(&mut self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let Some(elem) = self.tree.get_element_mut(target.0) {
            for attr in attrs {
                if !elem.has_attribute(&attr.name.local) {
                    elem.set_attribute(&attr.name.local, &attr.value);
                }
            }
        }
    }

    fn remove_from_parent(&mut self, target: &Self::Handle) {
        self.tree.remove_from_parent(target.0);
    }

    fn reparent_children(&mut self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children: Vec<NodeId> = self.tree.children(node.0).collect();
        for child in children {
            self.tree.append_child(new_parent.0, child);
        }
    }
}
