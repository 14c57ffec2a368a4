//! DOM Tree implementation.

use crate::element::ElementData;
use crate::node::{Node, NodeData, NodeId};
use slotmap::SlotMap;
use std::collections::HashMap;

/// The DOM tree structure.
pub struct DomTree {
    /// All nodes in the tree.
    nodes: SlotMap<NodeId, Node>,
    /// Root node (document).
    root: NodeId,
    /// ID to node mapping for fast lookups.
    id_map: HashMap<String, NodeId>,
}

impl DomTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(Node::new_document);
        Self {
            nodes,
            root,
            id_map: HashMap::new(),
        }
    }

    /// Get the root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn get_element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(|n| n.as_element())
    }

    pub fn get_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id).and_then(|n| n.as_element_mut())
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_element(id, data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: String) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_text(id, content))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, content: String) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_comment(id, content))
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.nodes.insert_with_key(Node::new_document_fragment)
    }

    /// Append a child to a parent node, moving it from its old parent.
    ///
    /// Appending a node under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.is_ancestor(child, parent) {
            tracing::warn!(?parent, ?child, "ignoring append that would create a cycle");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }

        self.remove_from_parent(child);

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }

        if self.is_connected(parent) {
            self.index_subtree(child);
        }
    }

    /// Insert `child` under `parent` before `reference`, or last when there is
    /// no reference or it is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let Some(reference) = reference.filter(|&r| r != child && self.parent(r) == Some(parent))
        else {
            self.append_child(parent, child);
            return;
        };

        self.append_child(parent, child);
        if self.parent(child) != Some(parent) {
            return;
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|id| *id != child);
            let index = parent_node
                .children
                .iter()
                .position(|id| *id == reference)
                .unwrap_or(parent_node.children.len());
            parent_node.children.insert(index, child);
        }
    }

    /// Detach a node from its parent, keeping it (and its subtree) alive.
    pub fn remove_from_parent(&mut self, node: NodeId) {
        let parent = match self.nodes.get(node) {
            Some(n) => n.parent,
            None => return,
        };

        let was_connected = self.is_connected(node);

        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent_id) {
                parent_node.children.retain(|id| *id != node);
            }
        }
        if let Some(node_data) = self.nodes.get_mut(node) {
            node_data.parent = None;
        }

        if was_connected {
            self.unindex_subtree(node);
        }
    }

    /// Remove a node and destroy its whole subtree.
    pub fn remove(&mut self, node: NodeId) {
        self.remove_from_parent(node);

        let doomed: Vec<_> = std::iter::once(node).chain(self.descendants(node)).collect();
        for id in doomed {
            self.nodes.remove(id);
        }
    }

    /// Destroy every child of a node.
    pub fn remove_children(&mut self, node: NodeId) {
        let children: Vec<_> = self.children(node).collect();
        for child in children {
            self.remove(child);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.first_child())
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.last_child())
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map(|n| n.child_count()).unwrap_or(0)
    }

    /// Get all children.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.children.iter().copied())
    }

    /// Get ancestors, nearest first.
    pub fn ancestors(&self, node: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(node),
        }
    }

    /// Get descendants (pre-order), excluding the node itself.
    pub fn descendants(&self, node: NodeId) -> DescendantIterator<'_> {
        let mut stack = Vec::new();
        if let Some(n) = self.nodes.get(node) {
            stack.extend(n.children.iter().rev().copied());
        }
        DescendantIterator { tree: self, stack }
    }

    /// Whether `ancestor` is a proper ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.is_ancestor(self.root, node)
    }

    /// Find a connected element by ID.
    pub fn find_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    /// Find connected elements by tag name.
    pub fn find_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        let is_all = tag_name == "*";
        self.descendants(self.root)
            .filter(|&id| {
                self.get_element(id)
                    .map(|e| is_all || e.tag_name == tag_name)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Find connected elements by class name.
    pub fn find_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|&id| {
                self.get_element(id)
                    .map(|e| e.has_class(class_name))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Find connected elements carrying an attribute, optionally with a value.
    pub fn find_elements_by_attribute(&self, name: &str, value: Option<&str>) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|&id| match self.get_element(id) {
                Some(elem) => match value {
                    Some(v) => elem.get_attribute(name) == Some(v),
                    None => elem.has_attribute(name),
                },
                None => false,
            })
            .collect()
    }

    /// Query selector: `#id`, `.class`, `[attr]`, `[attr=value]` or a tag name.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).into_iter().next()
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let selector = selector.trim();

        if let Some(id) = selector.strip_prefix('#') {
            self.find_element_by_id(id).into_iter().collect()
        } else if let Some(class) = selector.strip_prefix('.') {
            self.find_elements_by_class_name(class)
        } else if let Some(attr) = selector
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
        {
            match attr.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim_matches(|c| c == '"' || c == '\'');
                    self.find_elements_by_attribute(name.trim(), Some(value))
                }
                None => self.find_elements_by_attribute(attr.trim(), None),
            }
        } else {
            self.find_elements_by_tag_name(selector)
        }
    }

    /// Replace the children of a node with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let Some(node_data) = self.nodes.get_mut(node) {
            if let NodeData::Text { content } | NodeData::Comment { content } = &mut node_data.data
            {
                *content = text.to_string();
                return;
            }
        }

        let is_container = self
            .nodes
            .get(node)
            .map(|n| matches!(n.data, NodeData::Element(_) | NodeData::DocumentFragment))
            .unwrap_or(false);
        if is_container {
            self.remove_children(node);
            if !text.is_empty() {
                let text_node = self.create_text(text.to_string());
                self.append_child(node, text_node);
            }
        }
    }

    /// Get text content of a node and its descendants.
    pub fn get_text_content(&self, node: NodeId) -> String {
        let mut result = String::new();
        if let Some(text) = self.get(node).and_then(|n| n.as_text()) {
            result.push_str(text);
        }
        for id in self.descendants(node) {
            if let Some(text) = self.get(id).and_then(|n| n.as_text()) {
                result.push_str(text);
            }
        }
        result
    }

    fn index_subtree(&mut self, node: NodeId) {
        let ids: Vec<_> = std::iter::once(node).chain(self.descendants(node)).collect();
        for id in ids {
            if let Some(elem_id) = self.get_element(id).and_then(|e| e.id.clone()) {
                self.id_map.insert(elem_id.to_string(), id);
            }
        }
    }

    fn unindex_subtree(&mut self, node: NodeId) {
        let ids: Vec<_> = std::iter::once(node).chain(self.descendants(node)).collect();
        for id in ids {
            if let Some(elem_id) = self.get_element(id).and_then(|e| e.id.clone()) {
                if self.id_map.get(elem_id.as_ref()) == Some(&id) {
                    self.id_map.remove(elem_id.as_ref());
                }
            }
        }
    }

    /// Total number of live nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestor nodes.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.parent(current);
        Some(current)
    }
}

/// Iterator over descendant nodes (pre-order traversal).
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.tree.nodes.get(current) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(current)
    }
}
