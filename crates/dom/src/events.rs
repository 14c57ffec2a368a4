//! DOM Events.
//!
//! Only the parts an in-page overlay needs: walking the propagation path of a
//! click so a click on nested content can be traced back to the control that
//! owns it.

use crate::node::NodeId;
use crate::tree::DomTree;

/// A dispatched click.
#[derive(Clone, Debug)]
pub struct Event {
    pub target: NodeId,
}

impl Event {
    pub fn click(target: NodeId) -> Self {
        Self { target }
    }

    /// Nodes the event visits in bubble order: the target, then its
    /// ancestors.
    pub fn propagation_path(&self, tree: &DomTree) -> Vec<NodeId> {
        let mut path = vec![self.target];
        path.extend(tree.ancestors(self.target));
        path
    }

    /// First node on the propagation path carrying `attribute`, with its value.
    pub fn find_attribute<'t>(&self, tree: &'t DomTree, attribute: &str) -> Option<(NodeId, &'t str)> {
        self.propagation_path(tree).into_iter().find_map(|id| {
            tree.get_element(id)
                .and_then(|e| e.get_attribute(attribute))
                .map(|value| (id, value))
        })
    }
}
