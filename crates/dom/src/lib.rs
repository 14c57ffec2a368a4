//! DOM (Document Object Model) implementation.
//!
//! A small, self-contained document tree: enough structure for the overlay to
//! own a subtree inside a page, style it, fill it with markup and hand it back
//! out as HTML.

pub mod attributes;
pub mod document;
pub mod element;
pub mod events;
pub mod markup;
pub mod node;
pub mod style;
pub mod tree;
pub mod tree_builder;

pub use attributes::AttributeMap;
pub use document::{Document, DocumentRef};
pub use element::{ElementData, TagName};
pub use events::Event;
pub use node::{Node, NodeData, NodeId, NodeType};
pub use style::StyleDeclarations;
pub use tree::DomTree;
