//! Panel view rendered into a shared document.

use super::{PanelAction, PanelView};
use crate::channel::Channel;
use crate::config::OverlayConfig;
use common::{Color, Px};
use dom::{Document, DocumentRef, NodeId};

/// Attribute carried by the show/hide controls.
pub const ACTION_ATTRIBUTE: &str = "data-overlay-action";

/// Attribute marking the message list inside the panel.
pub const MESSAGES_ATTRIBUTE: &str = "data-overlay-messages";

#[derive(Clone, Copy)]
struct Mounted {
    root: NodeId,
    list: NodeId,
}

/// Renders the panel as a fixed, bottom-anchored `div` appended to `<body>`:
///
/// ```text
/// <div data-debug-overlay style="position: fixed; ...">
///   <div><span data-overlay-action="show">show</span> <span ...>hide</span></div>
///   <div data-overlay-messages>
///     <div style="color: #ffffff;">message markup</div>
///     ...
///   </div>
/// </div>
/// ```
pub struct DomPanelView {
    document: DocumentRef,
    config: OverlayConfig,
    mounted: Option<Mounted>,
}

impl DomPanelView {
    pub fn new(document: DocumentRef, config: OverlayConfig) -> Self {
        Self {
            document,
            config,
            mounted: None,
        }
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    /// Root element while mounted.
    pub fn root(&self) -> Option<NodeId> {
        self.mounted.map(|m| m.root)
    }

    /// Message list element while mounted.
    pub fn message_list(&self) -> Option<NodeId> {
        self.mounted.map(|m| m.list)
    }

    fn root_style(&self, offset: Px) -> String {
        let config = &self.config;
        format!(
            "position: fixed; left: 0; right: 0; bottom: {}; height: {}; overflow: auto; \
             z-index: {}; background: {}; font: {}; transition: bottom {}ms;",
            offset,
            config.panel_height,
            config.z_index,
            config.background.to_css(),
            config.font,
            config.transition_ms,
        )
    }

    fn build(&self, doc: &mut Document, offset: Px) -> Mounted {
        let root = doc.create_element("div");
        if let Some(elem) = doc.tree.get_element_mut(root) {
            elem.set_attribute(&self.config.marker_attribute, "");
            elem.set_attribute("style", &self.root_style(offset));
        }

        let controls = doc.create_element("div");
        for (i, action) in [PanelAction::Show, PanelAction::Hide].into_iter().enumerate() {
            if i > 0 {
                let space = doc.create_text_node(" ");
                doc.tree.append_child(controls, space);
            }
            let button = doc.create_element("span");
            if let Some(elem) = doc.tree.get_element_mut(button) {
                elem.set_attribute(ACTION_ATTRIBUTE, action.as_str());
                elem.set_attribute("style", "cursor: pointer;");
            }
            let label = doc.create_text_node(action.as_str());
            doc.tree.append_child(button, label);
            doc.tree.append_child(controls, button);
        }

        let list = doc.create_element("div");
        if let Some(elem) = doc.tree.get_element_mut(list) {
            elem.set_attribute(MESSAGES_ATTRIBUTE, "");
        }

        doc.tree.append_child(root, controls);
        doc.tree.append_child(root, list);
        doc.append_to_body(root);
        Mounted { root, list }
    }
}

impl PanelView for DomPanelView {
    fn mount(&mut self, offset: Px) {
        if self.mounted.is_some() {
            return;
        }
        let mut doc = self.document.write();
        let mounted = self.build(&mut doc, offset);
        drop(doc);
        self.mounted = Some(mounted);
    }

    fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            self.document.write().tree.remove(mounted.root);
        }
    }

    fn append_line(&mut self, channel: Channel, color: Color, markup: &str) {
        let Some(mounted) = self.mounted else {
            return;
        };
        let mut doc = self.document.write();
        let item = doc.create_element("div");
        if let Some(elem) = doc.tree.get_element_mut(item) {
            elem.set_attribute("data-channel", channel.name());
            elem.set_style_property("color", &color.to_css());
        }
        doc.set_inner_html(item, markup);
        doc.tree.append_child(mounted.list, item);
    }

    fn scroll_to_latest(&mut self) {
        let Some(mounted) = self.mounted else {
            return;
        };
        let mut doc = self.document.write();
        let count = doc.tree.child_count(mounted.list);
        if let Some(list) = doc.tree.get_element_mut(mounted.list) {
            list.scroll_top = count as f64 * f64::from(self.config.line_height.get());
        }
    }

    fn set_offset(&mut self, offset: Px) {
        let Some(mounted) = self.mounted else {
            return;
        };
        let mut doc = self.document.write();
        if let Some(root) = doc.tree.get_element_mut(mounted.root) {
            root.set_style_property("bottom", &offset.to_css());
        }
    }

    fn rendered_height(&self) -> Px {
        self.mounted
            .and_then(|mounted| {
                let doc = self.document.read();
                doc.tree
                    .get_element(mounted.root)
                    .and_then(|root| root.style.get_px("height"))
            })
            .unwrap_or(self.config.panel_height)
    }

    fn line_count(&self) -> usize {
        self.mounted
            .map(|mounted| self.document.read().tree.child_count(mounted.list))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> (DomPanelView, DocumentRef) {
        let document = Document::blank().into_shared();
        (DomPanelView::new(document.clone(), OverlayConfig::default()), document)
    }

    #[test]
    fn test_mount_builds_panel() {
        let (mut view, document) = view();
        view.mount(Px(-160.0));

        let doc = document.read();
        let roots = doc.query_selector_all("[data-debug-overlay]");
        assert_eq!(roots.len(), 1);
        assert_eq!(Some(roots[0]), view.root());
        assert_eq!(doc.tree.parent(roots[0]), Some(doc.body()));

        let root = doc.tree.get_element(roots[0]).unwrap();
        assert_eq!(root.style_property("bottom"), Some("-160px"));
        assert_eq!(root.style_property("height"), Some("150px"));
        assert_eq!(root.style_property("position"), Some("fixed"));
        assert_eq!(root.style_property("transition"), Some("bottom 300ms"));

        let show = doc.query_selector("[data-overlay-action=show]").unwrap();
        assert_eq!(doc.tree.get_text_content(show), "show");
        assert!(doc.query_selector("[data-overlay-action=hide]").is_some());
    }

    #[test]
    fn test_append_renders_markup() {
        let (mut view, document) = view();
        view.mount(Px::ZERO);
        view.append_line(Channel::Error, Color::RED, "a <b>bold</b> move");
        view.append_line(Channel::Log, Color::WHITE, "second");
        view.scroll_to_latest();

        assert_eq!(view.line_count(), 2);
        let doc = document.read();
        let list = view.message_list().unwrap();
        let first = doc.tree.first_child(list).unwrap();
        assert_eq!(
            doc.outer_html(first),
            r#"<div data-channel="error" style="color: #ff0000;">a <b>bold</b> move</div>"#
        );
        assert_eq!(doc.tree.get_element(list).unwrap().scroll_top, 32.0);
    }

    #[test]
    fn test_unmount_destroys_lines() {
        let (mut view, document) = view();
        view.mount(Px::ZERO);
        view.append_line(Channel::Log, Color::WHITE, "x");
        let nodes_before_mount = {
            let doc = document.read();
            doc.tree.len() - doc.tree.descendants(view.root().unwrap()).count() - 1
        };

        view.unmount();
        assert_eq!(view.line_count(), 0);
        assert!(view.root().is_none());
        let doc = document.read();
        assert!(doc.query_selector("[data-debug-overlay]").is_none());
        assert_eq!(doc.tree.len(), nodes_before_mount);
    }

    #[test]
    fn test_offset_and_height() {
        let (mut view, document) = view();
        assert_eq!(view.rendered_height(), Px(150.0));
        view.mount(Px(-160.0));
        view.set_offset(Px::ZERO);

        let mut doc = document.write();
        let root = doc.tree.get_element_mut(view.root().unwrap()).unwrap();
        assert_eq!(root.style_property("bottom"), Some("0px"));
        root.set_style_property("height", "90px");
        drop(doc);
        assert_eq!(view.rendered_height(), Px(90.0));
    }
}
