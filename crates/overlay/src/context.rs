//! The application context tying the overlay together.

use crate::config::OverlayConfig;
use common::OverlayResult;
use crate::console::{Console, SinkId};
use crate::error_bridge::UncaughtErrorBridge;
use crate::panel::{DomPanelView, PanelAction, PanelController, PanelSink, ACTION_ATTRIBUTE};
use crate::sink::{NativeSink, Sink};
use crate::stack::StackFormatter;
use crate::value::Value;
use dom::{DocumentRef, Event, NodeId};
use std::sync::Arc;

/// One overlay for one document.
///
/// Built once at startup and shared by reference with everything that
/// reports through it. Construction wires panel, console and error bridge
/// in that order; the panel starts detached, so output goes to the native
/// sink until [`enable`](Self::enable).
pub struct OverlayContext {
    document: DocumentRef,
    config: OverlayConfig,
    console: Arc<Console>,
    panel: Arc<PanelController>,
    errors: UncaughtErrorBridge,
    panel_sink: SinkId,
}

impl OverlayContext {
    /// An overlay whose native console is stdout/stderr, after checking
    /// `config`.
    pub fn try_new(document: DocumentRef, config: OverlayConfig) -> OverlayResult<Arc<Self>> {
        config.validate()?;
        Ok(Self::new(document, config))
    }

    /// An overlay whose native console is stdout/stderr. The configuration is
    /// taken as given; see [`try_new`](Self::try_new).
    pub fn new(document: DocumentRef, config: OverlayConfig) -> Arc<Self> {
        Self::with_native(document, config, Arc::new(NativeSink::stdio()))
    }

    /// An overlay falling back to `native` while the panel is detached.
    ///
    /// Does not validate `config`: panel state does not depend on the
    /// geometry, so a degenerate panel still starts detached and hidden.
    pub fn with_native(
        document: DocumentRef,
        config: OverlayConfig,
        native: Arc<dyn Sink>,
    ) -> Arc<Self> {
        let view = DomPanelView::new(document.clone(), config.clone());
        let panel = Arc::new(PanelController::new(Box::new(view), config.clone()));

        let console = Arc::new(Console::new(native));
        let panel_sink = console.register_sink(Arc::new(PanelSink::new(panel.clone())));

        let errors = UncaughtErrorBridge::new(console.clone(), panel.clone(), StackFormatter::default());

        tracing::debug!(marker = %config.marker_attribute, "overlay context created");
        Arc::new(Self {
            document,
            config,
            console,
            panel,
            errors,
            panel_sink,
        })
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    pub fn panel(&self) -> &Arc<PanelController> {
        &self.panel
    }

    pub fn errors(&self) -> &UncaughtErrorBridge {
        &self.errors
    }

    /// Registration of the panel in the console's sink list.
    pub fn panel_sink(&self) -> SinkId {
        self.panel_sink
    }

    pub fn enable(&self) -> bool {
        self.panel.enable()
    }

    pub fn disable(&self) -> bool {
        self.panel.disable()
    }

    pub fn show(&self) -> bool {
        self.panel.show()
    }

    pub fn hide(&self) -> bool {
        self.panel.hide()
    }

    pub fn is_enabled(&self) -> bool {
        self.panel.is_attached()
    }

    pub fn is_shown(&self) -> bool {
        self.panel.is_shown()
    }

    pub fn log(&self, args: Vec<Value>) {
        self.console.log(args);
    }

    pub fn warn(&self, args: Vec<Value>) {
        self.console.warn(args);
    }

    pub fn error(&self, args: Vec<Value>) {
        self.console.error(args);
    }

    /// Handle a click on `target`. Runs the action of the nearest panel
    /// control at or above it; returns whether anything changed. Controls
    /// outside the overlay root are ignored.
    pub fn click(&self, target: NodeId) -> bool {
        let action = {
            let doc = self.document.read();
            let marker = self.config.marker_attribute.as_str();
            Event::click(target)
                .find_attribute(&doc.tree, ACTION_ATTRIBUTE)
                .filter(|&(control, _)| {
                    doc.tree.ancestors(control).any(|id| {
                        doc.tree
                            .get_element(id)
                            .map(|e| e.has_attribute(marker))
                            .unwrap_or(false)
                    })
                })
                .and_then(|(_, name)| PanelAction::from_name(name))
        };
        match action {
            Some(action) => {
                tracing::debug!(action = action.as_str(), "panel control clicked");
                self.panel.activate(action)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use common::Px;
    use dom::Document;

    fn context() -> (Arc<OverlayContext>, Arc<RecordingSink>) {
        let native = Arc::new(RecordingSink::new());
        let overlay = OverlayContext::with_native(
            Document::blank().into_shared(),
            OverlayConfig::default(),
            native.clone(),
        );
        (overlay, native)
    }

    #[test]
    fn test_routes_by_attachment() {
        let (overlay, native) = context();
        overlay.log(vec!["before".into()]);
        overlay.enable();
        overlay.warn(vec!["during".into()]);
        overlay.disable();
        overlay.error(vec!["after".into()]);

        assert_eq!(native.texts(), vec!["before", "after"]);
        assert_eq!(overlay.panel().line_count(), 0);
    }

    #[test]
    fn test_click_controls() {
        let (overlay, _) = context();
        overlay.enable();
        let (show, hide, label) = {
            let doc = overlay.document().read();
            let show = doc.query_selector("[data-overlay-action=show]").unwrap();
            let hide = doc.query_selector("[data-overlay-action=hide]").unwrap();
            (show, hide, doc.tree.first_child(show).unwrap())
        };

        assert!(overlay.click(label));
        assert!(overlay.is_shown());
        assert!(!overlay.click(show));
        assert!(overlay.click(hide));
        assert_eq!(overlay.panel().offset(), Px(-160.0));

        let body = overlay.document().read().body();
        assert!(!overlay.click(body));
    }

    #[test]
    fn test_click_ignores_page_controls() {
        let (overlay, _) = context();
        overlay.enable();
        let decoy = {
            let mut doc = overlay.document().write();
            let decoy = doc.create_element("button");
            if let Some(elem) = doc.tree.get_element_mut(decoy) {
                elem.set_attribute(ACTION_ATTRIBUTE, "show");
            }
            doc.append_to_body(decoy);
            decoy
        };

        assert!(!overlay.click(decoy));
        assert!(!overlay.is_shown());
    }

    #[test]
    fn test_is_shown_requires_attached() {
        let (overlay, _) = context();
        overlay.enable();
        overlay.show();
        assert!(overlay.is_shown());
        overlay.disable();
        assert!(!overlay.is_shown());
        overlay.enable();
        assert!(overlay.is_shown());
    }

    #[test]
    fn test_try_new_validates_config() {
        let document = Document::blank().into_shared();
        let config = OverlayConfig {
            panel_height: Px::ZERO,
            ..OverlayConfig::default()
        };
        assert!(OverlayContext::try_new(document.clone(), config).is_err());
        assert!(OverlayContext::try_new(document, OverlayConfig::default()).is_ok());
    }
}
