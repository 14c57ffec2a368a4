//! The overlay panel: its state machine, the view it drives, and the sink
//! that feeds it console output.

mod controller;
mod dom_view;
mod view;

pub use controller::PanelController;
pub use dom_view::{DomPanelView, ACTION_ATTRIBUTE, MESSAGES_ATTRIBUTE};
pub use view::PanelView;

use crate::sink::{Record, Sink};
use std::sync::Arc;

/// Whether the panel is part of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountState {
    Detached,
    Attached,
}

/// Whether the panel rests onscreen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

/// An operation triggered from one of the panel's own controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    Show,
    Hide,
}

impl PanelAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelAction::Show => "show",
            PanelAction::Hide => "hide",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "show" => Some(PanelAction::Show),
            "hide" => Some(PanelAction::Hide),
            _ => None,
        }
    }
}

/// Console sink that draws into the panel while it is attached.
pub struct PanelSink {
    panel: Arc<PanelController>,
}

impl PanelSink {
    pub fn new(panel: Arc<PanelController>) -> Self {
        Self { panel }
    }
}

impl Sink for PanelSink {
    fn is_active(&self) -> bool {
        self.panel.is_attached()
    }

    fn write(&self, record: &Record) {
        self.panel.append(record.channel, &record.text);
    }
}
