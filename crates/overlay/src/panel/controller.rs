//! Panel mount and visibility state machine.

use super::{MountState, PanelAction, PanelView, Visibility};
use crate::channel::Channel;
use crate::config::OverlayConfig;
use common::Px;
use parking_lot::Mutex;

struct PanelState {
    view: Box<dyn PanelView>,
    mount: MountState,
    visibility: Visibility,
    /// Bottom edge offset.
    offset: Px,
}

/// Owns the panel's state and drives its view.
///
/// Every operation is a no-op when its precondition does not hold; the
/// returned flag says whether anything changed.
pub struct PanelController {
    state: Mutex<PanelState>,
    config: OverlayConfig,
}

impl PanelController {
    pub fn new(view: Box<dyn PanelView>, config: OverlayConfig) -> Self {
        let offset = config.hidden_offset(config.panel_height);
        Self {
            state: Mutex::new(PanelState {
                view,
                mount: MountState::Detached,
                visibility: Visibility::Hidden,
                offset,
            }),
            config,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Detached → Attached.
    pub fn enable(&self) -> bool {
        let mut state = self.state.lock();
        if state.mount == MountState::Attached {
            return false;
        }
        let offset = state.offset;
        state.view.mount(offset);
        state.mount = MountState::Attached;
        tracing::debug!(%offset, "panel attached");
        true
    }

    /// Attached → Detached. Lines are discarded with the panel.
    pub fn disable(&self) -> bool {
        let mut state = self.state.lock();
        if state.mount == MountState::Detached {
            return false;
        }
        state.view.unmount();
        state.mount = MountState::Detached;
        tracing::debug!("panel detached");
        true
    }

    /// Hidden → Shown: slide to the resting onscreen offset.
    pub fn show(&self) -> bool {
        let mut state = self.state.lock();
        if state.mount == MountState::Detached || state.visibility == Visibility::Shown {
            return false;
        }
        state.visibility = Visibility::Shown;
        state.offset = Px::ZERO;
        state.view.set_offset(Px::ZERO);
        tracing::debug!("panel shown");
        true
    }

    /// Shown → Hidden: slide far enough to clear the viewport at the panel's
    /// current rendered height.
    pub fn hide(&self) -> bool {
        let mut state = self.state.lock();
        if state.mount == MountState::Detached || state.visibility == Visibility::Hidden {
            return false;
        }
        let offset = self.config.hidden_offset(state.view.rendered_height());
        state.visibility = Visibility::Hidden;
        state.offset = offset;
        state.view.set_offset(offset);
        tracing::debug!(%offset, "panel hidden");
        true
    }

    pub fn activate(&self, action: PanelAction) -> bool {
        match action {
            PanelAction::Show => self.show(),
            PanelAction::Hide => self.hide(),
        }
    }

    /// Append a message line and scroll to it. Returns false when detached.
    pub fn append(&self, channel: Channel, markup: &str) -> bool {
        let mut state = self.state.lock();
        if state.mount == MountState::Detached {
            return false;
        }
        let color = self.config.colors.get(channel);
        state.view.append_line(channel, color, markup);
        state.view.scroll_to_latest();
        true
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().mount == MountState::Attached
    }

    pub fn mount_state(&self) -> MountState {
        self.state.lock().mount
    }

    /// Last visibility set by `show`/`hide`. Kept across disable/enable.
    pub fn visibility(&self) -> Visibility {
        self.state.lock().visibility
    }

    /// Whether the panel is attached and shown.
    pub fn is_shown(&self) -> bool {
        let state = self.state.lock();
        state.mount == MountState::Attached && state.visibility == Visibility::Shown
    }

    pub fn offset(&self) -> Px {
        self.state.lock().offset
    }

    pub fn line_count(&self) -> usize {
        let state = self.state.lock();
        match state.mount {
            MountState::Attached => state.view.line_count(),
            MountState::Detached => 0,
        }
    }
}
