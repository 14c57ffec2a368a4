use crate::channel::Channel;
use common::{Color, Px};

/// Rendering surface driven by [`PanelController`](super::PanelController).
///
/// The controller owns all state; a view only reflects it. Calls arrive in a
/// valid order: `mount` before anything else, nothing but `mount` after
/// `unmount`.
pub trait PanelView: Send {
    /// Insert the panel with its bottom edge at `offset`.
    fn mount(&mut self, offset: Px);

    /// Remove the panel and every line in it.
    fn unmount(&mut self);

    /// Add one message line. `markup` is rendered, not escaped.
    fn append_line(&mut self, channel: Channel, color: Color, markup: &str);

    /// Scroll so the newest line is visible.
    fn scroll_to_latest(&mut self);

    /// Move the panel's bottom edge.
    fn set_offset(&mut self, offset: Px);

    /// Current height of the panel as rendered.
    fn rendered_height(&self) -> Px;

    fn line_count(&self) -> usize;
}
