//! In-page debug overlay.
//!
//! Console output and uncaught errors are shown in a panel inside the page
//! for environments without a developer console. Reporting goes through a
//! [`Console`] facade; the panel is one sink among others and the
//! environment's own console is the fallback while the panel is detached.
//!
//! ```text
//!  caller ──► Console ──► PanelSink ──► PanelController ──► PanelView (DOM)
//!               │
//!               └──► fallback (NativeSink) while no sink is active
//!
//!  uncaught error ──► UncaughtErrorBridge ──► handlers, then Console::error
//! ```

pub mod channel;
pub mod config;
pub mod console;
pub mod context;
pub mod error_bridge;
pub mod panel;
pub mod sink;
pub mod stack;
pub mod testing;
pub mod value;

pub use channel::Channel;
pub use config::{ChannelColors, OverlayConfig};
pub use console::{Console, SinkId, MAX_DISPATCH_DEPTH};
pub use context::OverlayContext;
pub use error_bridge::{ErrorEvent, ErrorHandler, ErrorValue, UncaughtErrorBridge};
pub use panel::{
    DomPanelView, MountState, PanelAction, PanelController, PanelSink, PanelView, Visibility,
};
pub use sink::{NativeSink, Record, Sink};
pub use stack::{GeckoStackParser, StackFormatter, StackFrame, StackLine, StackParser, V8StackParser};
pub use value::Value;
