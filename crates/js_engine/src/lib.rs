//! Script host for the debug overlay, using Boa.
//!
//! Gives scripts the environment's native console, then installs the
//! overlay over it: console overrides, a chained `onerror` hook and the
//! global `debugOverlay` object.

pub mod console;
pub mod engine;
pub mod onerror;
pub mod overlay_object;
pub mod value;

pub use console::{install_console_overrides, register_native_console, ConsoleOverrideTable, LogLevel};
pub use engine::ScriptHost;
pub use onerror::install_error_hook;
pub use overlay_object::register_overlay_object;
