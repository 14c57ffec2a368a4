//! Common types shared across the debug overlay crates.

pub mod color;
pub mod error;
pub mod units;

pub use color::Color;
pub use error::{OverlayError, OverlayResult};
pub use units::Px;
