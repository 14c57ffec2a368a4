//! CSS pixel lengths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// An absolute length in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Px(pub f32);

impl Px {
    pub const ZERO: Px = Px(0.0);

    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Parse a CSS length written in pixels (`"150px"`, `"-12.5px"`, `"0"`).
    ///
    /// Other units are rejected since nothing here resolves them.
    pub fn parse(text: &str) -> Option<Px> {
        let text = text.trim();
        if text == "0" {
            return Some(Px::ZERO);
        }
        text.strip_suffix("px")
            .and_then(|number| number.trim().parse::<f32>().ok())
            .filter(|value| value.is_finite())
            .map(Px)
    }

    /// CSS text for this length.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl Add for Px {
    type Output = Px;
    fn add(self, rhs: Px) -> Px {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Px;
    fn sub(self, rhs: Px) -> Px {
        Px(self.0 - rhs.0)
    }
}

impl Neg for Px {
    type Output = Px;
    fn neg(self) -> Px {
        Px(-self.0)
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}px", self.0 as i64)
        } else {
            write!(f, "{}px", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(Px::parse("150px"), Some(Px(150.0)));
        assert_eq!(Px::parse(" -12.5px "), Some(Px(-12.5)));
        assert_eq!(Px::parse("0"), Some(Px::ZERO));
        assert_eq!(Px::parse("2em"), None);
        assert_eq!(Px::parse("px"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Px(150.0).to_string(), "150px");
        assert_eq!(Px(-160.0).to_string(), "-160px");
        assert_eq!(Px(0.5).to_string(), "0.5px");
        assert_eq!(-(Px(150.0) + Px(10.0)), Px(-160.0));
    }
}
