#![warn(missing_docs)]
//! Shared leaf types for the gallery: colors, transforms, controller hands.

mod color;
mod transform;

pub use color::{ColorParseError, Rgba};
pub use transform::Transform;

use serde::{Deserialize, Serialize};

/// Which hand (tracked controller) produced an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    /// Left hand / controller slot 0.
    Left,
    /// Right hand / controller slot 1.
    Right,
}

impl Hand {
    /// Parse from a string used in scripts and CLI flags.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" | "0" => Some(Hand::Left),
            "right" | "r" | "1" => Some(Hand::Right),
            _ => None,
        }
    }
}
