//! RGBA colors used for cursor feedback and panel fallback materials.

use thiserror::Error;

/// Errors produced when parsing a hex color string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string was not `#rrggbb` or `#rrggbbaa`.
    #[error("expected #rrggbb or #rrggbbaa, got {0:?}")]
    Malformed(String),
}

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);
    /// Opaque red, used by the gaze cursor while hovering.
    pub const RED: Rgba = Rgba([1.0, 0.0, 0.0, 1.0]);
    /// Orange used as the default panel fallback.
    pub const FALLBACK_ORANGE: Rgba = Rgba([1.0, 0.6, 0.0, 1.0]);

    /// Construct an opaque color from components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Rgba([r, g, b, 1.0])
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        // Byte-indexed slicing below; multibyte input is malformed anyway.
        if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
            return Err(ColorParseError::Malformed(s.to_string()));
        }
        let byte = |i: usize| -> Result<f32, ColorParseError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorParseError::Malformed(s.to_string()))
        };
        let r = byte(0)?;
        let g = byte(2)?;
        let b = byte(4)?;
        let a = if digits.len() == 8 { byte(6)? } else { 1.0 };
        Ok(Rgba([r, g, b, a]))
    }

    /// Red component.
    pub fn r(&self) -> f32 {
        self.0[0]
    }

    /// Green component.
    pub fn g(&self) -> f32 {
        self.0[1]
    }

    /// Blue component.
    pub fn b(&self) -> f32 {
        self.0[2]
    }

    /// Alpha component.
    pub fn a(&self) -> f32 {
        self.0[3]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#000000"), Ok(Rgba::BLACK));
        assert_eq!(Rgba::from_hex("ff0000"), Ok(Rgba::RED));
        let gray = Rgba::from_hex("#4d4d4d").unwrap();
        assert!((gray.r() - 77.0 / 255.0).abs() < 1e-6);
        assert_eq!(gray.a(), 1.0);
    }

    #[test]
    fn test_from_hex_with_alpha() {
        let c = Rgba::from_hex("#ffffff80").unwrap();
        assert!((c.a() - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(Rgba::from_hex("#fff").is_err());
        assert!(Rgba::from_hex("#zzzzzz").is_err());
        assert!(Rgba::from_hex("").is_err());
    }

    #[test]
    fn test_from_hex_rejects_multibyte_without_panicking() {
        // Six bytes but only four chars; slicing by byte must not land
        // inside a multibyte character.
        assert_eq!(
            Rgba::from_hex("aäaä"),
            Err(ColorParseError::Malformed("aäaä".to_string()))
        );
        assert!(Rgba::from_hex("#ää\u{e4}").is_err());
    }
}
