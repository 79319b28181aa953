// SPDX-License-Identifier: GPL-3.0-only

//! ARGB color values for themes and key styling.
//!
//! Colors are stored as 8-bit channels and serialize as hex strings
//! (`#RRGGBB` or `#AARRGGBB`), which is also the format accepted in theme
//! catalog files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque-by-default 8-bit ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Alpha channel
    pub a: u8,
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_argb(0xFF00_0000);
    pub const WHITE: Color = Color::from_argb(0xFFFF_FFFF);
    pub const DKGRAY: Color = Color::from_argb(0xFF44_4444);
    pub const GRAY: Color = Color::from_argb(0xFF88_8888);
    pub const LTGRAY: Color = Color::from_argb(0xFFCC_CCCC);
    pub const RED: Color = Color::from_argb(0xFFFF_0000);
    pub const GREEN: Color = Color::from_argb(0xFF00_FF00);
    pub const CYAN: Color = Color::from_argb(0xFF00_FFFF);

    /// Creates an opaque color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    /// Creates a color from a packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the color into a `0xAARRGGBB` value.
    #[must_use]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Parses `#RRGGBB` or `#AARRGGBB` (the leading `#` is optional).
    ///
    /// Returns `None` for any other length or non-hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => u32::from_str_radix(hex, 16)
                .ok()
                .map(|rgb| Self::from_argb(0xFF00_0000 | rgb)),
            8 => u32::from_str_radix(hex, 16).ok().map(Self::from_argb),
            _ => None,
        }
    }

    /// Formats the color as `#RRGGBB`, or `#AARRGGBB` when not fully opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:08X}", self.to_argb())
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ============================================================================
// Tests
// ============================================================================
