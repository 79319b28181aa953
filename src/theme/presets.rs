// SPDX-License-Identifier: GPL-3.0-only

//! Built-in theme presets.
//!
//! Every preset uses a black keyboard background and varies the key fill
//! and label colors.

use crate::theme::color::Color;
use crate::theme::registry::Theme;

/// Returns the built-in themes in picker order.
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme::new("Dark", Color::BLACK, Color::from_argb(0xFF21_2121), Color::WHITE),
        Theme::new("Light", Color::BLACK, Color::LTGRAY, Color::BLACK),
        Theme::new("Dracula", Color::BLACK, Color::DKGRAY, Color::RED),
        Theme::new("Gray", Color::BLACK, Color::GRAY, Color::BLACK),
        Theme::new("SkyBlue", Color::BLACK, Color::CYAN, Color::BLACK),
        Theme::new("Forest", Color::BLACK, Color::GREEN, Color::WHITE),
        Theme::new("Ocean Blue", Color::BLACK, Color::from_argb(0xFF1E_90FF), Color::WHITE),
        Theme::new("Fiery Red", Color::BLACK, Color::from_argb(0xFFFF_4500), Color::WHITE),
        Theme::new("Sunshine Yellow", Color::BLACK, Color::from_argb(0xFFFF_D700), Color::BLACK),
        Theme::new("Soft Pink", Color::BLACK, Color::from_argb(0xFFFF_C0CB), Color::BLACK),
        Theme::new("Mystic Purple", Color::BLACK, Color::from_argb(0xFF80_0080), Color::WHITE),
        Theme::new("Deep Blue", Color::BLACK, Color::from_argb(0xFF00_008B), Color::WHITE),
    ]
}
