// SPDX-License-Identifier: GPL-3.0-only

//! Key styling derived from the active theme and style configuration.
//!
//! Every key in the grid receives the same [`KeyStyle`]: the theme supplies
//! the fill and label colors, the style configuration supplies border,
//! corner radius and text size.

use serde::Serialize;

use crate::config::StyleConfig;
use crate::renderer::sizing::{dp_to_px, dp_to_px_int};
use crate::theme::{Color, Theme};

/// Resolved visual properties of one key, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyStyle {
    /// Key fill color
    pub fill: Color,
    /// Border color
    pub border_color: Color,
    /// Border width in whole pixels
    pub border_width_px: u32,
    /// Corner radius in pixels
    pub corner_radius_px: f32,
    /// Label color
    pub text_color: Color,
    /// Label size in pixels
    pub text_size_px: f32,
}

/// Builds the key style for a theme.
///
/// # Arguments
///
/// * `theme` - Active theme (fill and label colors)
/// * `style` - Border, radius and text size knobs
/// * `scale` - Display density in px per dp
pub fn key_style(theme: &Theme, style: &StyleConfig, scale: f32) -> KeyStyle {
    KeyStyle {
        fill: theme.key_color,
        border_color: style.border_color,
        border_width_px: dp_to_px_int(style.border_width_dp, scale),
        corner_radius_px: dp_to_px(style.corner_radius_dp, scale),
        text_color: theme.text_color,
        text_size_px: dp_to_px(style.text_size_sp, scale),
    }
}

/// Returns the keyboard surface background for a theme.
pub fn surface_background(theme: &Theme) -> Color {
    theme.background_color
}
