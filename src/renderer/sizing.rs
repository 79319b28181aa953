// SPDX-License-Identifier: GPL-3.0-only

//! Sizing calculations for the key grid.
//!
//! Style lengths are density-independent (dp for geometry, sp for text). The
//! scale factor converts them to pixels. Integer quantities (border width,
//! key height, padding) are truncated, fractional ones (corner radius, text
//! size) are kept as floats.
//!
//! Horizontal sizing is relative: each key has a weight and a row shares the
//! available width in proportion to its keys' weights.

use crate::layout::RowDefinition;

// ============================================================================
// Public API
// ============================================================================

/// Converts a fractional dp (or sp) value to pixels.
pub fn dp_to_px(dp: f32, scale: f32) -> f32 {
    dp * scale
}

/// Converts an integer dp value to whole pixels, truncating.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(dp_to_px_int(2, 1.5), 3);
/// assert_eq!(dp_to_px_int(5, 1.75), 8); // 8.75 truncates to 8
/// ```
pub fn dp_to_px_int(dp: u32, scale: f32) -> u32 {
    let px = dp as f32 * scale;
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// Sum of key weights in a row.
pub fn total_weight(row: &RowDefinition) -> f32 {
    row.keys.iter().map(|key| key.weight()).sum()
}

/// Splits `available_width` among a row's keys by weight.
///
/// # Arguments
///
/// * `row` - The row to lay out
/// * `available_width` - Row width in pixels
///
/// # Returns
///
/// One width per key, in row order. Empty rows yield an empty vector.
pub fn key_widths(row: &RowDefinition, available_width: f32) -> Vec<f32> {
    let total = total_weight(row);
    if total <= 0.0 || available_width <= 0.0 {
        return vec![0.0; row.len()];
    }

    let unit = available_width / total;
    row.keys.iter().map(|key| key.weight() * unit).collect()
}

// ============================================================================
// Tests
// ============================================================================
