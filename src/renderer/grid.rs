// SPDX-License-Identifier: GPL-3.0-only

//! Retained key grid.
//!
//! The grid is the view-layer state of the keyboard: one [`RenderedKey`] per
//! key position, each with a stable [`KeyId`]. Three operations mutate it:
//!
//! - [`build_grid`] creates a fresh grid (new generation, new ids)
//! - [`restyle`] rewrites colors and geometry of every key in place
//! - [`refresh_labels`] swaps key labels to a same-shaped table in place
//!
//! Restyling and relabeling keep every `KeyId`, so a host that mirrors the
//! grid can update existing widgets instead of recreating them.

use serde::Serialize;

use crate::config::StyleConfig;
use crate::layout::{rows_for, KeyDefinition, LayoutMode, RowDefinition};
use crate::renderer::sizing::{dp_to_px_int, key_widths};
use crate::renderer::style::{key_style, surface_background, KeyStyle};
use crate::theme::{Color, Theme};

// ============================================================================
// Types
// ============================================================================

/// Stable handle of a rendered key.
///
/// The generation changes on every rebuild; row and column locate the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KeyId {
    /// Grid generation the key was created in
    pub generation: u64,
    /// Row index, top to bottom
    pub row: usize,
    /// Column index, left to right
    pub column: usize,
}

/// A key as currently displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedKey {
    /// Stable handle
    pub id: KeyId,
    /// Label and tap behavior
    pub definition: KeyDefinition,
    /// Relative width within the row
    pub weight: f32,
    /// Fraction of the row width this key occupies
    pub width_share: f32,
    /// Key height in pixels
    pub height_px: u32,
    /// Resolved visual style
    pub style: KeyStyle,
}

/// One displayed row of keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    /// Keys from left to right
    pub keys: Vec<RenderedKey>,
}

impl RenderedRow {
    /// Labels from left to right.
    pub fn labels(&self) -> Vec<&str> {
        self.keys
            .iter()
            .map(|key| key.definition.label.as_str())
            .collect()
    }
}

/// The full displayed keyboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyGrid {
    /// Build generation shared by every key id
    pub generation: u64,
    /// Mode whose rows are displayed
    pub mode: LayoutMode,
    /// Surface background color
    pub background: Color,
    /// Surface padding in pixels
    pub padding_px: u32,
    /// Rows from top to bottom, action row last
    pub rows: Vec<RenderedRow>,
}

impl KeyGrid {
    /// Returns the key at a position.
    pub fn key_at(&self, row: usize, column: usize) -> Option<&RenderedKey> {
        self.rows.get(row)?.keys.get(column)
    }

    /// Iterates every key, row by row.
    pub fn keys(&self) -> impl Iterator<Item = &RenderedKey> {
        self.rows.iter().flat_map(|row| row.keys.iter())
    }

    /// Total number of keys.
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(|row| row.keys.len()).sum()
    }

    /// Labels of one row, or `None` if the row does not exist.
    pub fn row_labels(&self, row: usize) -> Option<Vec<&str>> {
        self.rows.get(row).map(RenderedRow::labels)
    }

    /// Finds the first key with a given label.
    pub fn find_label(&self, label: &str) -> Option<&RenderedKey> {
        self.keys().find(|key| key.definition.label == label)
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Builds a fresh grid for `mode`.
///
/// # Arguments
///
/// * `mode` - Layout mode whose rows are shown
/// * `theme` - Theme applied to every key
/// * `style` - Style knobs
/// * `scale` - Display density in px per dp
/// * `generation` - Generation stamped on every key id; callers pass a new
///   value for each rebuild
pub fn build_grid(
    mode: LayoutMode,
    theme: &Theme,
    style: &StyleConfig,
    scale: f32,
    generation: u64,
) -> KeyGrid {
    let resolved = key_style(theme, style, scale);
    let height_px = dp_to_px_int(style.key_height_dp, scale);

    let rows = rows_for(mode)
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            let shares = key_widths(&row, 1.0);
            RenderedRow {
                keys: row
                    .keys
                    .into_iter()
                    .zip(shares)
                    .enumerate()
                    .map(|(column, (definition, width_share))| RenderedKey {
                        id: KeyId {
                            generation,
                            row: row_index,
                            column,
                        },
                        weight: definition.weight(),
                        width_share,
                        definition,
                        height_px,
                        style: resolved,
                    })
                    .collect(),
            }
        })
        .collect();

    let grid = KeyGrid {
        generation,
        mode,
        background: surface_background(theme),
        padding_px: dp_to_px_int(style.padding_dp, scale),
        rows,
    };

    tracing::debug!(
        "Built {} grid with {} keys (generation {})",
        mode,
        grid.key_count(),
        generation
    );
    grid
}

/// Re-applies theme and style to every existing key.
///
/// Labels, positions and ids are untouched. Applying the same theme twice
/// yields the same grid as applying it once.
pub fn restyle(grid: &mut KeyGrid, theme: &Theme, style: &StyleConfig, scale: f32) {
    let resolved = key_style(theme, style, scale);
    let height_px = dp_to_px_int(style.key_height_dp, scale);

    grid.background = surface_background(theme);
    grid.padding_px = dp_to_px_int(style.padding_dp, scale);

    for key in grid.rows.iter_mut().flat_map(|row| row.keys.iter_mut()) {
        key.style = resolved;
        key.height_px = height_px;
    }
}

/// Relabels the grid in place with the rows of `mode`.
///
/// Only succeeds when the target table has the same shape (row count, key
/// count and kind per position) as the displayed one, which holds between
/// the two letter modes.
///
/// # Returns
///
/// `true` if the grid was relabeled, `false` if the shapes differ and the
/// grid was left unchanged.
pub fn refresh_labels(grid: &mut KeyGrid, mode: LayoutMode) -> bool {
    let target = rows_for(mode);
    if !same_shape(grid, &target) {
        return false;
    }

    for (rendered, row) in grid.rows.iter_mut().zip(target) {
        for (key, definition) in rendered.keys.iter_mut().zip(row.keys) {
            key.definition.label = definition.label;
        }
    }
    grid.mode = mode;
    true
}

fn same_shape(grid: &KeyGrid, rows: &[RowDefinition]) -> bool {
    grid.rows.len() == rows.len()
        && grid.rows.iter().zip(rows).all(|(rendered, row)| {
            rendered.keys.len() == row.keys.len()
                && rendered
                    .keys
                    .iter()
                    .zip(&row.keys)
                    .all(|(key, definition)| key.definition.kind == definition.kind)
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::KeyKind;
    use crate::theme::ThemeRegistry;

    fn dark() -> Theme {
        ThemeRegistry::builtin().lookup("Dark").cloned().unwrap()
    }

    fn forest() -> Theme {
        ThemeRegistry::builtin().lookup("Forest").cloned().unwrap()
    }

    /// Test: A fresh grid mirrors the mode's row tables
    #[test]
    fn test_build_grid_shape() {
        let grid = build_grid(LayoutMode::Numeric, &dark(), &StyleConfig::default(), 1.0, 7);

        assert_eq!(grid.rows.len(), 4);
        assert_eq!(
            grid.row_labels(0).unwrap(),
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]
        );
        assert!(grid.keys().all(|key| key.id.generation == 7));
        assert_eq!(grid.key_at(0, 4).map(|k| k.definition.label.as_str()), Some("5"));
        assert_eq!(grid.key_at(0, 4).map(|k| k.id.column), Some(4));
        assert!(grid.key_at(9, 0).is_none());
        assert_eq!(grid.padding_px, 5);
        assert_eq!(grid.find_label("Space").map(|k| k.weight), Some(4.0));
    }

    /// Test: Every key, action row included, carries the theme
    #[test]
    fn test_build_grid_applies_theme() {
        let theme = dark();
        let grid = build_grid(LayoutMode::LettersLower, &theme, &StyleConfig::default(), 1.0, 1);

        assert_eq!(grid.background, theme.background_color);
        for key in grid.keys() {
            assert_eq!(key.style.fill, theme.key_color);
            assert_eq!(key.style.text_color, theme.text_color);
            assert_eq!(key.style.border_width_px, 2);
            assert_eq!(key.height_px, 60);
        }
    }

    /// Test: Restyle changes colors but keeps ids and labels; it is idempotent
    #[test]
    fn test_restyle_in_place_and_idempotent() {
        let style = StyleConfig::default();
        let mut grid = build_grid(LayoutMode::LettersUpper, &dark(), &style, 1.0, 3);
        let before = grid.clone();

        let theme = forest();
        restyle(&mut grid, &theme, &style, 1.0);
        let once = grid.clone();
        restyle(&mut grid, &theme, &style, 1.0);
        assert_eq!(grid, once);

        assert_eq!(grid.generation, before.generation);
        assert_eq!(grid.mode, before.mode);
        for (after, previous) in grid.keys().zip(before.keys()) {
            assert_eq!(after.id, previous.id);
            assert_eq!(after.definition, previous.definition);
            assert_eq!(after.style.fill, theme.key_color);
            assert_eq!(after.style.text_color, theme.text_color);
        }
        assert_eq!(grid.background, theme.background_color);
    }

    /// Test: Shift relabels letter rows without new ids
    #[test]
    fn test_refresh_labels_between_letter_modes() {
        let mut grid = build_grid(LayoutMode::LettersLower, &dark(), &StyleConfig::default(), 1.0, 2);
        let ids: Vec<KeyId> = grid.keys().map(|key| key.id).collect();

        assert!(refresh_labels(&mut grid, LayoutMode::LettersUpper));
        assert_eq!(grid.mode, LayoutMode::LettersUpper);
        assert_eq!(grid.row_labels(0).unwrap()[0], "Q");
        assert_eq!(grid.key_at(2, 0).map(|k| k.definition.kind), Some(KeyKind::Shift));
        assert_eq!(grid.keys().map(|key| key.id).collect::<Vec<_>>(), ids);

        assert!(refresh_labels(&mut grid, LayoutMode::LettersLower));
        assert_eq!(grid.row_labels(0).unwrap()[0], "q");
    }

    /// Test: Relabeling to a differently shaped table is refused
    #[test]
    fn test_refresh_labels_rejects_numeric() {
        let mut grid = build_grid(LayoutMode::LettersLower, &dark(), &StyleConfig::default(), 1.0, 2);
        let before = grid.clone();

        assert!(!refresh_labels(&mut grid, LayoutMode::Numeric));
        assert_eq!(grid, before);
    }

    /// Test: Keys share their row's width by weight
    #[test]
    fn test_build_grid_width_shares() {
        let grid = build_grid(LayoutMode::LettersLower, &dark(), &StyleConfig::default(), 1.0, 0);
        assert_eq!(grid.key_count(), 10 + 9 + 9 + 4);

        for row in &grid.rows {
            let total: f32 = row.keys.iter().map(|key| key.width_share).sum();
            assert!((total - 1.0).abs() < 1e-5, "row shares sum to {}", total);
        }

        let unit = 1.0 / 7.0;
        assert_eq!(grid.find_label("Space").map(|k| k.width_share), Some(4.0 * unit));
        assert_eq!(grid.key_at(3, 0).map(|k| k.width_share), Some(unit));

        let json = serde_json::to_value(&grid).unwrap();
        assert!(json["rows"][0]["keys"][0]["width_share"].is_number());
    }

    /// Test: Density scaling applies to key geometry
    #[test]
    fn test_build_grid_scaled() {
        let grid = build_grid(LayoutMode::LettersLower, &dark(), &StyleConfig::default(), 1.5, 0);
        let key = grid.key_at(0, 0).unwrap();
        assert_eq!(key.height_px, 90);
        assert_eq!(key.style.border_width_px, 3);
        assert_eq!(key.style.corner_radius_px, 12.0);
        assert_eq!(grid.padding_px, 7);
    }
}
