// SPDX-License-Identifier: GPL-3.0-only

//! Static key tables for every layout mode.
//!
//! The lowercase and uppercase letter tables have identical shape so a shift
//! toggle can relabel keys position by position. The numeric table differs in
//! both count and kind, which is why switching to it rebuilds the grid.

use crate::app_settings::{
    ICON_DELETE, ICON_ENTER, ICON_SETTINGS, ICON_SHIFT_DOWN, ICON_SHIFT_UP, LABEL_SPACE,
    LABEL_TO_LETTERS, LABEL_TO_NUMERIC,
};
use crate::layout::types::{KeyDefinition, KeyKind, LayoutMode, ModeTarget, RowDefinition};

const LOWER_ROW_1: [&str; 10] = ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"];
const LOWER_ROW_2: [&str; 9] = ["a", "s", "d", "f", "g", "h", "j", "k", "l"];
const LOWER_ROW_3: [&str; 7] = ["z", "x", "c", "v", "b", "n", "m"];

const UPPER_ROW_1: [&str; 10] = ["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"];
const UPPER_ROW_2: [&str; 9] = ["A", "S", "D", "F", "G", "H", "J", "K", "L"];
const UPPER_ROW_3: [&str; 7] = ["Z", "X", "C", "V", "B", "N", "M"];

const NUMERIC_ROW_1: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];
const NUMERIC_ROW_2: [&str; 10] = ["-", "/", ";", ":", "(", ")", "$", "&", "@", "\""];
const NUMERIC_ROW_3: [&str; 8] = ["^", ".", ",", "?", "!", "#", "%", "*"];

/// Returns the letter rows for a letters mode.
///
/// The third row is framed by shift on the left and delete on the right. The
/// shift glyph points up on the lowercase table and down on the uppercase one.
///
/// # Arguments
///
/// * `mode` - `LettersLower` or `LettersUpper`; `Numeric` yields the numeric rows
pub fn letter_rows(mode: LayoutMode) -> Vec<RowDefinition> {
    let (row_1, row_2, row_3, shift_icon): (&[&str], &[&str], &[&str], &str) = match mode {
        LayoutMode::LettersLower => (&LOWER_ROW_1, &LOWER_ROW_2, &LOWER_ROW_3, ICON_SHIFT_UP),
        LayoutMode::LettersUpper => (&UPPER_ROW_1, &UPPER_ROW_2, &UPPER_ROW_3, ICON_SHIFT_DOWN),
        LayoutMode::Numeric => return numeric_rows(),
    };

    let mut third = Vec::with_capacity(row_3.len() + 2);
    third.push(KeyDefinition::new(shift_icon, KeyKind::Shift));
    third.extend(row_3.iter().map(|label| KeyDefinition::letter(*label)));
    third.push(KeyDefinition::new(ICON_DELETE, KeyKind::Delete));

    vec![
        RowDefinition::letters(row_1),
        RowDefinition::letters(row_2),
        RowDefinition::new(third),
    ]
}

/// Returns the digit and symbol rows.
pub fn numeric_rows() -> Vec<RowDefinition> {
    let mut third: Vec<KeyDefinition> = NUMERIC_ROW_3
        .iter()
        .map(|label| KeyDefinition::letter(*label))
        .collect();
    third.push(KeyDefinition::new(ICON_DELETE, KeyKind::Delete));

    vec![
        RowDefinition::letters(&NUMERIC_ROW_1),
        RowDefinition::letters(&NUMERIC_ROW_2),
        RowDefinition::new(third),
    ]
}

/// Returns the fixed bottom action row.
///
/// The composition is the same in every mode; only the toggle's label and
/// target change.
pub fn bottom_row(mode: LayoutMode) -> RowDefinition {
    let toggle = if mode.is_letters() {
        KeyDefinition::new(LABEL_TO_NUMERIC, KeyKind::ModeToggle(ModeTarget::Numeric))
    } else {
        KeyDefinition::new(LABEL_TO_LETTERS, KeyKind::ModeToggle(ModeTarget::Letters))
    };

    RowDefinition::new(vec![
        toggle,
        KeyDefinition::new(LABEL_SPACE, KeyKind::Space),
        KeyDefinition::new(ICON_ENTER, KeyKind::Enter),
        KeyDefinition::new(ICON_SETTINGS, KeyKind::Settings),
    ])
}

/// Returns every row shown for `mode`, bottom action row last.
pub fn rows_for(mode: LayoutMode) -> Vec<RowDefinition> {
    let mut rows = letter_rows(mode);
    rows.push(bottom_row(mode));
    rows
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: Upper and lower tables line up key by key
    #[test]
    fn test_letter_tables_have_same_shape() {
        let lower = rows_for(LayoutMode::LettersLower);
        let upper = rows_for(LayoutMode::LettersUpper);

        assert_eq!(lower.len(), upper.len());
        for (lower_row, upper_row) in lower.iter().zip(&upper) {
            assert_eq!(lower_row.len(), upper_row.len());
            for (l, u) in lower_row.keys.iter().zip(&upper_row.keys) {
                assert_eq!(l.kind, u.kind);
                if l.kind == KeyKind::Letter {
                    assert_eq!(l.label.to_uppercase(), u.label);
                }
            }
        }
    }

    /// Test: Third letter row is framed by shift and delete
    #[test]
    fn test_third_row_framing() {
        let rows = letter_rows(LayoutMode::LettersLower);
        let third = &rows[2];
        assert_eq!(third.keys.first().map(|k| k.kind), Some(KeyKind::Shift));
        assert_eq!(third.keys.first().map(|k| k.label.as_str()), Some(ICON_SHIFT_UP));
        assert_eq!(third.keys.last().map(|k| k.kind), Some(KeyKind::Delete));

        let upper = letter_rows(LayoutMode::LettersUpper);
        assert_eq!(upper[2].keys[0].label, ICON_SHIFT_DOWN);
    }

    /// Test: Numeric rows start with the digits and have no shift key
    #[test]
    fn test_numeric_rows() {
        let rows = numeric_rows();
        assert_eq!(
            rows[0].labels(),
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]
        );
        assert_eq!(rows[1].labels().last(), Some(&"\""));
        assert!(rows
            .iter()
            .flat_map(|row| &row.keys)
            .all(|key| key.kind != KeyKind::Shift));
        assert_eq!(letter_rows(LayoutMode::Numeric), rows);
    }

    /// Test: Bottom row composition is fixed; only the toggle changes
    #[test]
    fn test_bottom_row() {
        let letters = bottom_row(LayoutMode::LettersUpper);
        let numeric = bottom_row(LayoutMode::Numeric);

        let kinds = |row: &RowDefinition| row.keys.iter().map(|k| k.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds(&letters),
            vec![
                KeyKind::ModeToggle(ModeTarget::Numeric),
                KeyKind::Space,
                KeyKind::Enter,
                KeyKind::Settings
            ]
        );
        assert_eq!(numeric.keys[0].kind, KeyKind::ModeToggle(ModeTarget::Letters));
        assert_eq!(letters.keys[0].label, LABEL_TO_NUMERIC);
        assert_eq!(numeric.keys[0].label, LABEL_TO_LETTERS);
        assert_eq!(kinds(&letters)[1..], kinds(&numeric)[1..]);
    }

    /// Test: Every mode shows four rows with the action row last
    #[test]
    fn test_rows_for_every_mode() {
        for mode in [LayoutMode::LettersLower, LayoutMode::LettersUpper, LayoutMode::Numeric] {
            let rows = rows_for(mode);
            assert_eq!(rows.len(), 4, "{}", mode);
            assert_eq!(rows[3], bottom_row(mode));
        }
    }
}
