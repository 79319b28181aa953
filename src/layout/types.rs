// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard layouts.
//!
//! A layout is an ordered list of [`RowDefinition`]s, each an ordered list of
//! [`KeyDefinition`]s. Every key carries a closed [`KeyKind`] that decides how
//! a tap on it is interpreted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::app_settings::SPACE_WEIGHT;

// ============================================================================
// Layout Mode
// ============================================================================

/// The active key set. Exactly one is shown at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Lowercase letters (initial mode)
    #[default]
    LettersLower,
    /// Uppercase letters
    LettersUpper,
    /// Digits and symbols
    Numeric,
}

impl LayoutMode {
    /// Returns `true` for either letters mode.
    pub fn is_letters(self) -> bool {
        matches!(self, LayoutMode::LettersLower | LayoutMode::LettersUpper)
    }

    /// Returns the other letters mode, or `None` in numeric mode.
    pub fn shifted(self) -> Option<LayoutMode> {
        match self {
            LayoutMode::LettersLower => Some(LayoutMode::LettersUpper),
            LayoutMode::LettersUpper => Some(LayoutMode::LettersLower),
            LayoutMode::Numeric => None,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutMode::LettersLower => "letters-lower",
            LayoutMode::LettersUpper => "letters-upper",
            LayoutMode::Numeric => "numeric",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Key Kinds
// ============================================================================

/// Destination of a mode-toggle key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeTarget {
    /// Switch to the numeric/symbol layout
    Numeric,
    /// Switch back to (lowercase) letters
    Letters,
}

/// What a key does when tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum KeyKind {
    /// Commits its label (letters, digits and symbols alike)
    Letter,
    /// Flips between lowercase and uppercase letters
    Shift,
    /// Deletes one character before the cursor
    Delete,
    /// Sends the enter key
    Enter,
    /// Opens the host settings surface
    Settings,
    /// Switches between letters and numeric layouts
    ModeToggle(ModeTarget),
    /// Commits a single space
    Space,
}

impl KeyKind {
    /// Relative width of keys of this kind within their row.
    pub fn default_weight(self) -> f32 {
        match self {
            KeyKind::Space => SPACE_WEIGHT,
            _ => 1.0,
        }
    }
}

// ============================================================================
// Keys and Rows
// ============================================================================

/// A key as defined by a layout table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyDefinition {
    /// Displayed label; for [`KeyKind::Letter`] this is the committed text
    pub label: String,
    /// Tap behavior
    pub kind: KeyKind,
}

impl KeyDefinition {
    /// Creates a key definition.
    pub fn new(label: impl Into<String>, kind: KeyKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Creates a character key.
    pub fn letter(label: impl Into<String>) -> Self {
        Self::new(label, KeyKind::Letter)
    }

    /// Relative width of this key within its row.
    pub fn weight(&self) -> f32 {
        self.kind.default_weight()
    }
}

/// An ordered row of key definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowDefinition {
    /// Keys from left to right
    pub keys: Vec<KeyDefinition>,
}

impl RowDefinition {
    /// Creates a row from key definitions.
    pub fn new(keys: Vec<KeyDefinition>) -> Self {
        Self { keys }
    }

    /// Creates a row of character keys from their labels.
    pub fn letters(labels: &[&str]) -> Self {
        Self::new(labels.iter().map(|label| KeyDefinition::letter(*label)).collect())
    }

    /// Number of keys in the row.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the row has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Labels from left to right.
    pub fn labels(&self) -> Vec<&str> {
        self.keys.iter().map(|key| key.label.as_str()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: Shift only pairs the two letter modes
    #[test]
    fn test_layout_mode_shifted() {
        assert_eq!(LayoutMode::LettersLower.shifted(), Some(LayoutMode::LettersUpper));
        assert_eq!(LayoutMode::LettersUpper.shifted(), Some(LayoutMode::LettersLower));
        assert_eq!(LayoutMode::Numeric.shifted(), None);
        assert!(!LayoutMode::Numeric.is_letters());
        assert_eq!(LayoutMode::default(), LayoutMode::LettersLower);
    }

    /// Test: Space is the only wide key
    #[test]
    fn test_default_weights() {
        assert_eq!(KeyKind::Space.default_weight(), SPACE_WEIGHT);
        assert_eq!(KeyKind::Letter.default_weight(), 1.0);
        assert_eq!(KeyKind::ModeToggle(ModeTarget::Numeric).default_weight(), 1.0);
    }

    /// Test: Key kinds serialize with a kind tag
    #[test]
    fn test_key_kind_serialization() {
        let json = serde_json::to_string(&KeyKind::ModeToggle(ModeTarget::Letters)).unwrap();
        assert_eq!(json, r#"{"kind":"mode_toggle","target":"letters"}"#);

        let json = serde_json::to_string(&KeyKind::Delete).unwrap();
        assert_eq!(json, r#"{"kind":"delete"}"#);
    }

    /// Test: Row helpers build character keys
    #[test]
    fn test_row_letters() {
        let row = RowDefinition::letters(&["q", "w", "e"]);
        assert_eq!(row.len(), 3);
        assert_eq!(row.labels(), vec!["q", "w", "e"]);
        assert!(row.keys.iter().all(|key| key.kind == KeyKind::Letter));
    }
}
