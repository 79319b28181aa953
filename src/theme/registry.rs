// SPDX-License-Identifier: GPL-3.0-only

//! Theme definitions and the ordered theme registry.

use serde::{Deserialize, Serialize};

use crate::theme::color::Color;
use crate::theme::presets;
use crate::theme::types::ThemeError;

/// A named background/key/text color triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Unique theme name (e.g., "Ocean Blue")
    pub name: String,
    /// Keyboard surface background
    pub background_color: Color,
    /// Fill color of every key
    pub key_color: Color,
    /// Key label color
    pub text_color: Color,
}

impl Theme {
    /// Creates a new theme.
    pub fn new(
        name: impl Into<String>,
        background_color: Color,
        key_color: Color,
        text_color: Color,
    ) -> Self {
        Self {
            name: name.into(),
            background_color,
            key_color,
            text_color,
        }
    }
}

/// Immutable, insertion-ordered mapping from theme name to [`Theme`].
///
/// Names are unique. Lookups are read-only and an unknown name simply
/// yields `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl ThemeRegistry {
    /// Creates a registry from an ordered list of themes.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::DuplicateName`] if two themes share a name and
    /// [`ThemeError::Empty`] if the list is empty.
    pub fn new(themes: Vec<Theme>) -> Result<Self, ThemeError> {
        if themes.is_empty() {
            return Err(ThemeError::Empty { file_path: None });
        }

        for (index, theme) in themes.iter().enumerate() {
            if themes[..index].iter().any(|other| other.name == theme.name) {
                return Err(ThemeError::DuplicateName(theme.name.clone()));
            }
        }

        Ok(Self { themes })
    }

    /// Returns the built-in theme catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            themes: presets::builtin_themes(),
        }
    }

    /// Looks up a theme by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.name == name)
    }

    /// Returns `true` if a theme with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Iterates themes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Theme> {
        self.themes.iter()
    }

    /// Returns theme names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.themes.iter().map(|theme| theme.name.clone()).collect()
    }

    /// Returns the first theme in the registry.
    #[must_use]
    pub fn first(&self) -> &Theme {
        // A registry is never empty; both constructors guarantee it.
        &self.themes[0]
    }

    /// Returns the number of themes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a ThemeRegistry {
    type Item = &'a Theme;
    type IntoIter = std::slice::Iter<'a, Theme>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
