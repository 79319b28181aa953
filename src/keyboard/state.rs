// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard state values.

use crate::config::StyleConfig;
use crate::input::HostAction;
use crate::layout::LayoutMode;
use crate::theme::Theme;

/// Everything the keyboard owns besides its rendered grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardState {
    /// Active key set
    pub mode: LayoutMode,
    /// Theme applied to the grid
    pub active_theme: Theme,
    /// Style knobs applied to the grid
    pub style: StyleConfig,
}

impl KeyboardState {
    /// Initial state: lowercase letters with the given theme and style.
    pub fn new(active_theme: Theme, style: StyleConfig) -> Self {
        Self {
            mode: LayoutMode::LettersLower,
            active_theme,
            style,
        }
    }
}

/// What a tap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// The layout mode changed
    ModeChanged {
        /// Mode before the tap
        from: LayoutMode,
        /// Mode after the tap
        to: LayoutMode,
    },
    /// A transition that does not apply to the current mode
    Unchanged,
    /// An action was forwarded to the host
    Forwarded(HostAction),
}

/// Text committed by a character key in `mode`.
///
/// Only uppercase letter mode changes the label, and only for a single
/// alphabetic character. Everything else is committed verbatim.
pub fn letter_text(label: &str, mode: LayoutMode) -> String {
    if mode != LayoutMode::LettersUpper {
        return label.to_string();
    }

    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => c.to_uppercase().collect(),
        _ => label.to_string(),
    }
}
