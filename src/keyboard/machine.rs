// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard state machine.
//!
//! ```text
//!            toggle_shift                switch_to_numeric
//! LettersLower <--------> LettersUpper ---------------------> Numeric
//!      ^                                                          |
//!      +----------------------------------------------------------+
//!                             switch_to_letters
//! ```
//!
//! Shift relabels the displayed grid in place. Entering or leaving numeric
//! mode rebuilds it. Theme changes restyle it in place. Leaving numeric mode
//! always lands on lowercase letters.

use std::sync::Arc;

use crate::app_settings::DELETE_COUNT;
use crate::broadcast::Intent;
use crate::config::{Config, StyleConfig};
use crate::input::{HostAction, HostBridge};
use crate::keyboard::state::{letter_text, KeyboardState, TapOutcome};
use crate::layout::{KeyDefinition, KeyKind, LayoutMode, ModeTarget};
use crate::renderer::{build_grid, refresh_labels, restyle, KeyGrid};
use crate::theme::{Theme, ThemeRegistry};

/// Keyboard core: state, rendered grid and host bridge.
///
/// All methods run to completion synchronously; the owner serializes calls
/// from taps and broadcast intents onto one task.
#[derive(Debug)]
pub struct Keyboard<B: HostBridge> {
    state: KeyboardState,
    registry: Arc<ThemeRegistry>,
    grid: KeyGrid,
    bridge: B,
    scale: f32,
    generation: u64,
}

impl<B: HostBridge> Keyboard<B> {
    /// Creates a keyboard in lowercase letters mode.
    ///
    /// # Arguments
    ///
    /// * `registry` - Themes that `apply_theme` can select
    /// * `theme` - Initial theme
    /// * `style` - Style knobs
    /// * `scale` - Display density in px per dp
    /// * `bridge` - Receiver of committed text and editing actions
    pub fn new(
        registry: Arc<ThemeRegistry>,
        theme: Theme,
        style: StyleConfig,
        scale: f32,
        bridge: B,
    ) -> Self {
        let state = KeyboardState::new(theme, style);
        let grid = build_grid(state.mode, &state.active_theme, &state.style, scale, 0);

        Self {
            state,
            registry,
            grid,
            bridge,
            scale,
            generation: 0,
        }
    }

    /// Creates a keyboard from configuration.
    pub fn from_config(config: &Config, registry: Arc<ThemeRegistry>, bridge: B) -> Self {
        let theme = config.initial_theme(&registry);
        Self::new(
            registry,
            theme,
            config.style.clone(),
            config.effective_scale(),
            bridge,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current state.
    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    /// Current layout mode.
    pub fn mode(&self) -> LayoutMode {
        self.state.mode
    }

    /// Active theme.
    pub fn active_theme(&self) -> &Theme {
        &self.state.active_theme
    }

    /// Displayed grid.
    pub fn grid(&self) -> &KeyGrid {
        &self.grid
    }

    /// Theme registry.
    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Host bridge.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Mutable host bridge.
    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Consumes the keyboard, returning its bridge.
    pub fn into_bridge(self) -> B {
        self.bridge
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Flips between lowercase and uppercase letters.
    ///
    /// Relabels the displayed keys in place. No-op in numeric mode.
    ///
    /// # Returns
    ///
    /// `true` if the mode changed.
    pub fn toggle_shift(&mut self) -> bool {
        let Some(next) = self.state.mode.shifted() else {
            tracing::debug!("Shift ignored in {} mode", self.state.mode);
            return false;
        };

        self.state.mode = next;
        if !refresh_labels(&mut self.grid, next) {
            self.rebuild();
        }
        tracing::debug!("Shift -> {}", next);
        true
    }

    /// Switches to the numeric layout, rebuilding the grid.
    ///
    /// # Returns
    ///
    /// `true` if the mode changed; already being numeric is a no-op.
    pub fn switch_to_numeric(&mut self) -> bool {
        if self.state.mode == LayoutMode::Numeric {
            return false;
        }

        self.state.mode = LayoutMode::Numeric;
        self.rebuild();
        true
    }

    /// Returns from numeric to lowercase letters, rebuilding the grid.
    ///
    /// Shift state from before entering numeric mode is not restored.
    ///
    /// # Returns
    ///
    /// `true` if the mode changed; a no-op outside numeric mode.
    pub fn switch_to_letters(&mut self) -> bool {
        if self.state.mode != LayoutMode::Numeric {
            return false;
        }

        self.state.mode = LayoutMode::LettersLower;
        self.rebuild();
        true
    }

    /// Selects a theme by name and restyles the grid in place.
    ///
    /// Unknown names are ignored without error.
    ///
    /// # Returns
    ///
    /// `true` if the theme was found and applied.
    pub fn apply_theme(&mut self, name: &str) -> bool {
        let Some(theme) = self.registry.lookup(name) else {
            tracing::debug!("Ignoring unknown theme '{}'", name);
            return false;
        };

        self.state.active_theme = theme.clone();
        restyle(
            &mut self.grid,
            &self.state.active_theme,
            &self.state.style,
            self.scale,
        );
        tracing::info!("Applied theme '{}'", name);
        true
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Interprets a tap on `key`.
    pub fn dispatch_tap(&mut self, key: &KeyDefinition) -> TapOutcome {
        let from = self.state.mode;

        match key.kind {
            KeyKind::ModeToggle(ModeTarget::Numeric) => {
                let changed = self.switch_to_numeric();
                self.transition_outcome(from, changed)
            }
            KeyKind::ModeToggle(ModeTarget::Letters) => {
                let changed = self.switch_to_letters();
                self.transition_outcome(from, changed)
            }
            KeyKind::Shift => {
                let changed = self.toggle_shift();
                self.transition_outcome(from, changed)
            }
            KeyKind::Delete => self.forward(HostAction::DeleteBackward(DELETE_COUNT)),
            KeyKind::Enter => self.forward(HostAction::SendEnterKey),
            KeyKind::Settings => self.forward(HostAction::OpenSettingsSurface),
            KeyKind::Space => self.forward(HostAction::CommitText(" ".to_string())),
            KeyKind::Letter => {
                let text = letter_text(&key.label, self.state.mode);
                self.forward(HostAction::CommitText(text))
            }
        }
    }

    /// Taps the displayed key at a grid position.
    ///
    /// # Returns
    ///
    /// `None` if no key is displayed there.
    pub fn tap_at(&mut self, row: usize, column: usize) -> Option<TapOutcome> {
        let key = self.grid.key_at(row, column)?.definition.clone();
        Some(self.dispatch_tap(&key))
    }

    // ========================================================================
    // Host Events
    // ========================================================================

    /// Handles a broadcast theme-change request.
    ///
    /// Intents for other actions, or without a theme name, are ignored.
    pub fn on_theme_change_requested(&mut self, intent: &Intent) -> bool {
        match intent.theme_name() {
            Some(name) => self.apply_theme(name),
            None => {
                tracing::debug!("Ignoring intent {}", intent.action);
                false
            }
        }
    }

    /// Handles the host showing the keyboard.
    ///
    /// Rebuilds the grid; a keyboard left in numeric mode comes back on
    /// lowercase letters.
    pub fn on_external_activate(&mut self) {
        if self.state.mode == LayoutMode::Numeric {
            self.state.mode = LayoutMode::LettersLower;
        }
        self.rebuild();
        tracing::info!("Keyboard activated in {} mode", self.state.mode);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn rebuild(&mut self) {
        self.generation += 1;
        self.grid = build_grid(
            self.state.mode,
            &self.state.active_theme,
            &self.state.style,
            self.scale,
            self.generation,
        );
    }

    fn transition_outcome(&self, from: LayoutMode, changed: bool) -> TapOutcome {
        if changed {
            TapOutcome::ModeChanged {
                from,
                to: self.state.mode,
            }
        } else {
            TapOutcome::Unchanged
        }
    }

    fn forward(&mut self, action: HostAction) -> TapOutcome {
        tracing::debug!("Forwarding {:?}", action);
        self.bridge.forward(&action);
        TapOutcome::Forwarded(action)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RecordingBridge;
    use crate::layout::{bottom_row, letter_rows};
    use crate::theme::Color;

    fn keyboard() -> Keyboard<RecordingBridge> {
        Keyboard::from_config(
            &Config::default(),
            Arc::new(ThemeRegistry::builtin()),
            RecordingBridge::new(),
        )
    }

    fn key(kind: KeyKind) -> KeyDefinition {
        KeyDefinition::new("", kind)
    }

    fn assert_grid_matches(keyboard: &Keyboard<RecordingBridge>, theme: &Theme) {
        let grid = keyboard.grid();
        assert_eq!(grid.background, theme.background_color);
        for rendered in grid.keys() {
            assert_eq!(rendered.style.fill, theme.key_color);
            assert_eq!(rendered.style.text_color, theme.text_color);
            assert_eq!(rendered.style.border_color, keyboard.state().style.border_color);
        }
    }

    /// Test: Initial state is lowercase letters with the Dark theme
    #[test]
    fn test_initial_state() {
        let keyboard = keyboard();
        assert_eq!(keyboard.mode(), LayoutMode::LettersLower);
        assert_eq!(keyboard.active_theme().name, "Dark");
        assert_eq!(keyboard.grid().mode, LayoutMode::LettersLower);
        assert_eq!(keyboard.grid().row_labels(0).unwrap()[0], "q");
    }

    /// Test: Shift then "a" commits "A"
    #[test]
    fn test_shift_then_letter_commits_uppercase() {
        let mut keyboard = keyboard();

        let outcome = keyboard.dispatch_tap(&key(KeyKind::Shift));
        assert_eq!(
            outcome,
            TapOutcome::ModeChanged {
                from: LayoutMode::LettersLower,
                to: LayoutMode::LettersUpper
            }
        );

        keyboard.dispatch_tap(&KeyDefinition::letter("a"));
        assert_eq!(
            keyboard.bridge().actions(),
            &[HostAction::CommitText("A".into())]
        );
    }

    /// Test: Shift parity decides the mode
    #[test]
    fn test_toggle_shift_parity() {
        for count in 0..7 {
            let mut keyboard = keyboard();
            for _ in 0..count {
                assert!(keyboard.toggle_shift());
            }
            let expected = if count % 2 == 0 {
                LayoutMode::LettersLower
            } else {
                LayoutMode::LettersUpper
            };
            assert_eq!(keyboard.mode(), expected, "after {} toggles", count);
            assert_eq!(keyboard.grid().mode, expected);
        }
    }

    /// Test: Shift relabels in place without a rebuild
    #[test]
    fn test_shift_keeps_key_ids() {
        let mut keyboard = keyboard();
        let generation = keyboard.grid().generation;

        keyboard.toggle_shift();
        assert_eq!(keyboard.grid().generation, generation);
        assert_eq!(
            keyboard.grid().row_labels(0).unwrap(),
            letter_rows(LayoutMode::LettersUpper)[0].labels()
        );
    }

    /// Test: Shift is a no-op in numeric mode
    #[test]
    fn test_shift_in_numeric_is_noop() {
        let mut keyboard = keyboard();
        keyboard.switch_to_numeric();
        let grid = keyboard.grid().clone();

        assert!(!keyboard.toggle_shift());
        assert_eq!(keyboard.dispatch_tap(&key(KeyKind::Shift)), TapOutcome::Unchanged);
        assert_eq!(keyboard.mode(), LayoutMode::Numeric);
        assert_eq!(keyboard.grid(), &grid);
    }

    /// Test: The numeric round trip always lands on lowercase
    #[test]
    fn test_numeric_round_trip_resets_shift() {
        for shifted in [false, true] {
            let mut keyboard = keyboard();
            if shifted {
                keyboard.toggle_shift();
            }

            assert!(keyboard.switch_to_numeric());
            assert!(keyboard.switch_to_letters());
            assert_eq!(keyboard.mode(), LayoutMode::LettersLower);
            assert_eq!(keyboard.grid().row_labels(0).unwrap()[0], "q");
        }
    }

    /// Test: Numeric toggle rebuilds the grid and "5" commits "5"
    #[test]
    fn test_numeric_scenario() {
        let mut keyboard = keyboard();
        let generation = keyboard.grid().generation;

        let toggle = bottom_row(LayoutMode::LettersLower).keys[0].clone();
        keyboard.dispatch_tap(&toggle);

        assert_eq!(keyboard.mode(), LayoutMode::Numeric);
        assert!(keyboard.grid().generation > generation);
        assert_eq!(
            keyboard.grid().row_labels(0).unwrap(),
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]
        );

        assert_eq!(
            keyboard.tap_at(0, 4),
            Some(TapOutcome::Forwarded(HostAction::CommitText("5".into())))
        );
    }

    /// Test: Redundant mode switches are no-ops
    #[test]
    fn test_redundant_switches() {
        let mut keyboard = keyboard();
        assert!(!keyboard.switch_to_letters());
        assert_eq!(
            keyboard.dispatch_tap(&key(KeyKind::ModeToggle(ModeTarget::Letters))),
            TapOutcome::Unchanged
        );

        keyboard.switch_to_numeric();
        let generation = keyboard.grid().generation;
        assert!(!keyboard.switch_to_numeric());
        assert_eq!(keyboard.grid().generation, generation);
    }

    /// Test: Letter taps commit per mode
    #[test]
    fn test_letter_commit_rules() {
        let mut keyboard = keyboard();
        keyboard.dispatch_tap(&KeyDefinition::letter("q"));

        keyboard.toggle_shift();
        keyboard.dispatch_tap(&KeyDefinition::letter("z"));
        keyboard.dispatch_tap(&KeyDefinition::letter("Q"));

        keyboard.switch_to_numeric();
        keyboard.dispatch_tap(&KeyDefinition::letter("@"));
        keyboard.dispatch_tap(&KeyDefinition::letter("x"));

        assert_eq!(keyboard.bridge().committed_text(), "qZQ@x");
    }

    /// Test: Every displayed letter commits its uppercase form in upper mode
    #[test]
    fn test_every_upper_letter_commits_uppercase() {
        let mut keyboard = keyboard();
        keyboard.toggle_shift();

        for row in letter_rows(LayoutMode::LettersLower) {
            for definition in row.keys.iter().filter(|k| k.kind == KeyKind::Letter) {
                keyboard.bridge_mut().take_actions();
                keyboard.dispatch_tap(definition);
                assert_eq!(
                    keyboard.bridge().committed_text(),
                    definition.label.to_uppercase()
                );
            }
        }
    }

    /// Test: Delete, enter, settings and space forward host actions
    #[test]
    fn test_action_keys_forward() {
        let mut keyboard = keyboard();
        keyboard.dispatch_tap(&key(KeyKind::Delete));
        keyboard.dispatch_tap(&key(KeyKind::Enter));
        keyboard.dispatch_tap(&key(KeyKind::Settings));
        keyboard.dispatch_tap(&key(KeyKind::Space));

        assert_eq!(
            keyboard.bridge().actions(),
            &[
                HostAction::DeleteBackward(1),
                HostAction::SendEnterKey,
                HostAction::OpenSettingsSurface,
                HostAction::CommitText(" ".into()),
            ]
        );
        assert_eq!(keyboard.mode(), LayoutMode::LettersLower);
    }

    /// Test: Every registered theme restyles the whole grid
    #[test]
    fn test_apply_every_theme() {
        let mut keyboard = keyboard();
        let registry = ThemeRegistry::builtin();

        for theme in &registry {
            let mode = keyboard.mode();
            assert!(keyboard.apply_theme(&theme.name));
            assert_eq!(keyboard.active_theme(), theme);
            assert_eq!(keyboard.mode(), mode);
            assert_grid_matches(&keyboard, theme);
            keyboard.toggle_shift();
        }
    }

    /// Test: Applying a theme keeps labels and key ids
    #[test]
    fn test_apply_theme_restyles_in_place() {
        let mut keyboard = keyboard();
        keyboard.switch_to_numeric();
        let before = keyboard.grid().clone();

        keyboard.apply_theme("Ocean Blue");
        let after = keyboard.grid();
        assert_eq!(after.generation, before.generation);
        for (new, old) in after.keys().zip(before.keys()) {
            assert_eq!(new.id, old.id);
            assert_eq!(new.definition, old.definition);
        }
        assert_eq!(after.keys().next().unwrap().style.fill, Color::from_argb(0xFF1E_90FF));
    }

    /// Test: Unknown theme names leave everything unchanged
    #[test]
    fn test_unknown_theme_is_noop() {
        let registry = ThemeRegistry::new(
            ThemeRegistry::builtin()
                .iter()
                .filter(|theme| theme.name != "Gray")
                .cloned()
                .collect(),
        )
        .unwrap();
        let mut keyboard = Keyboard::from_config(
            &Config::default(),
            Arc::new(registry),
            RecordingBridge::new(),
        );
        keyboard.apply_theme("Forest");
        let state = keyboard.state().clone();
        let grid = keyboard.grid().clone();

        assert!(!keyboard.apply_theme("Gray"));
        assert_eq!(keyboard.state(), &state);
        assert_eq!(keyboard.grid(), &grid);

        // Later restyles keep using the previously active theme
        keyboard.toggle_shift();
        keyboard.switch_to_numeric();
        assert_eq!(keyboard.active_theme().name, "Forest");
        assert_grid_matches(&keyboard, &state.active_theme);
    }

    /// Test: Theme-change intents apply their theme; others are ignored
    #[test]
    fn test_on_theme_change_requested() {
        let mut keyboard = keyboard();

        assert!(keyboard.on_theme_change_requested(&Intent::change_theme("Soft Pink")));
        assert_eq!(keyboard.active_theme().name, "Soft Pink");

        assert!(!keyboard.on_theme_change_requested(&Intent::change_theme("Nope")));
        assert!(!keyboard.on_theme_change_requested(&Intent::new("ACTION_CHANGE_THEME")));
        assert!(!keyboard.on_theme_change_requested(
            &Intent::new("OTHER").with_extra("theme_name", "Dark")
        ));
        assert_eq!(keyboard.active_theme().name, "Soft Pink");
    }

    /// Test: External activation shows letters and a fresh grid
    #[test]
    fn test_on_external_activate() {
        let mut keyboard = keyboard();
        keyboard.switch_to_numeric();
        let generation = keyboard.grid().generation;

        keyboard.on_external_activate();
        assert_eq!(keyboard.mode(), LayoutMode::LettersLower);
        assert!(keyboard.grid().generation > generation);

        keyboard.toggle_shift();
        keyboard.on_external_activate();
        assert_eq!(keyboard.mode(), LayoutMode::LettersUpper);
        assert_eq!(keyboard.grid().row_labels(0).unwrap()[0], "Q");
    }

    /// Test: Tapping outside the grid does nothing
    #[test]
    fn test_tap_outside_grid() {
        let mut keyboard = keyboard();
        assert_eq!(keyboard.tap_at(0, 99), None);
        assert_eq!(keyboard.tap_at(99, 0), None);
        assert!(keyboard.bridge().actions().is_empty());
    }

    /// Test: Typing a word through grid positions
    #[test]
    fn test_type_word_through_grid() {
        let mut keyboard = keyboard();

        // Shift (row 2, col 0), "H" (row 1, col 5), "i" (row 0, col 7)
        keyboard.tap_at(2, 0);
        keyboard.tap_at(1, 5);
        keyboard.tap_at(2, 0);
        keyboard.tap_at(0, 7);
        // Enter is the third key of the bottom row
        keyboard.tap_at(3, 2);

        let mut bridge = keyboard.into_bridge();
        assert_eq!(bridge.committed_text(), "Hi");
        assert_eq!(bridge.take_actions().last(), Some(&HostAction::SendEnterKey));
    }
}
