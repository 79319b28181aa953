// SPDX-License-Identifier: GPL-3.0-only

//! Host bridge that synthesizes evdev key events.
//!
//! Committed text is typed character by character using the system XKB
//! keymap. Characters on a shifted level are wrapped in Left Shift; characters
//! missing from the keymap fall back to the Ctrl+Shift+U hex input method:
//!
//! 1. Press Ctrl+Shift+U
//! 2. Type the hex codepoint (e.g., "3c0" for pi)
//! 3. Press Space to commit
//!
//! Events are only produced, never injected: they queue up until drained
//! with [`VirtualKeyboard::take_pending_events`]. No compositor protocol is
//! connected, so the daemon drains them per action and logs them at debug
//! level. Text reaches the focused field through the D-Bus signals.

use xkbcommon::xkb;
use xkbcommon::xkb::Keysym;

use crate::input::HostBridge;

/// Key event direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Key went down
    Pressed,
    /// Key went up
    Released,
}

/// One queued key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The evdev keycode
    pub keycode: u32,
    /// Press or release
    pub state: KeyState,
}

impl KeyEvent {
    /// Creates a key press event.
    #[must_use]
    pub fn press(keycode: u32) -> Self {
        Self {
            keycode,
            state: KeyState::Pressed,
        }
    }

    /// Creates a key release event.
    #[must_use]
    pub fn release(keycode: u32) -> Self {
        Self {
            keycode,
            state: KeyState::Released,
        }
    }
}

/// Position of a keysym in the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyPosition {
    keycode: u32,
    shifted: bool,
}

/// XKB-backed keyboard event synthesizer.
///
/// Not thread-safe; owned by the task that drains host actions.
pub struct VirtualKeyboard {
    keymap: Option<xkb::Keymap>,
    pending_events: Vec<KeyEvent>,
}

impl std::fmt::Debug for VirtualKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualKeyboard")
            .field("initialized", &self.keymap.is_some())
            .field("pending_events", &self.pending_events.len())
            .finish()
    }
}

impl Default for VirtualKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualKeyboard {
    /// Creates an uninitialized virtual keyboard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keymap: None,
            pending_events: Vec::new(),
        }
    }

    /// Loads the system XKB keymap.
    ///
    /// # Errors
    ///
    /// Returns an error string if no keymap can be compiled from the
    /// environment defaults.
    pub fn initialize(&mut self) -> Result<(), String> {
        if self.keymap.is_some() {
            return Ok(());
        }

        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = xkb::Keymap::new_from_names(
            &context,
            &"",
            &"",
            &"",
            &"",
            None,
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or_else(|| "Failed to create XKB keymap from system defaults".to_string())?;

        self.keymap = Some(keymap);
        tracing::info!("Virtual keyboard initialized with system XKB keymap");
        Ok(())
    }

    /// Returns whether a keymap is loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.keymap.is_some()
    }

    /// Returns the queued events and clears the queue.
    #[must_use]
    pub fn take_pending_events(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Queued events.
    #[must_use]
    pub fn pending_events(&self) -> &[KeyEvent] {
        &self.pending_events
    }

    /// Queues a press and release of `keycode`.
    pub fn tap_key(&mut self, keycode: u32) {
        if !self.is_initialized() {
            tracing::warn!("Virtual keyboard not initialized, ignoring keycode {}", keycode);
            return;
        }
        self.pending_events.push(KeyEvent::press(keycode));
        self.pending_events.push(KeyEvent::release(keycode));
    }

    /// Types one character, falling back to hex input when unmapped.
    pub fn type_char(&mut self, c: char) {
        if !self.is_initialized() {
            tracing::warn!("Virtual keyboard not initialized, ignoring '{}'", c);
            return;
        }

        match self.find_keysym(xkb::utf32_to_keysym(c as u32)) {
            Some(KeyPosition { keycode, shifted: false }) => self.tap_key(keycode),
            Some(KeyPosition { keycode, shifted: true }) => {
                self.pending_events.push(KeyEvent::press(keycodes::KEY_LEFTSHIFT));
                self.tap_key(keycode);
                self.pending_events.push(KeyEvent::release(keycodes::KEY_LEFTSHIFT));
            }
            None => self.emit_unicode_codepoint(c as u32),
        }
    }

    /// Types a codepoint through the Ctrl+Shift+U sequence.
    pub fn emit_unicode_codepoint(&mut self, codepoint: u32) {
        if !self.is_initialized() {
            return;
        }
        tracing::debug!("Using Ctrl+Shift+U fallback for U+{:04X}", codepoint);

        self.pending_events.push(KeyEvent::press(keycodes::KEY_LEFTCTRL));
        self.pending_events.push(KeyEvent::press(keycodes::KEY_LEFTSHIFT));
        self.tap_key(keycodes::KEY_U);

        for digit in format!("{:x}", codepoint).chars() {
            if let Some(keycode) = keycodes::hex_digit(digit) {
                self.tap_key(keycode);
            }
        }

        self.tap_key(keycodes::KEY_SPACE);
        self.pending_events.push(KeyEvent::release(keycodes::KEY_LEFTSHIFT));
        self.pending_events.push(KeyEvent::release(keycodes::KEY_LEFTCTRL));
    }

    /// Finds the first key producing `target` on level 0 or 1.
    fn find_keysym(&self, target: Keysym) -> Option<KeyPosition> {
        let keymap = self.keymap.as_ref()?;

        for raw in keymap.min_keycode().raw()..=keymap.max_keycode().raw() {
            let keycode = xkb::Keycode::new(raw);
            let levels = keymap.num_levels_for_key(keycode, 0).min(2);
            for level in 0..levels {
                if keymap
                    .key_get_syms_by_level(keycode, 0, level)
                    .contains(&target)
                {
                    // XKB keycodes are evdev keycodes offset by 8
                    return Some(KeyPosition {
                        keycode: raw - 8,
                        shifted: level == 1,
                    });
                }
            }
        }

        None
    }
}

impl HostBridge for VirtualKeyboard {
    fn commit_text(&mut self, text: &str) {
        for c in text.chars() {
            self.type_char(c);
        }
    }

    fn delete_backward(&mut self, count: i32) {
        for _ in 0..count.max(0) {
            self.tap_key(keycodes::KEY_BACKSPACE);
        }
    }

    fn send_enter_key(&mut self) {
        self.tap_key(keycodes::KEY_ENTER);
    }

    fn open_settings_surface(&mut self) {
        tracing::debug!("Settings request has no key equivalent");
    }
}

// ============================================================================
// Keycodes (evdev)
// ============================================================================

/// Evdev keycodes used by the synthesizer.
pub mod keycodes {
    /// Backspace key
    pub const KEY_BACKSPACE: u32 = 14;
    /// Enter/Return key
    pub const KEY_ENTER: u32 = 28;
    /// Left Control key
    pub const KEY_LEFTCTRL: u32 = 29;
    /// Left Shift key
    pub const KEY_LEFTSHIFT: u32 = 42;
    /// Space key
    pub const KEY_SPACE: u32 = 57;
    /// U key
    pub const KEY_U: u32 = 22;

    const DIGITS: [u32; 10] = [11, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    const HEX_LETTERS: [u32; 6] = [30, 48, 46, 32, 18, 33];

    /// Keycode of a hex digit on a US layout.
    pub fn hex_digit(c: char) -> Option<u32> {
        match c.to_ascii_lowercase() {
            d @ '0'..='9' => Some(DIGITS[d as usize - '0' as usize]),
            l @ 'a'..='f' => Some(HEX_LETTERS[l as usize - 'a' as usize]),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HostAction;

    fn initialized() -> Option<VirtualKeyboard> {
        let mut vk = VirtualKeyboard::new();
        // XKB data may be missing in CI environments
        vk.initialize().ok().map(|_| vk)
    }

    /// Test: Hex digits map to their evdev keycodes
    #[test]
    fn test_hex_digit_keycodes() {
        assert_eq!(keycodes::hex_digit('0'), Some(11));
        assert_eq!(keycodes::hex_digit('1'), Some(2));
        assert_eq!(keycodes::hex_digit('c'), Some(46));
        assert_eq!(keycodes::hex_digit('F'), Some(33));
        assert_eq!(keycodes::hex_digit('g'), None);
    }

    /// Test: Uninitialized keyboards queue nothing
    #[test]
    fn test_uninitialized_ignores_actions() {
        let mut vk = VirtualKeyboard::new();
        vk.commit_text("abc");
        vk.delete_backward(1);
        vk.send_enter_key();
        assert!(vk.pending_events().is_empty());
    }

    /// Test: Delete and enter tap their keys
    #[test]
    fn test_editing_keys() {
        let Some(mut vk) = initialized() else {
            return;
        };

        vk.delete_backward(1);
        vk.send_enter_key();
        assert_eq!(
            vk.take_pending_events(),
            vec![
                KeyEvent::press(keycodes::KEY_BACKSPACE),
                KeyEvent::release(keycodes::KEY_BACKSPACE),
                KeyEvent::press(keycodes::KEY_ENTER),
                KeyEvent::release(keycodes::KEY_ENTER),
            ]
        );
        assert!(vk.pending_events().is_empty());
    }

    /// Test: Unicode fallback wraps hex digits in Ctrl+Shift+U ... Space
    #[test]
    fn test_unicode_fallback_sequence() {
        let Some(mut vk) = initialized() else {
            return;
        };

        vk.emit_unicode_codepoint(0x03C0);
        let events = vk.take_pending_events();

        assert_eq!(events.first(), Some(&KeyEvent::press(keycodes::KEY_LEFTCTRL)));
        assert_eq!(events.last(), Some(&KeyEvent::release(keycodes::KEY_LEFTCTRL)));
        // Ctrl, Shift, U tap, three digits, Space tap, Shift, Ctrl
        assert_eq!(events.len(), 2 + 2 + 3 * 2 + 2 + 2);
    }

    /// Test: Forwarded actions produce events only until drained
    #[test]
    fn test_forward_then_drain() {
        let Some(mut vk) = initialized() else {
            return;
        };

        vk.forward(&HostAction::SendEnterKey);
        vk.forward(&HostAction::OpenSettingsSurface);
        assert_eq!(
            vk.take_pending_events(),
            vec![
                KeyEvent::press(keycodes::KEY_ENTER),
                KeyEvent::release(keycodes::KEY_ENTER),
            ]
        );
        assert!(vk.take_pending_events().is_empty());
    }

    /// Test: Every committed character produces balanced events
    #[test]
    fn test_commit_text_balanced() {
        let Some(mut vk) = initialized() else {
            return;
        };

        vk.commit_text("aA5");
        let events = vk.take_pending_events();
        let presses = events.iter().filter(|e| e.state == KeyState::Pressed).count();
        let releases = events.iter().filter(|e| e.state == KeyState::Released).count();
        assert!(presses >= 3);
        assert_eq!(presses, releases);
    }
}
