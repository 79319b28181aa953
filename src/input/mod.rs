// SPDX-License-Identifier: GPL-3.0-only

//! Host bridge: how committed text and editing actions leave the keyboard.
//!
//! The keyboard never talks to a text field directly. Every tap that
//! produces output is forwarded to a [`HostBridge`], which is responsible
//! for delivering it to whatever currently has focus. Delivery is
//! fire-and-forget: when nothing has focus the action is simply dropped.
//!
//! # Bridges
//!
//! - [`RecordingBridge`]: keeps every action in memory (tests, dry runs)
//! - [`ChannelBridge`]: sends actions over an unbounded channel to an async
//!   consumer (the D-Bus signal emitter in the daemon)
//! - `VirtualKeyboard` (feature `virtual-keyboard`): turns actions into
//!   evdev key events using the system XKB keymap; the events are produced
//!   and logged, not injected into the compositor
//!
//! # Example
//!
//! ```rust,ignore
//! use tapboard::input::{HostAction, HostBridge, RecordingBridge};
//!
//! let mut bridge = RecordingBridge::new();
//! bridge.commit_text("A");
//! bridge.delete_backward(1);
//! assert_eq!(
//!     bridge.actions(),
//!     &[HostAction::CommitText("A".into()), HostAction::DeleteBackward(1)]
//! );
//! ```

#[cfg(feature = "virtual-keyboard")]
pub mod virtual_keyboard;

#[cfg(feature = "virtual-keyboard")]
pub use virtual_keyboard::{keycodes, KeyEvent, KeyState, VirtualKeyboard};

use futures::channel::mpsc::UnboundedSender;
use serde::Serialize;

// ============================================================================
// Host Actions
// ============================================================================

/// An action forwarded to the focused text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum HostAction {
    /// Insert text at the cursor
    CommitText(String),
    /// Delete this many characters before the cursor
    DeleteBackward(i32),
    /// Send the enter key
    SendEnterKey,
    /// Open the host's keyboard settings surface
    OpenSettingsSurface,
}

// ============================================================================
// Host Bridge Trait
// ============================================================================

/// Receiver of keyboard output.
///
/// Implementations must not fail: the keyboard treats every forwarded
/// action as delivered.
pub trait HostBridge {
    /// Inserts text at the cursor of the focused field.
    fn commit_text(&mut self, text: &str);

    /// Deletes `count` characters before the cursor.
    fn delete_backward(&mut self, count: i32);

    /// Sends the enter key to the focused field.
    fn send_enter_key(&mut self);

    /// Asks the host to show its keyboard settings surface.
    fn open_settings_surface(&mut self);

    /// Forwards a [`HostAction`] through the matching method.
    fn forward(&mut self, action: &HostAction) {
        match action {
            HostAction::CommitText(text) => self.commit_text(text),
            HostAction::DeleteBackward(count) => self.delete_backward(*count),
            HostAction::SendEnterKey => self.send_enter_key(),
            HostAction::OpenSettingsSurface => self.open_settings_surface(),
        }
    }
}

impl<B: HostBridge + ?Sized> HostBridge for Box<B> {
    fn commit_text(&mut self, text: &str) {
        (**self).commit_text(text);
    }

    fn delete_backward(&mut self, count: i32) {
        (**self).delete_backward(count);
    }

    fn send_enter_key(&mut self) {
        (**self).send_enter_key();
    }

    fn open_settings_surface(&mut self) {
        (**self).open_settings_surface();
    }
}

// ============================================================================
// Recording Bridge
// ============================================================================

/// Bridge that records actions in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingBridge {
    actions: Vec<HostAction>,
}

impl RecordingBridge {
    /// Creates an empty recording bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions recorded so far.
    #[must_use]
    pub fn actions(&self) -> &[HostAction] {
        &self.actions
    }

    /// Returns the recorded actions and clears the log.
    pub fn take_actions(&mut self) -> Vec<HostAction> {
        std::mem::take(&mut self.actions)
    }

    /// Concatenation of all committed text.
    #[must_use]
    pub fn committed_text(&self) -> String {
        self.actions
            .iter()
            .filter_map(|action| match action {
                HostAction::CommitText(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl HostBridge for RecordingBridge {
    fn commit_text(&mut self, text: &str) {
        self.actions.push(HostAction::CommitText(text.to_string()));
    }

    fn delete_backward(&mut self, count: i32) {
        self.actions.push(HostAction::DeleteBackward(count));
    }

    fn send_enter_key(&mut self) {
        self.actions.push(HostAction::SendEnterKey);
    }

    fn open_settings_surface(&mut self) {
        self.actions.push(HostAction::OpenSettingsSurface);
    }
}

// ============================================================================
// Channel Bridge
// ============================================================================

/// Bridge that sends actions to an async consumer.
///
/// If the consumer is gone the action is dropped and logged at debug level.
#[derive(Debug, Clone)]
pub struct ChannelBridge {
    tx: UnboundedSender<HostAction>,
}

impl ChannelBridge {
    /// Wraps the sending half of an unbounded channel.
    #[must_use]
    pub fn new(tx: UnboundedSender<HostAction>) -> Self {
        Self { tx }
    }

    fn send(&self, action: HostAction) {
        if let Err(e) = self.tx.unbounded_send(action) {
            tracing::debug!("No host listening, dropped {:?}", e.into_inner());
        }
    }
}

impl HostBridge for ChannelBridge {
    fn commit_text(&mut self, text: &str) {
        self.send(HostAction::CommitText(text.to_string()));
    }

    fn delete_backward(&mut self, count: i32) {
        self.send(HostAction::DeleteBackward(count));
    }

    fn send_enter_key(&mut self) {
        self.send(HostAction::SendEnterKey);
    }

    fn open_settings_surface(&mut self) {
        self.send(HostAction::OpenSettingsSurface);
    }
}

// ============================================================================
// Module Tests
// ============================================================================
