// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard state machine and tap dispatch.
//!
//! [`Keyboard`] exclusively owns the [`KeyboardState`] (mode, active theme,
//! style) and the rendered grid. Taps are interpreted by
//! [`Keyboard::dispatch_tap`], which either changes the mode or forwards an
//! action to the host bridge. Theme-change intents restyle the grid without
//! touching the mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tapboard::config::Config;
//! use tapboard::input::RecordingBridge;
//! use tapboard::keyboard::Keyboard;
//! use tapboard::layout::{KeyDefinition, KeyKind};
//! use tapboard::theme::ThemeRegistry;
//!
//! let mut keyboard = Keyboard::from_config(
//!     &Config::default(),
//!     Arc::new(ThemeRegistry::builtin()),
//!     RecordingBridge::new(),
//! );
//!
//! keyboard.dispatch_tap(&KeyDefinition::new("⇧", KeyKind::Shift));
//! keyboard.dispatch_tap(&KeyDefinition::letter("a"));
//! assert_eq!(keyboard.bridge().committed_text(), "A");
//! ```

pub mod machine;
pub mod state;

pub use machine::Keyboard;
pub use state::{letter_text, KeyboardState, TapOutcome};
