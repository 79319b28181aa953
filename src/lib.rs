// SPDX-License-Identifier: GPL-3.0-only

//! Tapboard - a themeable soft keyboard core
//!
//! This crate provides the layout state machine and input dispatch of an
//! on-screen keyboard, plus the service plumbing that connects it to a host.
//!
//! # Architecture
//!
//! The system consists of two binaries around one library:
//!
//! 1. **Keyboard service** (`tapboard`): owns the keyboard on a
//!    single-threaded loop, renders its key grid and forwards committed text
//!    and editing actions to the host as D-Bus signals.
//!
//! 2. **Theme picker** (`tapboard-picker`): lists the theme registry, issues
//!    theme-change requests and enables or disables the keyboard.
//!
//! These components communicate via D-Bus. Inside the service, theme changes
//! arrive as broadcast intents that only a shown keyboard surface receives.
//!
//! # Modules
//!
//! - `app_settings`: Centralized application constants
//! - `broadcast`: Process-local intents and RAII subscriptions
//! - `config`: Read-only startup configuration
//! - `dbus`: D-Bus interface for inter-process communication
//! - `input`: Host bridge contract and implementations
//! - `keyboard`: Layout state machine and tap dispatch
//! - `layout`: Key definitions and the static layout catalog
//! - `picker`: Theme picker and settings surface
//! - `renderer`: Key grid construction and in-place restyling
//! - `service`: Keyboard event loop and surface lifecycle
//! - `theme`: Colors, theme registry, presets and catalog loading

pub mod app_settings;
pub mod broadcast;
pub mod config;
pub mod dbus;
pub mod input;
pub mod keyboard;
pub mod layout;
pub mod picker;
pub mod renderer;
pub mod service;
pub mod theme;

// ============================================================================
// Integration Tests
// ============================================================================
