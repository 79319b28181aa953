// SPDX-License-Identifier: GPL-3.0-only

//! Theme picker and settings surface.
//!
//! The settings surface is what the host opens when the keyboard's settings
//! key is tapped. It offers enabling and disabling the keyboard plus a
//! [`ThemePicker`] listing every registry theme in registry order. Choosing
//! a theme never touches keyboard state directly: it becomes a
//! theme-change request for whatever keyboard is listening.
//!
//! [`KeyboardControl`] is the seam between the surface and the running
//! keyboard. The picker binary drives it over D-Bus; tests record calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use tapboard::picker::{SettingsRequest, SettingsSurface, ThemePicker};
//! use tapboard::theme::ThemeRegistry;
//!
//! let mut surface = SettingsSurface::new(ThemePicker::from_registry(&ThemeRegistry::builtin()));
//! let request = surface.pick_theme("Forest");
//! assert_eq!(request, Some(SettingsRequest::ChangeTheme("Forest".into())));
//! ```

use crate::broadcast::{Broadcaster, Intent};
use crate::dbus::{DbusClientBlocking, DbusResult};
use crate::theme::ThemeRegistry;

// ============================================================================
// Theme Picker
// ============================================================================

/// Selectable list of theme names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemePicker {
    names: Vec<String>,
    selected: Option<usize>,
}

impl ThemePicker {
    /// Lists every theme of `registry`, in registry order.
    pub fn from_registry(registry: &ThemeRegistry) -> Self {
        Self::from_names(registry.names())
    }

    /// Lists the given names, e.g. as reported by a running service.
    pub fn from_names(names: Vec<String>) -> Self {
        Self {
            names,
            selected: None,
        }
    }

    /// Theme names in display order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the last selected theme.
    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|index| self.names[index].as_str())
    }

    /// Selects a listed theme.
    ///
    /// # Returns
    ///
    /// The theme-change intent for that theme, or `None` if the picker does
    /// not list it.
    pub fn select(&mut self, name: &str) -> Option<Intent> {
        let Some(index) = self.names.iter().position(|n| n == name) else {
            tracing::warn!("Theme '{}' is not offered by the picker", name);
            return None;
        };
        self.selected = Some(index);
        Some(Intent::change_theme(name))
    }

    /// Selects a theme and publishes the intent.
    ///
    /// # Returns
    ///
    /// The number of receivers the intent reached.
    pub fn publish(&mut self, name: &str, broadcaster: &Broadcaster) -> usize {
        match self.select(name) {
            Some(intent) => broadcaster.send(intent),
            None => 0,
        }
    }

    /// One line per theme, the selected one marked with `*`.
    pub fn render(&self) -> Vec<String> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let marker = if self.selected == Some(index) { '*' } else { ' ' };
                format!("{} {}", marker, name)
            })
            .collect()
    }
}

// ============================================================================
// Settings Surface
// ============================================================================

/// A request the settings surface makes of the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsRequest {
    /// Enable and show the keyboard
    Activate,
    /// Hide the keyboard
    Deactivate,
    /// Switch to the named theme
    ChangeTheme(String),
}

/// Operations the settings surface needs from a running keyboard.
pub trait KeyboardControl {
    /// Enables and shows the keyboard.
    fn activate(&mut self) -> DbusResult<()>;

    /// Hides the keyboard.
    fn deactivate(&mut self) -> DbusResult<()>;

    /// Requests a theme change by name.
    fn change_theme(&mut self, name: &str) -> DbusResult<()>;
}

impl KeyboardControl for DbusClientBlocking {
    fn activate(&mut self) -> DbusResult<()> {
        DbusClientBlocking::activate(self)
    }

    fn deactivate(&mut self) -> DbusResult<()> {
        DbusClientBlocking::deactivate(self)
    }

    fn change_theme(&mut self, name: &str) -> DbusResult<()> {
        DbusClientBlocking::change_theme(self, name)
    }
}

/// The host settings surface.
#[derive(Debug, Clone, Default)]
pub struct SettingsSurface {
    picker: ThemePicker,
}

impl SettingsSurface {
    /// Creates a surface around a theme picker.
    pub fn new(picker: ThemePicker) -> Self {
        Self { picker }
    }

    /// The theme picker.
    pub fn picker(&self) -> &ThemePicker {
        &self.picker
    }

    /// The "enable keyboard" option.
    pub fn enable_keyboard(&self) -> SettingsRequest {
        SettingsRequest::Activate
    }

    /// The "disable keyboard" option.
    pub fn disable_keyboard(&self) -> SettingsRequest {
        SettingsRequest::Deactivate
    }

    /// Picks a theme, if the picker lists it.
    pub fn pick_theme(&mut self, name: &str) -> Option<SettingsRequest> {
        self.picker
            .select(name)
            .and_then(|intent| intent.theme_name().map(str::to_string))
            .map(SettingsRequest::ChangeTheme)
    }

    /// Sends a request to the keyboard.
    pub fn submit<C: KeyboardControl>(
        &self,
        request: &SettingsRequest,
        control: &mut C,
    ) -> DbusResult<()> {
        tracing::debug!("Submitting settings request {:?}", request);
        match request {
            SettingsRequest::Activate => control.activate(),
            SettingsRequest::Deactivate => control.deactivate(),
            SettingsRequest::ChangeTheme(name) => control.change_theme(name),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
