// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Directory name used under the user's config directory.
pub const CONFIG_DIR_NAME: &str = "tapboard";

/// File name of the JSON configuration inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV_VAR: &str = "TAPBOARD_CONFIG";

/// D-Bus well-known name and interface name.
pub const DBUS_INTERFACE: &str = "io.github.tapboard.Tapboard";

/// D-Bus object path of the keyboard service.
pub const DBUS_PATH: &str = "/io/github/tapboard/Tapboard";

// ============================================================================
// Broadcast Actions
// ============================================================================

/// Broadcast action carrying a theme-change request.
pub const ACTION_CHANGE_THEME: &str = "ACTION_CHANGE_THEME";

/// Intent extra holding the requested theme name.
pub const EXTRA_THEME_NAME: &str = "theme_name";

// ============================================================================
// Key Glyphs
// ============================================================================

/// Shift key label shown on the lowercase layout.
pub const ICON_SHIFT_UP: &str = "⇧";

/// Shift key label shown on the uppercase layout.
pub const ICON_SHIFT_DOWN: &str = "⇩";

/// Delete-backward key label.
pub const ICON_DELETE: &str = "⌫";

/// Enter key label.
pub const ICON_ENTER: &str = "⏎";

/// Settings key label.
pub const ICON_SETTINGS: &str = "⚙️";

/// Label of the toggle that switches to the numeric layout.
pub const LABEL_TO_NUMERIC: &str = "123";

/// Label of the toggle that switches back to letters.
pub const LABEL_TO_LETTERS: &str = "ABC";

/// Space bar label.
pub const LABEL_SPACE: &str = "Space";

/// Relative width of the space bar in the bottom row.
pub const SPACE_WEIGHT: f32 = 4.0;

// ============================================================================
// Style Defaults
// ============================================================================

/// Theme selected when the configuration does not name one.
pub const DEFAULT_THEME: &str = "Dark";

/// Default key border width in dp.
pub const DEFAULT_BORDER_WIDTH_DP: u32 = 2;

/// Default key corner radius in dp.
pub const DEFAULT_CORNER_RADIUS_DP: f32 = 8.0;

/// Default key label size in sp.
pub const DEFAULT_TEXT_SIZE_SP: f32 = 22.0;

/// Default key (and row) height in dp.
pub const DEFAULT_KEY_HEIGHT_DP: u32 = 60;

/// Default padding around the keyboard surface in dp.
pub const DEFAULT_PADDING_DP: u32 = 5;

/// Default display density (px per dp).
pub const DEFAULT_SCALE_FACTOR: f32 = 1.0;

/// Number of characters removed by the delete key.
pub const DELETE_COUNT: i32 = 1;
