// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard configuration.
//!
//! Configuration is read once at startup from a JSON file and never written
//! back; theme and style changes made at runtime live only in memory.
//!
//! Lookup order:
//! 1. `$TAPBOARD_CONFIG`
//! 2. `<config_dir>/tapboard/config.json`
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_settings::{
    CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_BORDER_WIDTH_DP,
    DEFAULT_CORNER_RADIUS_DP, DEFAULT_KEY_HEIGHT_DP, DEFAULT_PADDING_DP, DEFAULT_SCALE_FACTOR,
    DEFAULT_TEXT_SIZE_SP, DEFAULT_THEME,
};
use crate::theme::{parse_theme_catalog_file, Color, Theme, ThemeRegistry};

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Json {
        /// Config file path
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Visual knobs shared by every key.
///
/// Lengths are density-independent; the renderer multiplies them by the
/// scale factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Key border color
    pub border_color: Color,
    /// Key border width in dp
    pub border_width_dp: u32,
    /// Key corner radius in dp
    pub corner_radius_dp: f32,
    /// Label text size in sp
    pub text_size_sp: f32,
    /// Key height in dp
    pub key_height_dp: u32,
    /// Padding around the keyboard surface in dp
    pub padding_dp: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            border_color: Color::BLACK,
            border_width_dp: DEFAULT_BORDER_WIDTH_DP,
            corner_radius_dp: DEFAULT_CORNER_RADIUS_DP,
            text_size_sp: DEFAULT_TEXT_SIZE_SP,
            key_height_dp: DEFAULT_KEY_HEIGHT_DP,
            padding_dp: DEFAULT_PADDING_DP,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme active when the keyboard starts
    pub default_theme: String,
    /// Key styling
    pub style: StyleConfig,
    /// Optional JSON theme catalog replacing the built-in presets
    pub theme_catalog: Option<PathBuf>,
    /// Display density in px per dp
    pub scale_factor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_string(),
            style: StyleConfig::default(),
            theme_catalog: None,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl Config {
    /// Returns the config file that would be loaded, if one exists.
    pub fn config_path() -> Option<PathBuf> {
        resolve_config_path(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from), dirs::config_dir())
    }

    /// Loads the configuration, falling back to defaults.
    ///
    /// A missing file is not an error. An unreadable or malformed file is
    /// logged and replaced by defaults.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                }
            }
        }
        tracing::info!("Using built-in default config");
        Self::default()
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the theme registry.
    ///
    /// Uses the configured catalog file when present and loadable, otherwise
    /// the built-in presets. Catalog warnings are logged.
    pub fn build_registry(&self) -> ThemeRegistry {
        let Some(catalog) = &self.theme_catalog else {
            return ThemeRegistry::builtin();
        };

        match parse_theme_catalog_file(catalog) {
            Ok(result) => {
                for warning in &result.warnings {
                    tracing::warn!("{}", warning);
                }
                tracing::info!(
                    "Loaded {} theme(s) from {}",
                    result.value.len(),
                    catalog.display()
                );
                result.into_value()
            }
            Err(e) => {
                tracing::error!("{}", e);
                tracing::info!("Falling back to built-in themes");
                ThemeRegistry::builtin()
            }
        }
    }

    /// Resolves the starting theme.
    ///
    /// Falls back to the registry's first theme when the configured name is
    /// not in the registry.
    pub fn initial_theme(&self, registry: &ThemeRegistry) -> Theme {
        match registry.lookup(&self.default_theme) {
            Some(theme) => theme.clone(),
            None => {
                let fallback = registry.first();
                tracing::warn!(
                    "Default theme '{}' not found, using '{}'",
                    self.default_theme,
                    fallback.name
                );
                fallback.clone()
            }
        }
    }

    /// Returns the scale factor, replacing non-positive or non-finite values
    /// with the default.
    pub fn effective_scale(&self) -> f32 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            tracing::warn!(
                "Invalid scale factor {}, using {}",
                self.scale_factor,
                DEFAULT_SCALE_FACTOR
            );
            DEFAULT_SCALE_FACTOR
        }
    }
}

fn resolve_config_path(env_path: Option<PathBuf>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env_path {
        if path.exists() {
            return Some(path);
        }
        tracing::warn!("{} points to missing file {}", CONFIG_ENV_VAR, path.display());
    }

    let user_path = config_dir?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    user_path.exists().then_some(user_path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Test: Defaults match the stock keyboard look
    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_theme, "Dark");
        assert_eq!(config.style.border_width_dp, 2);
        assert_eq!(config.style.key_height_dp, 60);
        assert_eq!(config.style.padding_dp, 5);
        assert_eq!(config.style.border_color, Color::BLACK);
        assert!(config.theme_catalog.is_none());
    }

    /// Test: Partial files are filled in with defaults
    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "default_theme": "Forest", "style": {{ "border_color": "#FF0000" }} }}"##
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.default_theme, "Forest");
        assert_eq!(config.style.border_color, Color::RED);
        assert_eq!(config.style.corner_radius_dp, DEFAULT_CORNER_RADIUS_DP);
        assert_eq!(config.scale_factor, DEFAULT_SCALE_FACTOR);
    }

    /// Test: Malformed files report the path
    #[test]
    fn test_malformed_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"scale_factor\": \"big\" }}").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    /// Test: Environment path wins, then the user config directory
    #[test]
    fn test_resolve_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join("custom.json");
        std::fs::write(&env_file, "{}").unwrap();

        assert_eq!(
            resolve_config_path(Some(env_file.clone()), None),
            Some(env_file.clone())
        );

        // Missing user config resolves to nothing
        assert_eq!(resolve_config_path(None, Some(dir.path().to_path_buf())), None);

        let user_dir = dir.path().join(CONFIG_DIR_NAME);
        std::fs::create_dir_all(&user_dir).unwrap();
        let user_file = user_dir.join(CONFIG_FILE_NAME);
        std::fs::write(&user_file, "{}").unwrap();

        assert_eq!(
            resolve_config_path(
                Some(dir.path().join("missing.json")),
                Some(dir.path().to_path_buf())
            ),
            Some(user_file)
        );
    }

    /// Test: A catalog file replaces the built-in registry
    #[test]
    fn test_build_registry_from_catalog() {
        let mut catalog = tempfile::NamedTempFile::new().unwrap();
        write!(
            catalog,
            r##"[{{ "name": "Paper", "background_color": "#FFFFFF", "key_color": "#EEEEEE", "text_color": "#000000" }}]"##
        )
        .unwrap();

        let config = Config {
            theme_catalog: Some(catalog.path().to_path_buf()),
            ..Config::default()
        };
        let registry = config.build_registry();
        assert_eq!(registry.names(), vec!["Paper"]);

        // "Dark" is not in this catalog, so the first theme is used
        assert_eq!(config.initial_theme(&registry).name, "Paper");
    }

    /// Test: An unreadable catalog falls back to the presets
    #[test]
    fn test_build_registry_fallback() {
        let config = Config {
            theme_catalog: Some(PathBuf::from("/nonexistent/tapboard/themes.json")),
            ..Config::default()
        };
        let registry = config.build_registry();
        assert_eq!(registry, ThemeRegistry::builtin());
        assert_eq!(config.initial_theme(&registry).name, "Dark");
    }

    /// Test: Bad scale factors are replaced
    #[test]
    fn test_effective_scale() {
        let mut config = Config::default();
        config.scale_factor = 2.5;
        assert_eq!(config.effective_scale(), 2.5);
        config.scale_factor = 0.0;
        assert_eq!(config.effective_scale(), DEFAULT_SCALE_FACTOR);
        config.scale_factor = f32::NAN;
        assert_eq!(config.effective_scale(), DEFAULT_SCALE_FACTOR);
    }
}
