// SPDX-License-Identifier: GPL-3.0-only

//! JSON theme catalog loader.
//!
//! A catalog is a JSON array of theme entries:
//!
//! ```json
//! [
//!     { "name": "Dark", "background_color": "#000000",
//!       "key_color": "#212121", "text_color": "#FFFFFF" }
//! ]
//! ```
//!
//! Colors are kept as raw strings during deserialization so that a single
//! malformed entry becomes a warning instead of failing the whole file.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::theme::color::Color;
use crate::theme::registry::{Theme, ThemeRegistry};
use crate::theme::types::{ParseResult, ThemeError, ValidationIssue};

/// Raw catalog entry before color validation.
#[derive(Debug, Deserialize)]
struct RawTheme {
    #[serde(default)]
    name: String,
    background_color: String,
    key_color: String,
    text_color: String,
}

/// Parses a theme catalog file into a registry.
///
/// # Errors
///
/// Returns a [`ThemeError`] if the file cannot be read, is not valid JSON,
/// or contains no usable themes.
pub fn parse_theme_catalog_file(
    path: impl AsRef<Path>,
) -> Result<ParseResult<ThemeRegistry>, ThemeError> {
    let path = path.as_ref();
    let display_path = path.display().to_string();

    let json = fs::read_to_string(path)
        .map_err(|e| ThemeError::io_error_with_path(e, display_path.clone()))?;

    parse_catalog(&json, &display_path).map_err(|e| match e {
        ThemeError::Empty { file_path: None } => ThemeError::Empty {
            file_path: Some(display_path.clone()),
        },
        other => other,
    })
}

/// Parses a theme catalog from a JSON string.
///
/// # Errors
///
/// Returns a [`ThemeError`] for invalid JSON or when no usable theme remains.
pub fn parse_theme_catalog_from_string(
    json: &str,
) -> Result<ParseResult<ThemeRegistry>, ThemeError> {
    parse_catalog(json, "<string>")
}

fn parse_catalog(json: &str, source_name: &str) -> Result<ParseResult<ThemeRegistry>, ThemeError> {
    let raw: Vec<RawTheme> = serde_json::from_str(json)
        .map_err(|e| ThemeError::json_error_with_path(e, source_name))?;

    let mut themes: Vec<Theme> = Vec::with_capacity(raw.len());
    let mut warnings = Vec::new();

    for (index, entry) in raw.into_iter().enumerate() {
        let path = format!("themes[{}]", index);

        let name = entry.name.trim().to_string();
        if name.is_empty() {
            warnings.push(
                ValidationIssue::warning("Theme name is empty", format!("{}.name", path))
                    .with_suggestion("Give every theme a unique, non-empty name"),
            );
            continue;
        }

        if themes.iter().any(|theme| theme.name == name) {
            warnings.push(
                ValidationIssue::warning(
                    format!("Duplicate theme name '{}'", name),
                    format!("{}.name", path),
                )
                .with_suggestion("Rename or remove the duplicate entry; the first one is kept"),
            );
            continue;
        }

        let colors = [
            ("background_color", &entry.background_color),
            ("key_color", &entry.key_color),
            ("text_color", &entry.text_color),
        ]
        .map(|(field, value)| (field, value, Color::from_hex(value)));

        let invalid: Vec<_> = colors
            .iter()
            .filter(|(_, _, parsed)| parsed.is_none())
            .collect();
        if !invalid.is_empty() {
            for (field, value, _) in invalid {
                warnings.push(
                    ValidationIssue::warning(
                        format!("Invalid color '{}' in theme '{}'", value, name),
                        format!("{}.{}", path, field),
                    )
                    .with_suggestion("Use #RRGGBB or #AARRGGBB"),
                );
            }
            continue;
        }

        let [background, key, text] = colors.map(|(_, _, parsed)| parsed.unwrap_or_default());
        themes.push(Theme::new(name, background, key, text));
    }

    if !warnings.is_empty() {
        tracing::warn!(
            "Theme catalog {} loaded with {} warning(s)",
            source_name,
            warnings.len()
        );
    }

    let registry = ThemeRegistry::new(themes)?;
    Ok(ParseResult::with_warnings(registry, warnings))
}

// ============================================================================
// Tests
// ============================================================================
