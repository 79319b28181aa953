// SPDX-License-Identifier: GPL-3.0-only

//! Error and validation types for theme catalogs.
//!
//! Theme catalogs are validated permissively: entries that cannot be used
//! (empty names, malformed colors, duplicate names) are skipped and reported
//! as [`ValidationIssue`] warnings, while I/O and JSON syntax problems are
//! fatal [`ThemeError`]s.

use std::fmt;
use thiserror::Error;

// ============================================================================
// Validation Issues
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal error that prevents the catalog from being used
    Error,
    /// Non-fatal issue; the offending entry was skipped
    Warning,
}

/// A validation issue discovered while loading a theme catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the field that caused the issue (e.g., "themes[3].key_color")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Creates a warning-level issue.
    pub fn warning(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message, field_path)
    }

    /// Adds a suggestion to the validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of successfully parsing a catalog with optional warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed value
    pub value: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with no warnings.
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Creates a new parse result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the value, discarding warnings.
    pub fn into_value(self) -> T {
        self.value
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error type for theme registry construction and catalog loading.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// I/O error occurred while reading a catalog file
    #[error("I/O error reading theme catalog '{file_path}': {source}\n  Suggestion: Check that the file exists and you have read permissions")]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// File that could not be read
        file_path: String,
    },

    /// JSON syntax or shape error
    #[error("JSON parsing error in theme catalog '{file_path}' at line {line_number}: {source}")]
    Json {
        /// The underlying JSON parsing error
        #[source]
        source: serde_json::Error,
        /// File being parsed, or `<string>` for in-memory input
        file_path: String,
        /// Line number reported by serde_json
        line_number: usize,
    },

    /// Two themes share a name
    #[error("duplicate theme name '{0}'")]
    DuplicateName(String),

    /// No usable theme remained
    #[error("theme catalog{} contains no usable themes", path_suffix(.file_path))]
    Empty {
        /// File the catalog came from, if any
        file_path: Option<String>,
    },
}

fn path_suffix(file_path: &Option<String>) -> String {
    file_path
        .as_deref()
        .map(|path| format!(" '{}'", path))
        .unwrap_or_default()
}

impl ThemeError {
    /// Creates an I/O error with file path.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::Io {
            source,
            file_path: file_path.into(),
        }
    }

    /// Creates a JSON error, capturing the line number from serde_json.
    pub fn json_error_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        let line_number = source.line();
        Self::Json {
            source,
            file_path: file_path.into(),
            line_number,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: Validation issue display includes path and suggestion
    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue::warning("Duplicate theme name 'Dark'", "themes[4].name")
            .with_suggestion("Rename or remove the duplicate entry");

        let display = issue.to_string();
        assert!(display.contains("[WARNING]"));
        assert!(display.contains("themes[4].name"));
        assert!(display.contains("Suggestion: Rename"));
    }

    /// Test: ParseResult tracks warnings
    #[test]
    fn test_parse_result_with_warnings() {
        let result = ParseResult::with_warnings(
            3,
            vec![ValidationIssue::warning("bad color", "themes[0].key_color")],
        );
        assert!(result.has_warnings());
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.into_value(), 3);

        let clean = ParseResult::new("ok");
        assert!(!clean.has_warnings());
    }

    /// Test: JSON errors carry the line number
    #[test]
    fn test_json_error_includes_line_number() {
        let source = serde_json::from_str::<serde_json::Value>("[\n  {\n  oops").unwrap_err();
        let err = ThemeError::json_error_with_path(source, "themes.json");

        match &err {
            ThemeError::Json { line_number, .. } => assert_eq!(*line_number, 3),
            other => panic!("Expected Json error, got {:?}", other),
        }
        assert!(err.to_string().contains("themes.json"));
        assert!(err.to_string().contains("line 3"));
    }

    /// Test: Empty catalog error mentions the file when known
    #[test]
    fn test_empty_error_display() {
        let with_path = ThemeError::Empty {
            file_path: Some("themes.json".to_string()),
        };
        assert!(with_path.to_string().contains("'themes.json'"));

        let without_path = ThemeError::Empty { file_path: None };
        assert_eq!(
            without_path.to_string(),
            "theme catalog contains no usable themes"
        );
    }
}
