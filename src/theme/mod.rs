// SPDX-License-Identifier: GPL-3.0-only

//! Theme registry for the keyboard.
//!
//! A theme is a named (background, key, text) color triple applied uniformly
//! to the rendered key grid. The [`ThemeRegistry`] is an immutable,
//! insertion-ordered catalog: it is either the built-in preset list or loaded
//! from a JSON catalog file named in the configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use tapboard::theme::{parse_theme_catalog_file, ThemeRegistry};
//!
//! let registry = match parse_theme_catalog_file("themes.json") {
//!     Ok(result) => {
//!         for warning in &result.warnings {
//!             tracing::warn!("{}", warning);
//!         }
//!         result.into_value()
//!     }
//!     Err(e) => {
//!         tracing::error!("{}", e);
//!         ThemeRegistry::builtin()
//!     }
//! };
//!
//! for theme in &registry {
//!     println!("{} -> keys {}", theme.name, theme.key_color);
//! }
//! ```

pub mod color;
pub mod parser;
pub mod presets;
pub mod registry;
pub mod types;

pub use color::Color;
pub use parser::{parse_theme_catalog_file, parse_theme_catalog_from_string};
pub use registry::{Theme, ThemeRegistry};
pub use types::{ParseResult, Severity, ThemeError, ValidationIssue};
