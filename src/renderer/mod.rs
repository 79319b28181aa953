// SPDX-License-Identifier: GPL-3.0-only

//! Key grid renderer.
//!
//! The renderer turns the current layout mode, theme and style configuration
//! into a retained [`KeyGrid`]. It owns no layout decisions: the keyboard
//! state machine tells it which mode to show and when to restyle.
//!
//! # Architecture
//!
//! - **sizing**: dp/sp to pixel conversion and weight-based key widths
//! - **style**: [`KeyStyle`] resolution from a theme and style configuration
//! - **grid**: grid construction, in-place restyle and shift relabeling
//!
//! # Usage
//!
//! ```rust,ignore
//! use tapboard::config::StyleConfig;
//! use tapboard::layout::LayoutMode;
//! use tapboard::renderer::{build_grid, restyle};
//! use tapboard::theme::ThemeRegistry;
//!
//! let registry = ThemeRegistry::builtin();
//! let style = StyleConfig::default();
//!
//! let mut grid = build_grid(LayoutMode::LettersLower, registry.first(), &style, 1.0, 0);
//! if let Some(theme) = registry.lookup("Ocean Blue") {
//!     restyle(&mut grid, theme, &style, 1.0);
//! }
//! ```

pub mod grid;
pub mod sizing;
pub mod style;

pub use grid::{build_grid, refresh_labels, restyle, KeyGrid, KeyId, RenderedKey, RenderedRow};
pub use sizing::{dp_to_px, dp_to_px_int, key_widths, total_weight};
pub use style::{key_style, surface_background, KeyStyle};
