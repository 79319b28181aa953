// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard layout catalog.
//!
//! Layouts are static tables, one per [`LayoutMode`]:
//!
//! - **Lowercase letters**: QWERTY rows, shift and delete framing the third row
//! - **Uppercase letters**: the same table capitalized, position for position
//! - **Numeric**: digits, punctuation and symbols, delete closing the third row
//!
//! Every mode ends with the same bottom action row: mode toggle, space, enter
//! and settings.
//!
//! # Example
//!
//! ```rust,ignore
//! use tapboard::layout::{rows_for, KeyKind, LayoutMode};
//!
//! for row in rows_for(LayoutMode::Numeric) {
//!     let labels: Vec<_> = row.keys.iter().map(|k| k.label.as_str()).collect();
//!     println!("{}", labels.join(" "));
//! }
//! ```

pub mod catalog;
pub mod types;

pub use catalog::{bottom_row, letter_rows, numeric_rows, rows_for};
pub use types::{KeyDefinition, KeyKind, LayoutMode, ModeTarget, RowDefinition};
