//! Shared helpers
//!
//! - Table helpers: CSV reading with column validation and typed column
//!   extraction

pub mod table_helpers;

pub use table_helpers::{float_column, int_column, read_csv_with_columns, string_column};
