//! Utility functions for formatting and validation.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_file_size, truncate_string, validate_file_extension};
