//! Export module for solutions.
//!
//! Each format lives in its own sub-module; adding a format means adding a
//! file, without modifying the existing ones.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use transdiff_rs::output::export::{export_interface_history_csv, export_profiles_csv};
//!
//! // Profiles at the first and last reported times
//! export_profiles_csv(&solution, &[0, solution.len() - 1], "profiles.csv", None)?;
//!
//! // Interface concentrations over time
//! export_interface_history_csv(&solution, "interface.csv", None)?;
//! ```

pub mod csv;

// Re-export the most commonly used items at the module level so users can write:
//   use transdiff_rs::output::export::{CsvConfig, CsvError};
// instead of the full sub-module path.
pub use csv::{export_interface_history_csv, export_profiles_csv, CsvConfig, CsvError, CsvMetadata};
