//! Output module for solutions
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use transdiff_rs::output::export::{export_profiles_csv, CsvConfig};
//!
//! let config = CsvConfig::high_precision().physical_units();
//! export_profiles_csv(&solution, &[0, solution.len() - 1], "profiles.csv", Some(&config))?;
//! ```
//!
//! Exporters accept a [`Solution`](crate::solver::Solution) directly and write
//! normalized concentrations unless `physical_units` is set.

pub mod export;

pub use export::{export_interface_history_csv, export_profiles_csv, CsvConfig, CsvError, CsvMetadata};
