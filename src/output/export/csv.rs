//! CSV export of two-region diffusion solutions
//!
//! Writes solution data to CSV (Comma-Separated Values), readable by
//! spreadsheets, pandas, MATLAB and most analysis tools.
//!
//! # Features
//!
//! - **Profiles**: concentration along both regions at selected times
//! - **Interface history**: the two interface-adjacent concentrations over time
//! - **Metadata support**: optional `#` header with model and integrator info
//! - **Customizable**: delimiter, decimal separator, precision, units
//! - **Validation**: empty data, NaN/Inf, out-of-range time indices
//!
//! # Quick Examples
//!
//! ## Profiles
//!
//! ```rust,ignore
//! use transdiff_rs::output::export::export_profiles_csv;
//!
//! // first and last reported times
//! let last = solution.len() - 1;
//! export_profiles_csv(&solution, &[0, last], "profiles.csv", None)?;
//! ```
//!
//! **Output** (`profiles.csv`):
//! ```csv
//! x,region,t=0e0,t=1e3
//! -1.000000,1,1.000000,0.000999
//! ...
//! 1.000000,2,0.000000,0.000999
//! ```
//!
//! ## Interface history with metadata
//!
//! ```rust,ignore
//! use transdiff_rs::output::export::{export_interface_history_csv, CsvConfig, CsvMetadata};
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_solution(&solution));
//! export_interface_history_csv(&solution, "interface.csv", Some(&config))?;
//! ```
//!
//! **Output** (`interface.csv`):
//! ```csv
//! # Transmission Diffusion Simulation Data
//! # Generated: 2026-02-11T15:30:00Z
//! # Model: Two-Region Diffusion
//! # Integrator: Rosenbrock (ROS2)
//! # Time Points: 214
//! # Final Time: 1000 s
//! #
//! t,c1_interface,c2_interface
//! 0.000000,1.000000,0.000000
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;
use thiserror::Error;

use crate::solver::Solution;

// =============================================================================
// Errors
// =============================================================================

/// Failure of a CSV export
#[derive(Debug, Error)]
pub enum CsvError {
    /// File creation or write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to write
    #[error("empty data: {0}")]
    EmptyData(String),

    /// NaN or Inf in the data to be written
    #[error("invalid data: non-finite value in column '{column}' at row {row}")]
    NonFinite { column: String, row: usize },

    /// Delimiter equal to the decimal separator would make rows unreadable
    #[error("ambiguous configuration: delimiter and decimal separator are both '{0}'")]
    AmbiguousSeparator(char),

    /// Requested time index is not part of the solution
    #[error("time index {index} is out of range (solution has {len} time points)")]
    TimeIndexOutOfRange { index: usize, len: usize },
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use transdiff_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert!(!config.physical_units);
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Write `c1·c_max` / `c2·a·c_max` instead of normalized values (default: false)
    pub physical_units: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            physical_units: false,
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Reject a delimiter that equals the decimal separator
    pub fn validate(&self) -> Result<(), CsvError> {
        if self.delimiter == self.decimal_separator {
            return Err(CsvError::AmbiguousSeparator(self.delimiter));
        }
        Ok(())
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: write physical concentrations
    pub fn physical_units(mut self) -> Self {
        self.physical_units = true;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only non-`None` fields are written.
#[derive(Clone, Debug, Default)]
pub struct CsvMetadata {
    /// Model name (e.g., "Two-Region Diffusion")
    pub model_name: Option<String>,

    /// Integrator name (e.g., "Rosenbrock (ROS2)")
    pub solver_name: Option<String>,

    /// Number of reported time points
    pub time_points: Option<usize>,

    /// Final physical time (seconds)
    pub final_time: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect model, integrator and time info from a solution
    pub fn from_solution(solution: &Solution) -> Self {
        let mut metadata = Self {
            model_name: solution.metadata.get("model").cloned(),
            solver_name: solution.metadata.get("integrator").cloned(),
            time_points: Some(solution.len()),
            final_time: solution.t.last().copied(),
            ..Default::default()
        };

        for key in ["a1", "a2", "h", "c_max"] {
            if let Some(value) = solution.metadata.get(key) {
                metadata.add_custom(key, value);
            }
        }

        metadata
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header(writer: &mut impl Write, metadata: &CsvMetadata) -> Result<(), CsvError> {
    writeln!(writer, "# Transmission Diffusion Simulation Data")?;

    let now = chrono::Utc::now();
    writeln!(writer, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(writer, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(writer, "# Integrator: {}", solver)?;
    }
    if let Some(points) = metadata.time_points {
        writeln!(writer, "# Time Points: {}", points)?;
    }
    if let Some(final_time) = metadata.final_time {
        writeln!(writer, "# Final Time: {} s", final_time)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(writer, "# {}: {}", key, value)?;
    }

    writeln!(writer, "#")?;

    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Open the output file and write the optional metadata block
fn create_writer(path: &Path, config: &CsvConfig) -> Result<BufWriter<File>, CsvError> {
    let mut writer = BufWriter::new(File::create(path)?);

    if config.include_metadata
        && let Some(metadata) = &config.metadata
    {
        write_metadata_header(&mut writer, metadata)?;
    }

    Ok(writer)
}

/// Concentration matrices in the configured units
fn concentrations(solution: &Solution, config: &CsvConfig) -> (DMatrix<f64>, DMatrix<f64>) {
    if config.physical_units {
        (solution.physical_c1(), solution.physical_c2())
    } else {
        (solution.c1.clone(), solution.c2.clone())
    }
}

fn check_finite<'a>(column: &str, values: impl IntoIterator<Item = &'a f64>) -> Result<(), CsvError> {
    match values.into_iter().position(|value| !value.is_finite()) {
        Some(row) => Err(CsvError::NonFinite {
            column: column.to_string(),
            row,
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export concentration profiles at selected times
///
/// One row per grid point: region 1 (`x` from −1 to −h, `region = 1`), then
/// region 2 (`x` from h to 1, `region = 2`). One concentration column per
/// entry of `time_indices`, headed `t=<physical time>`.
///
/// # Errors
///
/// - `AmbiguousSeparator` when the delimiter equals the decimal separator
/// - `EmptyData` when the solution or `time_indices` is empty
/// - `TimeIndexOutOfRange` for an index ≥ `solution.len()`
/// - `NonFinite` for NaN/Inf in a selected column
/// - `Io` on file errors
pub fn export_profiles_csv(
    solution: &Solution,
    time_indices: &[usize],
    output_path: impl AsRef<Path>,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Validation =============================

    configuration.validate()?;

    if solution.is_empty() {
        return Err(CsvError::EmptyData("solution has no time points".to_string()));
    }
    if time_indices.is_empty() {
        return Err(CsvError::EmptyData("no time index selected".to_string()));
    }
    if let Some(&index) = time_indices.iter().find(|&&index| index >= solution.len()) {
        return Err(CsvError::TimeIndexOutOfRange {
            index,
            len: solution.len(),
        });
    }

    let (c1, c2) = concentrations(solution, configuration);
    let headers: Vec<String> = time_indices.iter().map(|&index| format!("t={:e}", solution.t[index])).collect();

    for (header, &index) in headers.iter().zip(time_indices) {
        check_finite(header, c1.column(index).iter().chain(c2.column(index).iter()))?;
    }

    // ============================= Write ==================================

    let mut writer = create_writer(output_path.as_ref(), configuration)?;
    let delimiter = configuration.delimiter;

    write!(writer, "x{delimiter}region")?;
    for header in &headers {
        write!(writer, "{delimiter}{header}")?;
    }
    writeln!(writer)?;

    for (region, grid, values) in [(1, &solution.x1, &c1), (2, &solution.x2, &c2)] {
        for (row, x) in grid.iter().enumerate() {
            write!(writer, "{}{delimiter}{region}", format_number(*x, configuration))?;
            for &index in time_indices {
                write!(writer, "{delimiter}{}", format_number(values[(row, index)], configuration))?;
            }
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Export the interface-adjacent concentrations over time
///
/// Columns: `t` (physical), `c1_interface` (last region-1 node) and
/// `c2_interface` (first region-2 node).
///
/// # Errors
///
/// - `AmbiguousSeparator` when the delimiter equals the decimal separator
/// - `EmptyData` when the solution has no time points
/// - `NonFinite` for NaN/Inf in any column
/// - `Io` on file errors
pub fn export_interface_history_csv(
    solution: &Solution,
    output_path: impl AsRef<Path>,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Validation =============================

    configuration.validate()?;

    if solution.is_empty() {
        return Err(CsvError::EmptyData("solution has no time points".to_string()));
    }

    let (c1, c2) = concentrations(solution, configuration);
    let n = solution.points();
    let left = c1.row(n - 1);
    let right = c2.row(0);

    check_finite("t", &solution.t)?;
    check_finite("c1_interface", left.iter())?;
    check_finite("c2_interface", right.iter())?;

    // ============================= Write ==================================

    let mut writer = create_writer(output_path.as_ref(), configuration)?;
    let delimiter = configuration.delimiter;

    writeln!(writer, "t{delimiter}c1_interface{delimiter}c2_interface")?;

    for ((t, c1_value), c2_value) in solution.t.iter().zip(left.iter()).zip(right.iter()) {
        writeln!(
            writer,
            "{}{delimiter}{}{delimiter}{}",
            format_number(*t, configuration),
            format_number(*c1_value, configuration),
            format_number(*c2_value, configuration)
        )?;
    }

    writer.flush()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
