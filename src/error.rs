//! Error types for the cultura-etl pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV parsing errors
//! - [`ExtractError`] - download and dated-path errors
//! - [`TransformError`] - standardization and report-building errors
//! - [`LoadError`] - database errors
//! - [`ConfigError`] - settings errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Parse(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        CsvError::Parse(e.to_string())
    }
}

// =============================================================================
// Extract Errors
// =============================================================================

/// Errors during the extract stage.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Failed to construct the HTTP client.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// HTTP request failed (timeout, connection, non-2xx status).
    #[error("Download failed for {category}: {source}")]
    Download {
        category: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to create the dated output directory or write the file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors during standardization and report building.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the cleanup or aggregation expects is absent.
    #[error("Missing column '{column}' in {dataset} dataset")]
    MissingColumn { dataset: String, column: String },

    /// Nothing to concatenate.
    #[error("No frames to concatenate")]
    EmptyInput,

    /// A numeric column held a value that does not parse.
    #[error("Non-numeric value '{value}' in column '{column}'")]
    NonNumeric { column: String, value: String },
}

// =============================================================================
// Load Errors
// =============================================================================

/// Errors during the database load stage.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Connection or query failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors assembling settings from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    /// Value does not parse.
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::run`].
/// It wraps all stage errors; any variant aborts the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Extract stage error.
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Transform stage error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Load stage error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Settings error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error outside any stage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for extract operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::MissingColumn {
            dataset: "cine".into(),
            column: "provincia".into(),
        };
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("provincia"));
    }

    #[test]
    fn test_missing_column_format() {
        let err = TransformError::MissingColumn {
            dataset: "museos_datosabiertos".into(),
            column: "fuente".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fuente"));
        assert!(msg.contains("museos_datosabiertos"));
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::MissingVar("POSTGRES_USER");
        assert!(err.to_string().contains("POSTGRES_USER"));
    }
}
