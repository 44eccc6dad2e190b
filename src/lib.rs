//! # cultura-etl - Argentine cultural open-data ETL
//!
//! Downloads the museums, cinemas and popular-libraries CSV datasets from
//! the datos.cultura.gob.ar portal, normalizes them to a shared column
//! vocabulary, derives three report tables, and loads everything into a
//! PostgreSQL schema.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Portal CSV │────▶│   Extract   │────▶│  Transform  │────▶│    Load     │
//! │  (3 fixed   │     │ (dated dirs)│     │ (normalize +│     │ (Postgres,  │
//! │    URLs)    │     │             │     │   reports)  │     │  alk_* )    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The pipeline is a single sequential pass: no retries, no concurrency, no
//! partial-failure recovery. Any stage error aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cultura_etl::{config::Settings, pipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::from_env().unwrap();
//!     pipeline::run(&settings, Path::new("data")).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Database settings from the environment
//! - [`logging`] - tracing subscriber setup
//! - [`frame`] - Minimal tabular structure
//! - [`parser`] - CSV parsing with encoding/delimiter auto-detection
//! - [`extract`] - Dataset downloads into the dated tree
//! - [`transform`] - Header standardization, cleanup, report builders
//! - [`load`] - Postgres schema reconciliation and table reloads
//! - [`pipeline`] - Sequential driver

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Data model
pub mod frame;

// Stages
pub mod extract;
pub mod load;
pub mod parser;
pub mod pipeline;
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, CsvError, ExtractError, LoadError, PipelineError, TransformError,
};

// =============================================================================
// Re-exports - Data model
// =============================================================================

pub use frame::Frame;

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv,
    parse_file_auto, ParseResult,
};

// =============================================================================
// Re-exports - Extract
// =============================================================================

pub use extract::{dated_path, Category, Extractor};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    clean_frame, clean_value, registros_totales, registros_unificados, standardize_header,
    totales_cine, transform, UNIFIED_COLUMNS,
};

// =============================================================================
// Re-exports - Load
// =============================================================================

pub use load::{table_name, Database, TABLE_PREFIX};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{run, tag_loaded_at, transform_files};
