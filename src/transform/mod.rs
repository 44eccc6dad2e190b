//! Transform stage.
//!
//! - `headers`: column-name standardizer
//! - `clean`: value cleanup per dataset
//! - `reports`: the three derived report tables

pub mod clean;
pub mod headers;
pub mod reports;

pub use clean::{clean_frame, clean_value};
pub use headers::{fold_ascii, standardize_header};
pub use reports::{registros_totales, registros_unificados, totales_cine, UNIFIED_COLUMNS};

use crate::error::{TransformError, TransformResult};
use crate::extract::Category;
use crate::frame::Frame;

/// Table names for the three report tables.
pub const TABLE_REGISTROS_UNIFICADOS: &str = "registros_unificados";
pub const TABLE_REGISTROS_TOTALES: &str = "registros_totales";
pub const TABLE_TOTALES_CINE: &str = "totales_cine";

/// Run the whole transform stage over the raw per-category frames.
///
/// Standardizes every column name, cleans values, then derives the three
/// report tables. Returns `(table_name, frame)` pairs in load order: the
/// cleaned category tables first (input order preserved), then the reports.
/// The cinema dataset must be among the inputs.
pub fn transform(datasets: Vec<(Category, Frame)>) -> TransformResult<Vec<(String, Frame)>> {
    let mut cleaned: Vec<(Category, Frame)> = Vec::with_capacity(datasets.len());

    for (category, frame) in datasets {
        let mut frame = frame.rename_columns(standardize_header);
        clean_frame(&mut frame, category)?;
        tracing::debug!(category = category.slug(), rows = frame.len(), "dataset cleaned");
        cleaned.push((category, frame));
    }

    let frames: Vec<Frame> = cleaned.iter().map(|(_, f)| f.clone()).collect();
    let unificados = registros_unificados(&frames)?;
    let totales = registros_totales(&frames)?;

    let cine = cleaned
        .iter()
        .find(|(c, _)| *c == Category::Cines)
        .map(|(_, f)| f)
        .ok_or(TransformError::EmptyInput)?;
    let cine_totales = totales_cine(cine)?;

    let mut tables: Vec<(String, Frame)> = cleaned
        .into_iter()
        .map(|(c, f)| (c.slug().to_string(), f))
        .collect();
    tables.push((TABLE_REGISTROS_UNIFICADOS.to_string(), unificados));
    tables.push((TABLE_REGISTROS_TOTALES.to_string(), totales));
    tables.push((TABLE_TOTALES_CINE.to_string(), cine_totales));

    Ok(tables)
}
