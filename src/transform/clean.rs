//! Value cleanup for the standardized datasets.
//!
//! `provincia` and `fuente` are uppercased, accent-folded and trimmed so the
//! same province spelled three ways groups as one. The cinema dataset's
//! `espacio_incaa` column is reduced to a presence flag. Two exact-match
//! replacements correct known inconsistencies in the source data.

use serde_json::{json, Value};

use crate::error::{TransformError, TransformResult};
use crate::extract::Category;
use crate::frame::Frame;

/// Columns cleaned in every dataset.
const CLEAN_COLUMNS: [&str; 2] = ["provincia", "fuente"];

/// Uppercase, trim and accent-fold a cell value.
///
/// `"Neuquén "` becomes `"NEUQUEN"`, `"Santa Fé"` becomes `"SANTA FE"`.
pub fn clean_value(value: &str) -> String {
    super::headers::fold_ascii(value.to_uppercase().trim())
}

/// Clean a standardized dataset in place.
///
/// Requires the `provincia` and `fuente` columns (and `espacio_incaa` for
/// the cinema dataset); their absence is an error, mirroring the lookup
/// failure a missing column causes downstream.
pub fn clean_frame(frame: &mut Frame, category: Category) -> TransformResult<()> {
    for col in CLEAN_COLUMNS {
        if !frame.has_column(col) {
            return Err(TransformError::MissingColumn {
                dataset: category.slug().to_string(),
                column: col.to_string(),
            });
        }
    }

    for row in &mut frame.rows {
        for col in CLEAN_COLUMNS {
            if let Some(Value::String(s)) = row.get(col) {
                row.insert(col.to_string(), json!(clean_value(s)));
            }
        }
    }

    if category == Category::Cines {
        flag_espacio_incaa(frame)?;
    }

    // Manual adjustments for known source-data inconsistencies
    replace_exact(
        frame,
        "provincia",
        "TIERRA DEL FUEGO, ANTARTIDA E ISLAS DEL ATLANTICO SUR",
        "TIERRA DEL FUEGO",
    );
    replace_exact(frame, "fuente", "GOB. PCIA.", "GOBIERNO DE LA PROVINCIA");

    Ok(())
}

/// Reduce `espacio_incaa` to a ternary presence flag: `"SI"` or null.
fn flag_espacio_incaa(frame: &mut Frame) -> TransformResult<()> {
    if !frame.has_column("espacio_incaa") {
        return Err(TransformError::MissingColumn {
            dataset: Category::Cines.slug().to_string(),
            column: "espacio_incaa".to_string(),
        });
    }

    for row in &mut frame.rows {
        let is_si = row
            .get("espacio_incaa")
            .and_then(Value::as_str)
            .map(|s| clean_value(s) == "SI")
            .unwrap_or(false);

        if is_si {
            row.insert("espacio_incaa".to_string(), json!("SI"));
        } else {
            row.remove("espacio_incaa");
        }
    }

    Ok(())
}

/// Replace whole-cell matches of `from` with `to` in one column.
fn replace_exact(frame: &mut Frame, column: &str, from: &str, to: &str) {
    for row in &mut frame.rows {
        if row.get(column).and_then(Value::as_str) == Some(from) {
            row.insert(column.to_string(), json!(to));
        }
    }
}
