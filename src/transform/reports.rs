//! The three derived report tables.
//!
//! All builders are read-only on their inputs and produce new frames:
//!
//! - [`registros_unificados`]: one row per physical location across all
//!   categories, projected onto the canonical 12-column vocabulary.
//! - [`registros_totales`]: record counts by categoria, by fuente, and by
//!   provincia+categoria, stacked into a single table.
//! - [`totales_cine`]: per-province screen/seat sums and INCAA-space counts,
//!   derived only from the cinema dataset.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::error::{TransformError, TransformResult};
use crate::frame::Frame;

/// Canonical column vocabulary for the unified-records table.
pub const UNIFIED_COLUMNS: [&str; 12] = [
    "cod_loc",
    "id_provincia",
    "id_departamento",
    "categoria",
    "provincia",
    "localidad",
    "nombre",
    "domicilio",
    "cp",
    "telefono",
    "mail",
    "web",
];

/// Columns the totals report groups over.
const TOTALS_COLUMNS: [&str; 3] = ["categoria", "provincia", "fuente"];

/// Build the unified-records table.
///
/// Each input frame is projected onto [`UNIFIED_COLUMNS`] (columns a source
/// lacks are simply missing from its rows, never fabricated) and the
/// projections are concatenated row-wise in input order. No deduplication.
pub fn registros_unificados(frames: &[Frame]) -> TransformResult<Frame> {
    let projected: Vec<Frame> = frames.iter().map(|f| f.select(&UNIFIED_COLUMNS)).collect();
    let mut merged = Frame::concat(projected)?;
    // The output schema is the full vocabulary even when a column is absent
    // from every source
    merged.headers = UNIFIED_COLUMNS.iter().map(|s| s.to_string()).collect();
    Ok(merged)
}

/// Build the totals table: counts by categoria, by fuente, and by
/// provincia+categoria, concatenated with a fixed column order.
///
/// Grouping columns unused by a particular aggregation are null in its rows.
/// Rows missing a grouping key are excluded from that aggregation.
pub fn registros_totales(frames: &[Frame]) -> TransformResult<Frame> {
    let projected: Vec<Frame> = frames.iter().map(|f| f.select(&TOTALS_COLUMNS)).collect();
    let merged = Frame::concat(projected)?;

    let groupings: [&[&str]; 3] = [&["categoria"], &["fuente"], &["provincia", "categoria"]];

    let mut headers: Vec<String> = TOTALS_COLUMNS.iter().map(|s| s.to_string()).collect();
    headers.push("totals_cnt".to_string());
    let mut out = Frame::new(headers);

    for group_cols in groupings {
        for (key, count) in group_count(&merged, group_cols) {
            let mut row = Map::new();
            for (col, value) in group_cols.iter().zip(key) {
                row.insert(col.to_string(), json!(value));
            }
            row.insert("totals_cnt".to_string(), json!(count));
            out.push_row(row);
        }
    }

    Ok(out)
}

/// Count rows per distinct key over `group_cols`, in sorted key order.
fn group_count(frame: &Frame, group_cols: &[&str]) -> BTreeMap<Vec<String>, i64> {
    let mut counts: BTreeMap<Vec<String>, i64> = BTreeMap::new();

    for row in &frame.rows {
        let key: Option<Vec<String>> = group_cols
            .iter()
            .map(|col| row.get(*col).and_then(Value::as_str).map(String::from))
            .collect();

        if let Some(key) = key {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    counts
}

/// Per-province accumulator for the cinema totals.
#[derive(Default)]
struct CineTotals {
    pantallas: i64,
    butacas: i64,
    espacios_incaa: i64,
}

/// Build the cinema totals table from the (cleaned) cinema dataset.
///
/// Groups by provincia, summing `pantallas` and `butacas` and counting
/// non-null `espacio_incaa` flags.
pub fn totales_cine(cine: &Frame) -> TransformResult<Frame> {
    for col in ["provincia", "pantallas", "butacas", "espacio_incaa"] {
        if !cine.has_column(col) {
            return Err(TransformError::MissingColumn {
                dataset: "cine".to_string(),
                column: col.to_string(),
            });
        }
    }

    let mut totals: BTreeMap<String, CineTotals> = BTreeMap::new();

    for row in &cine.rows {
        let Some(provincia) = row.get("provincia").and_then(Value::as_str) else {
            continue;
        };
        let entry = totals.entry(provincia.to_string()).or_default();
        entry.pantallas += cell_as_i64(row, "pantallas")?;
        entry.butacas += cell_as_i64(row, "butacas")?;
        if row.get("espacio_incaa").is_some() {
            entry.espacios_incaa += 1;
        }
    }

    let mut out = Frame::new(
        ["provincia", "sum_pantallas", "sum_butacas", "cnt_espacio_incaa"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );

    for (provincia, t) in totals {
        let mut row = Map::new();
        row.insert("provincia".to_string(), json!(provincia));
        row.insert("sum_pantallas".to_string(), json!(t.pantallas));
        row.insert("sum_butacas".to_string(), json!(t.butacas));
        row.insert("cnt_espacio_incaa".to_string(), json!(t.espacios_incaa));
        out.push_row(row);
    }

    Ok(out)
}

/// Read a cell as an integer. Missing cells count as zero; values that do
/// not parse are an error.
fn cell_as_i64(row: &Map<String, Value>, column: &str) -> TransformResult<i64> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| TransformError::NonNumeric {
                column: column.to_string(),
                value: n.to_string(),
            }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f as i64))
                .map_err(|_| TransformError::NonNumeric {
                    column: column.to_string(),
                    value: s.clone(),
                })
        }
        Some(other) => Err(TransformError::NonNumeric {
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(headers: &[&str], rows: Vec<Vec<(&str, Value)>>) -> Frame {
        let mut f = Frame::new(headers.iter().map(|h| h.to_string()).collect());
        for r in rows {
            f.push_row(r.into_iter().map(|(k, v)| (k.to_string(), v)).collect());
        }
        f
    }

    fn museos() -> Frame {
        frame(
            &["cod_loc", "categoria", "provincia", "nombre", "fuente", "jurisdiccion"],
            vec![
                vec![
                    ("cod_loc", json!("1")),
                    ("categoria", json!("Museos")),
                    ("provincia", json!("SALTA")),
                    ("nombre", json!("Museo A")),
                    ("fuente", json!("DNPYM")),
                    ("jurisdiccion", json!("Nacional")),
                ],
                vec![
                    ("cod_loc", json!("2")),
                    ("categoria", json!("Museos")),
                    ("provincia", json!("JUJUY")),
                    ("nombre", json!("Museo B")),
                    ("fuente", json!("DNPYM")),
                ],
            ],
        )
    }

    fn bibliotecas() -> Frame {
        frame(
            &["cod_loc", "categoria", "provincia", "nombre", "fuente"],
            vec![vec![
                ("cod_loc", json!("3")),
                ("categoria", json!("Bibliotecas Populares")),
                ("provincia", json!("SALTA")),
                ("nombre", json!("Biblioteca C")),
                ("fuente", json!("CONABIP")),
            ]],
        )
    }

    #[test]
    fn test_unificados_row_count_and_columns() {
        let a = museos();
        let b = bibliotecas();
        let expected_rows = a.len() + b.len();

        let unified = registros_unificados(&[a, b]).unwrap();

        assert_eq!(unified.len(), expected_rows);
        assert_eq!(unified.headers, UNIFIED_COLUMNS.to_vec());
        // Projection drops columns outside the vocabulary
        assert!(unified.rows[0].get("jurisdiccion").is_none());
        // Absent columns are not fabricated
        assert!(unified.rows[0].get("telefono").is_none());
    }

    #[test]
    fn test_unificados_empty_input_errors() {
        assert!(matches!(
            registros_unificados(&[]),
            Err(TransformError::EmptyInput)
        ));
    }

    #[test]
    fn test_totales_counts_sum_to_row_total() {
        let frames = [museos(), bibliotecas()];
        let total_rows: i64 = frames.iter().map(|f| f.len() as i64).sum();

        let totals = registros_totales(&frames).unwrap();

        // Rows from the by-categoria grouping carry categoria but neither
        // fuente nor provincia
        let by_categoria: i64 = totals
            .rows
            .iter()
            .filter(|r| r.contains_key("categoria") && !r.contains_key("fuente") && !r.contains_key("provincia"))
            .map(|r| r["totals_cnt"].as_i64().unwrap())
            .sum();
        assert_eq!(by_categoria, total_rows);

        let by_fuente: i64 = totals
            .rows
            .iter()
            .filter(|r| r.contains_key("fuente"))
            .map(|r| r["totals_cnt"].as_i64().unwrap())
            .sum();
        assert_eq!(by_fuente, total_rows);
    }

    #[test]
    fn test_totales_fixed_column_order() {
        let totals = registros_totales(&[museos()]).unwrap();
        assert_eq!(
            totals.headers,
            vec!["categoria", "provincia", "fuente", "totals_cnt"]
        );
    }

    #[test]
    fn test_totales_province_category_pairs() {
        let totals = registros_totales(&[museos(), bibliotecas()]).unwrap();

        let salta_museos = totals
            .rows
            .iter()
            .find(|r| {
                r.get("provincia").and_then(Value::as_str) == Some("SALTA")
                    && r.get("categoria").and_then(Value::as_str) == Some("Museos")
            })
            .expect("missing SALTA/Museos row");
        assert_eq!(salta_museos["totals_cnt"], 1);
    }

    #[test]
    fn test_totales_cine_example() {
        let cine = frame(
            &["provincia", "pantallas", "butacas", "espacio_incaa"],
            vec![
                vec![
                    ("provincia", json!("SALTA")),
                    ("pantallas", json!("5")),
                    ("butacas", json!("100")),
                    ("espacio_incaa", json!("SI")),
                ],
                vec![
                    ("provincia", json!("SALTA")),
                    ("pantallas", json!("3")),
                    ("butacas", json!("200")),
                ],
            ],
        );

        let totals = totales_cine(&cine).unwrap();

        assert_eq!(totals.len(), 1);
        assert_eq!(totals.rows[0]["provincia"], "SALTA");
        assert_eq!(totals.rows[0]["sum_pantallas"], 8);
        assert_eq!(totals.rows[0]["sum_butacas"], 300);
        assert_eq!(totals.rows[0]["cnt_espacio_incaa"], 1);
    }

    #[test]
    fn test_totales_cine_missing_column() {
        let cine = frame(&["provincia", "pantallas"], vec![]);
        let err = totales_cine(&cine).unwrap_err();
        assert!(err.to_string().contains("butacas"));
    }

    #[test]
    fn test_totales_cine_non_numeric_value() {
        let cine = frame(
            &["provincia", "pantallas", "butacas", "espacio_incaa"],
            vec![vec![
                ("provincia", json!("SALTA")),
                ("pantallas", json!("varias")),
                ("butacas", json!("10")),
            ]],
        );
        assert!(matches!(
            totales_cine(&cine),
            Err(TransformError::NonNumeric { .. })
        ));
    }
}
