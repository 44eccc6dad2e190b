//! Minimal tabular structure shared by every pipeline stage.
//!
//! A [`Frame`] is an ordered list of column names plus rows stored as JSON
//! objects. Rows only carry keys for columns that actually had a value in the
//! source, so a projection never fabricates data for absent columns.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{TransformError, TransformResult};

/// A tabular dataset: ordered headers and JSON-object rows.
///
/// Invariant: every row's keys are a subset of `headers`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    /// Column names in order.
    pub headers: Vec<String>,
    /// One JSON object per row.
    pub rows: Vec<Map<String, Value>>,
}

impl Frame {
    /// Create an empty frame with the given columns.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if the frame has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Append a row. Keys not present in `headers` are dropped.
    pub fn push_row(&mut self, row: Map<String, Value>) {
        let filtered = row
            .into_iter()
            .filter(|(k, _)| self.headers.iter().any(|h| h == k))
            .collect();
        self.rows.push(filtered);
    }

    /// Rename every column through `f`, headers and row keys alike.
    ///
    /// If two source columns map to the same name the first one wins and the
    /// later duplicates are dropped.
    pub fn rename_columns<F>(self, f: F) -> Frame
    where
        F: Fn(&str) -> String,
    {
        let mut headers: Vec<String> = Vec::with_capacity(self.headers.len());
        for h in &self.headers {
            let renamed = f(h);
            if !headers.contains(&renamed) {
                headers.push(renamed);
            }
        }

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let mut out = Map::new();
                for (k, v) in row {
                    let renamed = f(&k);
                    out.entry(renamed).or_insert(v);
                }
                out
            })
            .collect();

        Frame { headers, rows }
    }

    /// Project onto the listed columns, keeping only those that exist.
    ///
    /// Columns absent from this frame are simply missing from the result,
    /// never fabricated.
    pub fn select(&self, columns: &[&str]) -> Frame {
        let headers: Vec<String> = columns
            .iter()
            .filter(|c| self.has_column(c))
            .map(|c| c.to_string())
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .filter_map(|h| row.get(h).map(|v| (h.clone(), v.clone())))
                    .collect()
            })
            .collect();

        Frame { headers, rows }
    }

    /// Concatenate frames row-wise. Output row order follows input order.
    ///
    /// Headers become the union of all input headers in first-seen order.
    /// An empty input list is an error, not an empty frame.
    pub fn concat(frames: Vec<Frame>) -> TransformResult<Frame> {
        if frames.is_empty() {
            return Err(TransformError::EmptyInput);
        }

        let mut headers: Vec<String> = Vec::new();
        for frame in &frames {
            for h in &frame.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }

        let rows = frames.into_iter().flat_map(|f| f.rows).collect();

        Ok(Frame { headers, rows })
    }

    /// Add a column holding the same value in every row.
    pub fn add_constant_column(&mut self, name: &str, value: Value) {
        if !self.has_column(name) {
            self.headers.push(name.to_string());
        }
        for row in &mut self.rows {
            row.insert(name.to_string(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    fn sample() -> Frame {
        let mut f = Frame::new(vec!["nombre".into(), "provincia".into(), "cp".into()]);
        f.push_row(row(&[("nombre", "Museo A"), ("provincia", "Salta"), ("cp", "4400")]));
        f.push_row(row(&[("nombre", "Museo B"), ("provincia", "Jujuy")]));
        f
    }

    #[test]
    fn test_select_keeps_only_existing() {
        let f = sample();
        let projected = f.select(&["provincia", "telefono", "nombre"]);

        assert_eq!(projected.headers, vec!["provincia", "nombre"]);
        assert_eq!(projected.len(), 2);
        assert!(projected.rows[0].get("cp").is_none());
    }

    #[test]
    fn test_select_never_fabricates() {
        let f = sample();
        let projected = f.select(&["nombre", "provincia"]);
        // Row 1 had no cp, and select must not invent keys either
        assert_eq!(projected.rows[1].len(), 2);
    }

    #[test]
    fn test_concat_row_counts_and_order() {
        let a = sample();
        let mut b = Frame::new(vec!["nombre".into(), "fuente".into()]);
        b.push_row(row(&[("nombre", "Cine C"), ("fuente", "INCAA")]));

        let merged = Frame::concat(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.headers,
            vec!["nombre", "provincia", "cp", "fuente"]
        );
        // Input order preserved
        assert_eq!(merged.rows[0]["nombre"], "Museo A");
        assert_eq!(merged.rows[2]["nombre"], "Cine C");
    }

    #[test]
    fn test_concat_empty_input_errors() {
        let result = Frame::concat(vec![]);
        assert!(matches!(result, Err(TransformError::EmptyInput)));
    }

    #[test]
    fn test_rename_columns() {
        let f = sample().rename_columns(|c| c.to_uppercase());
        assert_eq!(f.headers, vec!["NOMBRE", "PROVINCIA", "CP"]);
        assert_eq!(f.rows[0]["NOMBRE"], "Museo A");
    }

    #[test]
    fn test_rename_collision_first_wins() {
        let mut f = Frame::new(vec!["A".into(), "a".into()]);
        f.push_row(row(&[("A", "first"), ("a", "second")]));

        let renamed = f.rename_columns(|c| c.to_lowercase());
        assert_eq!(renamed.headers, vec!["a"]);
        assert_eq!(renamed.rows[0]["a"], "first");
    }

    #[test]
    fn test_add_constant_column() {
        let mut f = sample();
        f.add_constant_column("categoria", json!("Museos"));

        assert!(f.has_column("categoria"));
        assert_eq!(f.rows[0]["categoria"], "Museos");
        assert_eq!(f.rows[1]["categoria"], "Museos");
    }

    #[test]
    fn test_frame_serializes_to_json() {
        let f = sample();
        let value = serde_json::to_value(&f).unwrap();

        assert_eq!(value["headers"], json!(["nombre", "provincia", "cp"]));
        assert_eq!(value["rows"][0]["nombre"], "Museo A");
        assert!(value["rows"][1].get("cp").is_none());
    }

    #[test]
    fn test_push_row_drops_unknown_keys() {
        let mut f = Frame::new(vec!["nombre".into()]);
        f.push_row(row(&[("nombre", "X"), ("extra", "dropped")]));
        assert_eq!(f.rows[0].len(), 1);
    }
}
