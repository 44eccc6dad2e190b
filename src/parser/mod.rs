//! CSV to [`Frame`] parser with encoding and delimiter auto-detection.
//!
//! The open-data portal serves files whose encoding has changed over time
//! (UTF-8 today, ISO-8859-1 in older snapshots), so the parser sniffs the
//! bytes before decoding. Empty cells are left out of the row object, which
//! is how the rest of the pipeline represents null.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::frame::Frame;
use serde_json::{json, Map};

/// Result of parsing with metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows.
    pub frame: Frame,
    /// Detected or used encoding.
    pub encoding: String,
    /// Detected or used delimiter.
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// windows-1252 is a superset of ISO-8859-1, so both branches decode
/// through it.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()
        }
        // UTF-8 and anything unrecognized: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
///
/// Each row becomes a JSON object keyed by the trimmed header names. Empty
/// cells are omitted from the object rather than stored as `""`.
pub fn parse_csv(content: &str, delimiter: char) -> CsvResult<Frame> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut frame = Frame::new(headers.clone());

    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                if !value.is_empty() {
                    row.insert(header.clone(), json!(value));
                }
            }
        }
        frame.push_row(row);
    }

    Ok(frame)
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let frame = parse_csv(&content, delimiter)?;

    Ok(ParseResult {
        frame,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "nombre,provincia\nMuseo A,Salta\nMuseo B,Jujuy";
        let frame = parse_csv(csv, ',').unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows[0]["nombre"], "Museo A");
        assert_eq!(frame.rows[1]["provincia"], "Jujuy");
    }

    #[test]
    fn test_quoted_value_with_embedded_delimiter() {
        let csv = "provincia,nombre\n\"Tierra del Fuego, Antártida e Islas del Atlántico Sur\",Cine X";
        let frame = parse_csv(csv, ',').unwrap();

        assert_eq!(frame.len(), 1);
        assert_eq!(
            frame.rows[0]["provincia"],
            "Tierra del Fuego, Antártida e Islas del Atlántico Sur"
        );
    }

    #[test]
    fn test_empty_cells_become_missing_keys() {
        let csv = "a,b,c\n1,,3";
        let frame = parse_csv(csv, ',').unwrap();

        assert_eq!(frame.rows[0]["a"], "1");
        assert!(frame.rows[0].get("b").is_none());
        assert_eq!(frame.rows[0]["c"], "3");
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_csv("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(
            parse_bytes_auto(b""),
            Err(CsvError::EmptyFile)
        ));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "nombre,fuente\nBiblioteca A,CONABIP\nBiblioteca B,Gob. Pcia.";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ',');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.frame.len(), 2);
        assert_eq!(result.frame.headers, vec!["nombre", "fuente"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Neuquén" in ISO-8859-1
        let bytes: &[u8] = &[0x4E, 0x65, 0x75, 0x71, 0x75, 0xE9, 0x6E];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Neuquén");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is ¤ in ISO-8859-1 and cp1252, € only in ISO-8859-15
        assert_eq!(decode_content(&[0xA4], "iso-8859-1"), "¤");
        assert_eq!(decode_content(&[0xA4], "windows-1252"), "¤");
    }

    #[test]
    fn test_parse_file_auto() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("museos.csv");
        std::fs::write(&path, "nombre,cp\nMuseo A,4400\n").unwrap();

        let result = parse_file_auto(&path).unwrap();
        assert_eq!(result.frame.len(), 1);
        assert_eq!(result.frame.rows[0]["cp"], "4400");
    }
}
