//! Column name standardizer.
//!
//! The three source datasets disagree on header spelling: `Cod_Loc`,
//! `IdProvincia `, `Información adicional`, `TipoLatitudLongitud  `,
//! `espacio_INCAA`. Everything is normalized to an ASCII snake_case
//! vocabulary before any cross-dataset work.
//!
//! The function is total and idempotent: applying it twice yields the same
//! result as once, and empty input maps to the empty string.

use once_cell::sync::Lazy;
use regex::Regex;

/// Boundary between a lowercase letter or digit and an uppercase letter.
static LOWER_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Boundary between an acronym and a capitalized word (e.g. `INCAASala`).
static ACRONYM_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

/// Replace accented Latin characters with their ASCII equivalent.
///
/// Covers the characters that actually occur in the portal data (Spanish
/// plus the occasional Portuguese/French import). Other non-ASCII
/// characters are dropped.
pub fn fold_ascii(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => Some('o'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'ñ' => Some('n'),
            'ç' => Some('c'),
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => Some('A'),
            'É' | 'È' | 'Ê' | 'Ë' => Some('E'),
            'Í' | 'Ì' | 'Î' | 'Ï' => Some('I'),
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => Some('O'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => Some('U'),
            'Ñ' => Some('N'),
            'Ç' => Some('C'),
            'º' | 'ª' => None,
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}

/// Standardize a raw column name to the canonical snake_case vocabulary.
///
/// Steps: trim, spaces to underscores, accent folding, camel-case boundary
/// splitting, lowercasing, doubled-underscore collapse, then a fixed table
/// of manual overrides.
///
/// ```
/// use cultura_etl::transform::standardize_header;
///
/// assert_eq!(standardize_header("TipoLatitudLongitud  "), "tipo_latitud_longitud");
/// assert_eq!(standardize_header("Información adicional"), "info_adicional");
/// ```
pub fn standardize_header(name: &str) -> String {
    let name = fold_ascii(&name.trim().replace(' ', "_"));

    // Camel case to snake case
    let name = LOWER_UPPER.replace_all(&name, "${1}_${2}");
    let name = ACRONYM_WORD.replace_all(&name, "${1}_${2}");
    let name = name.to_lowercase().replace("__", "_");

    // Manual adjustments: sources name the same field differently
    match name.as_str() {
        "direccion" => "domicilio".to_string(),
        "informacion_adicional" => "info_adicional".to_string(),
        "cod_tel" => "cod_area".to_string(),
        _ => name,
    }
}
