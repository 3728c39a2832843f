//! Stateless helpers: header normalization, publisher ids, identifiers and
//! cell coercion.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use calamine::Data;
use regex::Regex;

use crate::conf::{
    C_PAT_CONSIGNMENT_COL, C_PUBLISHER_FALLBACK, C_RE_CONSIGNMENT_WORD, C_REPORT_FILE_EXT,
    C_REPORT_FILE_PREFIX, N_LEN_IDENTIFIER_MAX, TUP_COL_ALIASES, TUP_FILE_NAME_ILLEGAL,
};

static RE_CONSIGNMENT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(C_RE_CONSIGNMENT_WORD).expect("consignment word pattern must compile")
});
static RE_WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));

////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Trim a header label and map legacy spellings onto canonical ones.
pub fn normalize_header_label(label: &str) -> String {
    let c_label = label.trim();
    for (c_legacy, c_canonical) in TUP_COL_ALIASES {
        if c_label == c_legacy {
            return c_canonical.to_string();
        }
    }
    c_label.to_string()
}

/// Whether a normalized header names a consignment column.
pub fn is_consignment_header(label: &str) -> bool {
    label.to_lowercase().contains(C_PAT_CONSIGNMENT_COL)
}

/// Return `name`, or `name__N` with the first free `N >= 2`, and record it.
pub fn derive_unique_name(name: &str, set_names_existing: &mut BTreeSet<String>) -> String {
    if set_names_existing.insert(name.to_string()) {
        return name.to_string();
    }

    let mut n_idx = 2usize;
    loop {
        let candidate = format!("{name}__{n_idx}");
        if set_names_existing.insert(candidate.clone()) {
            return candidate;
        }
        n_idx += 1;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PublisherExtraction

/// Derive the canonical publisher id from a consignment column header.
///
/// Steps, in order: drop the consignment word (any case), collapse
/// whitespace, drop `:`, drop digits and `-`, trim and uppercase. An empty
/// result becomes [`C_PUBLISHER_FALLBACK`].
pub fn extract_publisher_id(raw_header: &str) -> String {
    let c_id = RE_CONSIGNMENT_WORD.replace_all(raw_header, "");
    let c_id = RE_WHITESPACE_RUN.replace_all(&c_id, " ");
    let c_id: String = c_id
        .chars()
        .filter(|chr| *chr != ':')
        .filter(|chr| !chr.is_ascii_digit() && *chr != '-')
        .collect();
    let c_id = c_id.trim().to_uppercase();

    if c_id.is_empty() {
        return C_PUBLISHER_FALLBACK.to_string();
    }
    c_id
}

/// Output file name for a publisher report.
///
/// Path separators and other characters Windows rejects in file names are
/// replaced with `_`, so the name stays a single valid path component.
pub fn derive_report_file_name(publisher_id: &str) -> String {
    let c_id = publisher_id.replace(TUP_FILE_NAME_ILLEGAL, "_");
    format!("{C_REPORT_FILE_PREFIX}{c_id}.{C_REPORT_FILE_EXT}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IdentifierNormalization

/// Reduce a raw code to its canonical identifier.
///
/// Keeps the text before the first `/`, truncated to
/// [`N_LEN_IDENTIFIER_MAX`] characters.
pub fn normalize_identifier(raw: &str) -> String {
    let c_head = raw.split_once('/').map_or(raw, |(head, _)| head);
    c_head.chars().take(N_LEN_IDENTIFIER_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellCoercion

/// Text form of a workbook cell. Integral floats drop their decimal part.
pub fn derive_text_from_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(val) => val.clone(),
        Data::Int(val) => val.to_string(),
        Data::Float(val) => {
            if val.is_finite() && val.fract() == 0.0 && val.abs() < 9.0e15 {
                (*val as i64).to_string()
            } else {
                val.to_string()
            }
        }
        _ => cell.to_string(),
    }
}

/// Numeric form of a workbook cell; `None` for blanks and non-numeric text.
pub fn derive_f64_from_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(val) if val.is_finite() => Some(*val),
        Data::Int(val) => Some(*val as f64),
        Data::String(val) => val
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n_val| n_val.is_finite()),
        _ => None,
    }
}

/// Whether a cell carries no value.
pub fn is_blank_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(val) => val.trim().is_empty(),
        _ => false,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_publisher_id_strips_consignment_word() {
        assert_eq!(extract_publisher_id("CONSIGNACIONES SM"), "SM");
        assert_eq!(extract_publisher_id("Consignacion SM"), "SM");
        assert_eq!(extract_publisher_id("consignaciones   zig   zag"), "ZIG ZAG");
    }

    #[test]
    fn test_extract_publisher_id_strips_digits_hyphens_and_colons() {
        assert_eq!(extract_publisher_id("Consignacion-2024 Planeta"), "PLANETA");
        assert_eq!(extract_publisher_id("CONSIGNACION: Ekaré 76123456-7"), "EKARÉ");
    }

    #[test]
    fn test_extract_publisher_id_falls_back_when_empty() {
        assert_eq!(extract_publisher_id("Consignaciones"), C_PUBLISHER_FALLBACK);
        assert_eq!(extract_publisher_id("consignacion 12-34 :"), C_PUBLISHER_FALLBACK);
    }

    #[test]
    fn test_extract_publisher_id_is_deterministic() {
        let c_header = "  Consignaciones  Editorial Zig-Zag: 96.123 ";
        let c_first = extract_publisher_id(c_header);
        for _ in 0..5 {
            assert_eq!(extract_publisher_id(c_header), c_first);
        }
        assert_eq!(c_first, "EDITORIAL ZIGZAG .");
    }

    #[test]
    fn test_normalize_identifier_cuts_suffix_and_truncates() {
        assert_eq!(normalize_identifier("9789561234567/A"), "9789561234567");
        assert_eq!(normalize_identifier("97895612345678901"), "9789561234567");
        assert_eq!(normalize_identifier("ABC/12/3"), "ABC");
        assert_eq!(normalize_identifier("123"), "123");
        assert_eq!(normalize_identifier(""), "");
    }

    #[test]
    fn test_normalize_identifier_is_idempotent() {
        let c_once = normalize_identifier("9789561234567");
        assert_eq!(normalize_identifier(&c_once), c_once);
        let c_twice = normalize_identifier(&normalize_identifier("978956123456799/X"));
        assert_eq!(c_twice, normalize_identifier("978956123456799/X"));
    }

    #[test]
    fn test_normalize_header_label_maps_legacy_code() {
        assert_eq!(normalize_header_label("  Código "), "Codigo");
        assert_eq!(normalize_header_label("Producto\t"), "Producto");
        assert!(is_consignment_header("CONSIGNACIONES SM"));
        assert!(is_consignment_header("consignacion planeta"));
        assert!(!is_consignment_header("BODEGA GENERAL BARI"));
    }

    #[test]
    fn test_derive_unique_name_suffixes_duplicates() {
        let mut set_names = BTreeSet::new();
        assert_eq!(derive_unique_name("A", &mut set_names), "A");
        assert_eq!(derive_unique_name("A", &mut set_names), "A__2");
        assert_eq!(derive_unique_name("A", &mut set_names), "A__3");
    }

    #[test]
    fn test_cell_coercion() {
        assert_eq!(
            derive_text_from_cell(&Data::Float(9789561234567.0)),
            "9789561234567"
        );
        assert_eq!(derive_text_from_cell(&Data::Int(42)), "42");
        assert_eq!(derive_f64_from_cell(&Data::String(" 7 ".to_string())), Some(7.0));
        assert_eq!(derive_f64_from_cell(&Data::String("n/a".to_string())), None);
        assert_eq!(derive_f64_from_cell(&Data::Empty), None);
        assert!(is_blank_cell(&Data::String("  ".to_string())));
    }

    #[test]
    fn test_derive_report_file_name() {
        assert_eq!(
            derive_report_file_name("SM"),
            "Liquidacion_Consignaciones_SM.xlsx"
        );
        assert_eq!(
            derive_report_file_name("A/B"),
            "Liquidacion_Consignaciones_A_B.xlsx"
        );
        assert_eq!(
            derive_report_file_name("A*B?C:D\"E<F>G|H\\I"),
            "Liquidacion_Consignaciones_A_B_C_D_E_F_G_H_I.xlsx"
        );
    }
}
