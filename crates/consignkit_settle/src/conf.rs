//! Settlement constants: column labels, patterns and sentinels.

/// Zero-based sheet row holding the real header (five banner rows precede it).
pub const N_ROW_HEADER_DEFAULT: usize = 5;
/// Maximum length of a normalized product identifier.
pub const N_LEN_IDENTIFIER_MAX: usize = 13;

/// Product name column.
pub const C_COL_PRODUCT: &str = "Producto";
/// Product code column (canonical spelling).
pub const C_COL_CODE: &str = "Codigo";
/// Warehouse stock column.
pub const C_COL_WAREHOUSE: &str = "BODEGA GENERAL BARI";
/// Columns that must be present after header normalization.
pub const TUP_COLS_REQUIRED: [&str; 3] = [C_COL_PRODUCT, C_COL_CODE, C_COL_WAREHOUSE];

/// Legacy header spellings mapped onto canonical labels.
pub const TUP_COL_ALIASES: [(&str, &str); 1] = [("Código", C_COL_CODE)];

/// Case-insensitive substring marking a consignment column.
pub const C_PAT_CONSIGNMENT_COL: &str = "consignacion";
/// Regex removing the consignment word (plural first so it wins the alternation).
pub const C_RE_CONSIGNMENT_WORD: &str = r"(?i)consignaciones|consignacion";

/// Publisher id used when a header reduces to nothing.
pub const C_PUBLISHER_FALLBACK: &str = "SIN EDITORIAL";

/// Output report file name prefix.
pub const C_REPORT_FILE_PREFIX: &str = "Liquidacion_Consignaciones_";
/// Output report file extension.
pub const C_REPORT_FILE_EXT: &str = "xlsx";

/// Characters not allowed in a report file name on common filesystems.
pub const TUP_FILE_NAME_ILLEGAL: [char; 9] = ['/', '\\', '*', '?', ':', '"', '<', '>', '|'];
