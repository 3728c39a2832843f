use crate::conf::{C_TITLE_PREFIX, N_NCOLS_EXCEL_MAX, TUP_TABLE_HEADERS};
use crate::spec::{EnumCellValue, SpecAutofitCellsPolicy, SpecColumnWidths};

/// Report title for one publisher.
pub fn derive_report_title(publisher_id: &str) -> String {
    format!("{C_TITLE_PREFIX} {publisher_id}")
}

/// Approximate display width; non-ASCII characters count as 1.6 columns.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Identifier cell value: numeric when it parses as an integer, text otherwise.
///
/// Leading zeros do not survive the numeric branch, so `"0123"` stays text.
pub fn coerce_identifier_cell(isbn: &str) -> EnumCellValue {
    let c_isbn = isbn.trim();
    if c_isbn.is_empty() {
        return EnumCellValue::None;
    }
    if let Ok(n_val) = c_isbn.parse::<i64>()
        && n_val.to_string() == c_isbn
    {
        return EnumCellValue::Number(n_val as f64);
    }
    EnumCellValue::String(isbn.to_string())
}

/// Plan data table widths.
///
/// Quantity fits its header, product fits the longest product name and the
/// identifier column is fixed. When the table is narrower than twice the
/// title, the product column takes the difference, still capped by the policy.
pub fn plan_report_column_widths<'a>(
    products: impl IntoIterator<Item = &'a str>,
    title: &str,
    policy: &SpecAutofitCellsPolicy,
) -> SpecColumnWidths {
    let clamp = |n_width: usize| {
        (n_width + policy.width_cell_padding)
            .max(policy.width_cell_min)
            .min(policy.width_cell_max)
    };

    let n_width_product = products
        .into_iter()
        .map(estimate_unicode_string_width)
        .chain(std::iter::once(estimate_unicode_string_width(
            TUP_TABLE_HEADERS[1],
        )))
        .max()
        .unwrap_or(0);

    let mut widths = SpecColumnWidths {
        quantity: clamp(estimate_unicode_string_width(TUP_TABLE_HEADERS[0])),
        product: clamp(n_width_product),
        identifier: policy.width_identifier,
    };

    let n_width_wanted = estimate_unicode_string_width(title) * 2;
    if widths.total() < n_width_wanted {
        let n_deficit = n_width_wanted - widths.total();
        widths.product = (widths.product + n_deficit).min(policy.width_cell_max);
    }
    widths
}

/// Columns to hide: everything from `ncols_visible` to the sheet edge.
pub fn plan_hidden_columns(ncols_visible: usize) -> std::ops::Range<usize> {
    ncols_visible.min(N_NCOLS_EXCEL_MAX)..N_NCOLS_EXCEL_MAX
}
