//! Workbook reading and column resolution into a normalized input table.

use std::collections::BTreeSet;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::conf::{C_COL_CODE, C_COL_PRODUCT, C_COL_WAREHOUSE, TUP_COLS_REQUIRED};
use crate::spec::{
    SettleError, SpecInputTable, SpecPublisherColumn, SpecResolvedColumns,
    SpecWorkbookReadOptions,
};
use crate::util::{
    derive_f64_from_cell, derive_text_from_cell, derive_unique_name, extract_publisher_id,
    is_blank_cell, is_consignment_header, normalize_header_label,
};

/// Read workbook bytes and build the normalized input table.
///
/// Fails with [`SettleError::MissingColumn`] or
/// [`SettleError::NoPublisherColumns`] before any row is converted.
pub fn read_input_table(
    v_workbook: &[u8],
    options: &SpecWorkbookReadOptions,
) -> Result<SpecInputTable, SettleError> {
    let l_grid = read_sheet_grid(v_workbook, options.sheet_name.as_deref())?;

    let l_headers_raw: Vec<String> = l_grid
        .get(options.row_header)
        .map(|row| row.iter().map(derive_text_from_cell).collect())
        .unwrap_or_default();
    let spec_resolved = resolve_columns(&l_headers_raw)?;

    let l_rows_data = l_grid.get(options.row_header + 1..).unwrap_or(&[]);
    build_input_table(l_rows_data, &spec_resolved)
}

/// Locate required and consignment columns in one header row.
pub fn resolve_columns(headers_raw: &[String]) -> Result<SpecResolvedColumns, SettleError> {
    let headers: Vec<String> = headers_raw
        .iter()
        .map(|c_label| normalize_header_label(c_label))
        .collect();

    let find = |c_name: &str| headers.iter().position(|c_label| c_label == c_name);

    let l_cols_missing: Vec<String> = TUP_COLS_REQUIRED
        .iter()
        .filter(|c_name| find(**c_name).is_none())
        .map(|c_name| c_name.to_string())
        .collect();
    let (Some(idx_product), Some(idx_code), Some(idx_warehouse)) =
        (find(C_COL_PRODUCT), find(C_COL_CODE), find(C_COL_WAREHOUSE))
    else {
        return Err(SettleError::MissingColumn {
            columns: l_cols_missing,
        });
    };

    let cols_consignment: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, c_label)| is_consignment_header(c_label))
        .map(|(n_idx, c_label)| (n_idx, c_label.clone()))
        .collect();
    if cols_consignment.is_empty() {
        return Err(SettleError::NoPublisherColumns);
    }

    debug!(
        idx_product,
        idx_code,
        idx_warehouse,
        n_publishers = cols_consignment.len(),
        "resolved input columns"
    );

    Ok(SpecResolvedColumns {
        headers,
        idx_product,
        idx_code,
        idx_warehouse,
        cols_consignment,
    })
}

/// Convert data rows into the normalized table. Fully blank rows are skipped.
pub fn build_input_table(
    rows: &[Vec<Data>],
    spec_resolved: &SpecResolvedColumns,
) -> Result<SpecInputTable, SettleError> {
    let n_publishers = spec_resolved.cols_consignment.len();
    let mut l_products = Vec::with_capacity(rows.len());
    let mut l_codes = Vec::with_capacity(rows.len());
    let mut l_warehouse = Vec::with_capacity(rows.len());
    let mut l_consignment: Vec<Vec<Option<f64>>> =
        vec![Vec::with_capacity(rows.len()); n_publishers];

    for row in rows {
        if row.iter().all(is_blank_cell) {
            continue;
        }
        l_products.push(derive_text_from_cell(cell_at(row, spec_resolved.idx_product)));
        l_codes.push(derive_text_from_cell(cell_at(row, spec_resolved.idx_code)));
        l_warehouse.push(derive_f64_from_cell(cell_at(row, spec_resolved.idx_warehouse)));
        for (n_pub, (n_idx_col, _)) in spec_resolved.cols_consignment.iter().enumerate() {
            l_consignment[n_pub].push(derive_f64_from_cell(cell_at(row, *n_idx_col)));
        }
    }

    let mut set_names_existing: BTreeSet<String> = TUP_COLS_REQUIRED
        .iter()
        .map(|c_name| c_name.to_string())
        .collect();
    let mut publisher_columns = Vec::with_capacity(n_publishers);
    let mut l_cols = vec![
        Column::new(C_COL_PRODUCT.into(), l_products),
        Column::new(C_COL_CODE.into(), l_codes),
        Column::new(C_COL_WAREHOUSE.into(), l_warehouse),
    ];

    for ((_, c_raw_header), l_values) in spec_resolved.cols_consignment.iter().zip(l_consignment) {
        let name_col = derive_unique_name(c_raw_header, &mut set_names_existing);
        l_cols.push(Column::new(name_col.as_str().into(), l_values));
        publisher_columns.push(SpecPublisherColumn {
            raw_header: c_raw_header.clone(),
            publisher_id: extract_publisher_id(c_raw_header),
            name_col,
        });
    }

    let df = DataFrame::new(l_cols).map_err(|err| SettleError::Table(err.to_string()))?;
    Ok(SpecInputTable {
        df,
        publisher_columns,
    })
}

static CELL_EMPTY: Data = Data::Empty;

fn cell_at(row: &[Data], n_idx: usize) -> &Data {
    row.get(n_idx).unwrap_or(&CELL_EMPTY)
}

/// Dense cell grid of one sheet, addressed by absolute `(row, col)`.
fn read_sheet_grid(
    v_workbook: &[u8],
    sheet_name: Option<&str>,
) -> Result<Vec<Vec<Data>>, SettleError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(v_workbook))
        .map_err(|err| SettleError::WorkbookRead(err.to_string()))?;

    let range = match sheet_name {
        Some(c_name) => {
            if !workbook.sheet_names().iter().any(|c_sheet| c_sheet == c_name) {
                return Err(SettleError::SheetNotFound(c_name.to_string()));
            }
            workbook
                .worksheet_range(c_name)
                .map_err(|err| SettleError::WorkbookRead(err.to_string()))?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SettleError::WorkbookRead("Workbook has no sheets.".to_string()))?
            .map_err(|err| SettleError::WorkbookRead(err.to_string()))?,
    };

    let Some((n_row_end, n_col_end)) = range.end() else {
        return Ok(vec![]);
    };
    let mut l_grid = vec![vec![Data::Empty; n_col_end as usize + 1]; n_row_end as usize + 1];
    for (n_idx_row, row) in l_grid.iter_mut().enumerate() {
        for (n_idx_col, cell) in row.iter_mut().enumerate() {
            if let Some(value) = range.get_value((n_idx_row as u32, n_idx_col as u32)) {
                *cell = value.clone();
            }
        }
    }
    Ok(l_grid)
}
