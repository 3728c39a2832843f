//! Per-publisher settlement calculation.

use polars::prelude::{AnyValue, Column};

use crate::conf::{C_COL_CODE, C_COL_PRODUCT, C_COL_WAREHOUSE};
use crate::spec::{
    SettleError, SpecInputRecord, SpecInputTable, SpecPublisherColumn, SpecSettlementRow,
};
use crate::util::normalize_identifier;

/// Settle one publisher column of the input table.
///
/// Returns rows sorted by product; an empty vector means the publisher has
/// nothing to settle.
pub fn settle_publisher(
    spec_table: &SpecInputTable,
    spec_publisher: &SpecPublisherColumn,
) -> Result<Vec<SpecSettlementRow>, SettleError> {
    let l_records = collect_input_records(spec_table, spec_publisher)?;
    Ok(calculate_settlement_rows(&l_records))
}

/// Project the input table onto one publisher's consignment column.
pub fn collect_input_records(
    spec_table: &SpecInputTable,
    spec_publisher: &SpecPublisherColumn,
) -> Result<Vec<SpecInputRecord>, SettleError> {
    let df = &spec_table.df;
    let get_col = move |c_name: &str| {
        df.column(c_name)
            .map_err(|err| SettleError::Table(format!("Column {c_name:?}: {err}")))
    };
    let col_product = get_col(C_COL_PRODUCT)?;
    let col_code = get_col(C_COL_CODE)?;
    let col_warehouse = get_col(C_COL_WAREHOUSE)?;
    let col_consignment = get_col(&spec_publisher.name_col)?;

    let mut l_records = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        l_records.push(SpecInputRecord {
            product: derive_text_from_any_value(get_cell_value(col_product, n_idx_row)?),
            code: derive_text_from_any_value(get_cell_value(col_code, n_idx_row)?),
            warehouse_quantity: derive_f64_from_any_value(get_cell_value(
                col_warehouse,
                n_idx_row,
            )?),
            consignment_quantity: derive_f64_from_any_value(get_cell_value(
                col_consignment,
                n_idx_row,
            )?),
        });
    }
    Ok(l_records)
}

/// Apply the settlement rule and sort the surviving rows by product.
///
/// Rows with negative or missing warehouse stock, or a missing consignment
/// value, are dropped. Only strictly positive settlements survive.
pub fn calculate_settlement_rows(records: &[SpecInputRecord]) -> Vec<SpecSettlementRow> {
    let mut l_rows: Vec<SpecSettlementRow> = records
        .iter()
        .filter_map(|record| {
            let n_settle = derive_settlement_quantity(
                record.consignment_quantity?,
                record.warehouse_quantity?,
            )?;
            Some(SpecSettlementRow {
                product: record.product.clone(),
                code: record.code.clone(),
                settlement_quantity: n_settle,
                isbn: normalize_identifier(&record.code),
            })
        })
        .collect();

    l_rows.sort_by(|row_a, row_b| row_a.product.cmp(&row_b.product));
    l_rows
}

/// `consignment - warehouse` when it is strictly positive and the warehouse
/// count is not negative.
///
/// Fractional differences round up so a positive difference never becomes 0.
pub fn derive_settlement_quantity(consignment: f64, warehouse: f64) -> Option<i64> {
    if warehouse < 0.0 {
        return None;
    }
    let n_diff = consignment - warehouse;
    if n_diff > 0.0 {
        Some(n_diff.ceil() as i64)
    } else {
        None
    }
}

fn get_cell_value(col: &Column, n_idx_row: usize) -> Result<AnyValue<'_>, SettleError> {
    col.get(n_idx_row)
        .map_err(|err| SettleError::Table(format!("Failed to access cell value: {err}")))
}

fn derive_text_from_any_value(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(val) => val.to_string(),
        AnyValue::StringOwned(val) => val.to_string(),
        _ => value.to_string(),
    }
}

fn derive_f64_from_any_value(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int32(val) => Some(val as f64),
        AnyValue::Int64(val) => Some(val as f64),
        AnyValue::Float32(val) => Some(val as f64),
        AnyValue::Float64(val) => Some(val),
        _ => None,
    }
}
