//! `consignkit_settle` v1:
//! Consignment stock reading and per-publisher settlement kernel.
//!
//! - `conf`    : column labels, patterns and sentinels
//! - `spec`    : models/options/errors
//! - `util`    : pure helper functions (publisher ids, identifiers, cells)
//! - `resolve` : workbook reading and column resolution
//! - `settle`  : settlement calculation
pub mod conf;
pub mod resolve;
pub mod settle;
pub mod spec;
pub mod util;

pub use conf::{C_COL_CODE, C_COL_PRODUCT, C_COL_WAREHOUSE, C_PUBLISHER_FALLBACK};
pub use resolve::{build_input_table, read_input_table, resolve_columns};
pub use settle::{
    calculate_settlement_rows, collect_input_records, derive_settlement_quantity,
    settle_publisher,
};
pub use spec::{
    SettleError, SpecContactInfo, SpecInputRecord, SpecInputTable, SpecPublisherColumn,
    SpecPublisherSettlement, SpecResolvedColumns, SpecSettlementRow, SpecWorkbookReadOptions,
};
pub use util::{
    derive_report_file_name, extract_publisher_id, is_consignment_header,
    normalize_header_label, normalize_identifier,
};

#[cfg(test)]
pub(crate) mod testutil {
    use rust_xlsxwriter::Workbook;

    pub(crate) enum EnumTestCell {
        Text(&'static str),
        Number(f64),
        Blank,
    }

    /// Stock workbook with five banner rows followed by the header row.
    pub(crate) fn create_stock_workbook(headers: &[&str], rows: &[Vec<EnumTestCell>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Stock actual").expect("banner");
        worksheet.write_string(2, 0, "Bodega: todas").expect("banner");

        for (n_idx_col, c_header) in headers.iter().enumerate() {
            worksheet
                .write_string(5, n_idx_col as u16, *c_header)
                .expect("header");
        }
        for (n_idx_row, row) in rows.iter().enumerate() {
            let n_row = 6 + n_idx_row as u32;
            for (n_idx_col, cell) in row.iter().enumerate() {
                match cell {
                    EnumTestCell::Text(val) => {
                        worksheet
                            .write_string(n_row, n_idx_col as u16, *val)
                            .expect("text cell");
                    }
                    EnumTestCell::Number(val) => {
                        worksheet
                            .write_number(n_row, n_idx_col as u16, *val)
                            .expect("number cell");
                    }
                    EnumTestCell::Blank => {}
                }
            }
        }

        workbook.save_to_buffer().expect("save workbook")
    }
}
