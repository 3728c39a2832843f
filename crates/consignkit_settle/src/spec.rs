//! Settlement data models, read options and top-level error types.

use std::fmt;

use polars::prelude::DataFrame;

use crate::conf::N_ROW_HEADER_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region InputModels

/// Workbook read options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWorkbookReadOptions {
    /// Zero-based row holding the header labels.
    pub row_header: usize,
    /// Sheet to read; `None` selects the first sheet.
    pub sheet_name: Option<String>,
}

impl Default for SpecWorkbookReadOptions {
    fn default() -> Self {
        Self {
            row_header: N_ROW_HEADER_DEFAULT,
            sheet_name: None,
        }
    }
}

/// One consignment column detected in the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPublisherColumn {
    /// Header text as it appeared (trimmed).
    pub raw_header: String,
    /// Canonical publisher id derived from `raw_header`.
    pub publisher_id: String,
    /// Unique column name inside [`SpecInputTable::df`].
    pub name_col: String,
}

/// Header positions resolved from one header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecResolvedColumns {
    /// Normalized header labels, in sheet order.
    pub headers: Vec<String>,
    /// Position of the product column.
    pub idx_product: usize,
    /// Position of the code column.
    pub idx_code: usize,
    /// Position of the warehouse column.
    pub idx_warehouse: usize,
    /// Consignment columns as `(position, raw header)` in sheet order.
    pub cols_consignment: Vec<(usize, String)>,
}

/// Normalized input table.
///
/// `df` has `Producto` and `Codigo` as text, `BODEGA GENERAL BARI` and one
/// nullable float column per publisher.
#[derive(Debug, Clone)]
pub struct SpecInputTable {
    /// Normalized rows.
    pub df: DataFrame,
    /// Publisher columns in sheet order.
    pub publisher_columns: Vec<SpecPublisherColumn>,
}

/// One product row as seen for a single publisher.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecInputRecord {
    /// Product title.
    pub product: String,
    /// Raw product code text.
    pub code: String,
    /// Units in the distributor's own warehouse.
    pub warehouse_quantity: Option<f64>,
    /// Units held on consignment for the publisher.
    pub consignment_quantity: Option<f64>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SettlementModels

/// One row to settle with a publisher. `settlement_quantity` is always `> 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSettlementRow {
    /// Product title.
    pub product: String,
    /// Raw product code text.
    pub code: String,
    /// Units to settle.
    pub settlement_quantity: i64,
    /// Normalized identifier derived from `code`.
    pub isbn: String,
}

/// Contact metadata printed in a report's contact block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecContactInfo {
    /// Supplier name.
    pub proveedor: String,
    /// Contact person.
    pub contacto: String,
    /// Phone or mail.
    pub fono_mail: String,
    /// Agreed discount.
    pub descuento: String,
    /// Payment terms.
    pub pago: String,
    /// Settlement date.
    pub fecha: String,
}

impl SpecContactInfo {
    /// Values in contact-block order.
    pub fn values(&self) -> [&str; 6] {
        [
            &self.proveedor,
            &self.contacto,
            &self.fono_mail,
            &self.descuento,
            &self.pago,
            &self.fecha,
        ]
    }
}

/// Settlement of one publisher, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPublisherSettlement {
    /// Canonical publisher id.
    pub publisher_id: String,
    /// Rows sorted ascending by product.
    pub rows: Vec<SpecSettlementRow>,
    /// Contact block values; defaults to empty strings.
    pub contact_info: SpecContactInfo,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Structural failures that abort a settlement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleError {
    /// Required columns absent after header normalization.
    MissingColumn {
        /// Missing canonical labels.
        columns: Vec<String>,
    },
    /// No header contains the consignment pattern.
    NoPublisherColumns,
    /// Workbook bytes could not be opened or parsed.
    WorkbookRead(String),
    /// Requested sheet does not exist.
    SheetNotFound(String),
    /// Normalized table construction failed.
    Table(String),
}

impl fmt::Display for SettleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { columns } => {
                write!(f, "Missing required column(s): {}", columns.join(", "))
            }
            Self::NoPublisherColumns => {
                write!(
                    f,
                    "No consignment columns found (expected a header containing 'consignacion')."
                )
            }
            Self::WorkbookRead(msg) => write!(f, "Failed to read workbook: {msg}"),
            Self::SheetNotFound(name) => write!(f, "Sheet not found: {name:?}"),
            Self::Table(msg) => write!(f, "Failed to build input table: {msg}"),
        }
    }
}

impl std::error::Error for SettleError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
