//! `consignkit_io_xlsx` v1:
//! Fixed-layout XLSX settlement report renderer.
//!
//! - `conf`   : constants, boilerplate text and default presets
//! - `spec`   : formats/layout/report models
//! - `util`   : pure helper functions
//! - `writer` : report writer kernel
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{C_SHEET_NAME, EnumFmtKey, derive_default_report_formats};
pub use spec::{
    EnumCellValue, LogoLoadError, SpecAutofitCellsPolicy, SpecCellFormat, SpecColumnWidths,
    SpecRenderedReport, SpecReportLayout, SpecXlsxReport,
};
pub use util::{
    coerce_identifier_cell, derive_report_title, estimate_unicode_string_width,
    plan_report_column_widths,
};
pub use writer::{SettlementReportWriter, render_settlement_report};
