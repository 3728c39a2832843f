//! Shared report specification models.

use std::fmt;

use crate::conf::N_WIDTH_EXCEL_COL_MAX;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
}

/// Normalized cell value during write.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutSpecification

/// Fixed positions of the report blocks (zero-based rows/columns).
#[derive(Debug, Clone, PartialEq)]
pub struct SpecReportLayout {
    /// First column of the title/client/contact/table/observation blocks.
    pub col_first: u16,
    /// Last column of those blocks.
    pub col_last: u16,
    /// Title block rows (inclusive).
    pub rows_title: (u32, u32),
    /// Client block rows (inclusive).
    pub rows_client: (u32, u32),
    /// First contact block row.
    pub row_contact_start: u32,
    /// Data table header row.
    pub row_table_header: u32,
    /// Blank rows between the last data row and the observations block.
    pub gap_observations: u32,
    /// Observations block height in rows.
    pub height_observations: u32,
    /// Columns left visible (A..E).
    pub ncols_visible: usize,
    /// Row 1 height in points, with or without a logo.
    pub height_row_title: f64,
    /// Logo display size `(width, height)` in pixels.
    pub size_logo: (f64, f64),
}

impl Default for SpecReportLayout {
    fn default() -> Self {
        Self {
            col_first: 1,
            col_last: 3,
            rows_title: (0, 1),
            rows_client: (2, 5),
            row_contact_start: 7,
            row_table_header: 15,
            gap_observations: 2,
            height_observations: 4,
            ncols_visible: 5,
            height_row_title: 45.0,
            size_logo: (80.0, 50.0),
        }
    }
}

/// Column width policy for the data table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
    /// Fixed identifier column width.
    pub width_identifier: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            width_cell_min: 8,
            width_cell_max: N_WIDTH_EXCEL_COL_MAX,
            width_cell_padding: 2,
            width_identifier: 20,
        }
    }
}

/// Planned widths of the three data table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecColumnWidths {
    /// Quantity column.
    pub quantity: usize,
    /// Product column.
    pub product: usize,
    /// Identifier column.
    pub identifier: usize,
}

impl SpecColumnWidths {
    /// Sum of the three widths.
    pub fn total(&self) -> usize {
        self.quantity + self.product + self.identifier
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Logo bytes that could not be embedded. The report renders without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoLoadError {
    /// Underlying decoder message.
    pub message: String,
}

impl fmt::Display for LogoLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not insert logo: {}", self.message)
    }
}

impl std::error::Error for LogoLoadError {}

/// Per-render report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Worksheet name written.
    pub sheet_name: String,
    /// Number of data rows written.
    pub nrows_data: usize,
    /// First row of the observations block.
    pub row_observations: u32,
    /// Whether a logo was embedded.
    pub if_logo: bool,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Rendered document plus its report.
#[derive(Debug, Clone)]
pub struct SpecRenderedReport {
    /// Workbook bytes.
    pub v_document: Vec<u8>,
    /// Render diagnostics.
    pub report: SpecXlsxReport,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
