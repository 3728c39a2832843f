use std::collections::BTreeMap;

use consignkit_settle::spec::{SpecPublisherSettlement, SpecSettlementRow};
use rust_xlsxwriter::{
    Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet, XlsxError,
};

use crate::conf::{
    C_SHEET_NAME, C_TEXT_CLIENT, C_TEXT_OBSERVATIONS, EnumFmtKey, TUP_CONTACT_LABELS,
    TUP_TABLE_HEADERS, derive_default_report_formats,
};
use crate::spec::{
    EnumCellValue, LogoLoadError, SpecAutofitCellsPolicy, SpecCellFormat, SpecRenderedReport,
    SpecReportLayout, SpecXlsxReport,
};
use crate::util::{
    coerce_identifier_cell, derive_report_title, plan_hidden_columns, plan_report_column_widths,
};

////////////////////////////////////////////////////////////////////////////////
// #region SettlementReportWriter

/// Fixed-layout settlement report writer.
///
/// One instance renders any number of publishers; each call to
/// [`SettlementReportWriter::render`] produces an independent workbook.
pub struct SettlementReportWriter {
    dict_fmt: BTreeMap<EnumFmtKey, Format>,
    layout: SpecReportLayout,
    policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SettlementReportWriter {
    fn default() -> Self {
        Self::new(
            derive_default_report_formats(),
            SpecReportLayout::default(),
            SpecAutofitCellsPolicy::default(),
        )
    }
}

impl SettlementReportWriter {
    /// Create a writer. Missing preset keys fall back to the defaults.
    pub fn new(
        fmt_specs: BTreeMap<EnumFmtKey, SpecCellFormat>,
        layout: SpecReportLayout,
        policy_autofit: SpecAutofitCellsPolicy,
    ) -> Self {
        let mut dict_fmt_spec = derive_default_report_formats();
        for (key, spec) in fmt_specs {
            let spec_merged = dict_fmt_spec
                .get(&key)
                .map(|spec_base| spec_base.merge(&spec))
                .unwrap_or(spec);
            dict_fmt_spec.insert(key, spec_merged);
        }
        let dict_fmt = dict_fmt_spec
            .iter()
            .map(|(key, spec)| (*key, derive_rust_xlsx_format(spec)))
            .collect();

        Self {
            dict_fmt,
            layout,
            policy_autofit,
        }
    }

    /// Render one publisher's settlement into workbook bytes.
    ///
    /// `logo` is optional. Undecodable logo bytes become a report warning and
    /// the document is produced without the image.
    pub fn render(
        &self,
        settlement: &SpecPublisherSettlement,
        logo: Option<&[u8]>,
    ) -> Result<SpecRenderedReport, String> {
        let mut report = SpecXlsxReport {
            sheet_name: C_SHEET_NAME.to_string(),
            nrows_data: settlement.rows.len(),
            ..Default::default()
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&report.sheet_name)
            .map_err(derive_xlsx_error_text)?;
        worksheet.set_screen_gridlines(false);
        worksheet
            .set_row_height(self.layout.rows_title.0, self.layout.height_row_title)
            .map_err(derive_xlsx_error_text)?;

        if let Some(v_logo) = logo {
            match self.insert_logo(worksheet, v_logo) {
                Ok(()) => report.if_logo = true,
                Err(err) => {
                    tracing::warn!(publisher = %settlement.publisher_id, "{err}");
                    report.warn(err.to_string());
                }
            }
        }

        let c_title = derive_report_title(&settlement.publisher_id);
        self.write_title_block(worksheet, &c_title)?;
        self.write_client_block(worksheet)?;
        self.write_contact_block(worksheet, &settlement.contact_info.values())?;
        let n_row_last = self.write_data_table(worksheet, &settlement.rows)?;
        report.row_observations = self.write_observations_block(worksheet, n_row_last)?;

        let widths = plan_report_column_widths(
            settlement.rows.iter().map(|row| row.product.as_str()),
            &c_title,
            &self.policy_autofit,
        );
        let n_col = self.layout.col_first;
        for (n_offset, n_width) in [widths.quantity, widths.product, widths.identifier]
            .into_iter()
            .enumerate()
        {
            worksheet
                .set_column_width(n_col + cast_col_num(n_offset)?, n_width as f64)
                .map_err(derive_xlsx_error_text)?;
        }
        for n_idx_col in plan_hidden_columns(self.layout.ncols_visible) {
            worksheet
                .set_column_hidden(cast_col_num(n_idx_col)?)
                .map_err(derive_xlsx_error_text)?;
        }

        let v_document = workbook.save_to_buffer().map_err(derive_xlsx_error_text)?;
        tracing::debug!(
            publisher = %settlement.publisher_id,
            rows = report.nrows_data,
            bytes = v_document.len(),
            "Rendered settlement report"
        );
        Ok(SpecRenderedReport { v_document, report })
    }

    fn fmt(&self, key: EnumFmtKey) -> Result<&Format, String> {
        self.dict_fmt
            .get(&key)
            .ok_or_else(|| format!("Missing format preset: {key:?}"))
    }

    fn insert_logo(&self, worksheet: &mut Worksheet, v_logo: &[u8]) -> Result<(), LogoLoadError> {
        let derive_logo_error = |err: XlsxError| LogoLoadError {
            message: err.to_string(),
        };
        let (n_width, n_height) = self.layout.size_logo;
        let image = Image::new_from_buffer(v_logo)
            .map_err(derive_logo_error)?
            .set_scale_to_size(n_width, n_height, false);
        worksheet
            .insert_image(self.layout.rows_title.0, 0, &image)
            .map_err(derive_logo_error)?;
        Ok(())
    }

    fn write_title_block(&self, worksheet: &mut Worksheet, title: &str) -> Result<(), String> {
        let (n_row_first, n_row_last) = self.layout.rows_title;
        worksheet
            .merge_range(
                n_row_first,
                self.layout.col_first,
                n_row_last,
                self.layout.col_last,
                title,
                self.fmt(EnumFmtKey::Title)?,
            )
            .map_err(derive_xlsx_error_text)?;
        Ok(())
    }

    fn write_client_block(&self, worksheet: &mut Worksheet) -> Result<(), String> {
        let (n_row_first, n_row_last) = self.layout.rows_client;
        worksheet
            .merge_range(
                n_row_first,
                self.layout.col_first,
                n_row_last,
                self.layout.col_last,
                C_TEXT_CLIENT,
                self.fmt(EnumFmtKey::Client)?,
            )
            .map_err(derive_xlsx_error_text)?;
        Ok(())
    }

    fn write_contact_block(
        &self,
        worksheet: &mut Worksheet,
        values: &[&str; 6],
    ) -> Result<(), String> {
        let fmt_label = self.fmt(EnumFmtKey::Label)?;
        let fmt_value = self.fmt(EnumFmtKey::Value)?;
        for (n_offset, (c_label, c_value)) in TUP_CONTACT_LABELS.iter().zip(values).enumerate() {
            let n_row = self.layout.row_contact_start + cast_row_num(n_offset)?;
            write_cell_with_format(
                worksheet,
                n_row,
                self.layout.col_first,
                &EnumCellValue::String(c_label.to_string()),
                fmt_label,
            )?;
            worksheet
                .merge_range(
                    n_row,
                    self.layout.col_first + 1,
                    n_row,
                    self.layout.col_last,
                    c_value,
                    fmt_value,
                )
                .map_err(derive_xlsx_error_text)?;
        }
        Ok(())
    }

    /// Write header plus rows; returns the last row written.
    fn write_data_table(
        &self,
        worksheet: &mut Worksheet,
        rows: &[SpecSettlementRow],
    ) -> Result<u32, String> {
        let n_row_header = self.layout.row_table_header;
        let n_col = self.layout.col_first;
        let fmt_header = self.fmt(EnumFmtKey::Header)?;
        let fmt_text = self.fmt(EnumFmtKey::Text)?;
        let fmt_integer = self.fmt(EnumFmtKey::Integer)?;

        for (n_offset, c_header) in TUP_TABLE_HEADERS.iter().enumerate() {
            write_cell_with_format(
                worksheet,
                n_row_header,
                n_col + cast_col_num(n_offset)?,
                &EnumCellValue::String(c_header.to_string()),
                fmt_header,
            )?;
        }

        let mut n_row = n_row_header;
        for row in rows {
            n_row += 1;
            write_cell_with_format(
                worksheet,
                n_row,
                n_col,
                &EnumCellValue::Number(row.settlement_quantity as f64),
                fmt_integer,
            )?;
            write_cell_with_format(
                worksheet,
                n_row,
                n_col + 1,
                &EnumCellValue::String(row.product.clone()),
                fmt_text,
            )?;
            let value_isbn = coerce_identifier_cell(&row.isbn);
            let fmt_isbn = match value_isbn {
                EnumCellValue::Number(_) => fmt_integer,
                _ => fmt_text,
            };
            write_cell_with_format(worksheet, n_row, n_col + 2, &value_isbn, fmt_isbn)?;
        }
        Ok(n_row)
    }

    /// Write observations below the table; returns its first row.
    fn write_observations_block(
        &self,
        worksheet: &mut Worksheet,
        n_row_last_data: u32,
    ) -> Result<u32, String> {
        let n_row_first = n_row_last_data + self.layout.gap_observations;
        let n_row_last = n_row_first + self.layout.height_observations.saturating_sub(1);
        worksheet
            .merge_range(
                n_row_first,
                self.layout.col_first,
                n_row_last,
                self.layout.col_last,
                C_TEXT_OBSERVATIONS,
                self.fmt(EnumFmtKey::Observations)?,
            )
            .map_err(derive_xlsx_error_text)?;
        Ok(n_row_first)
    }
}

/// Render with default formats, layout and widths.
pub fn render_settlement_report(
    settlement: &SpecPublisherSettlement,
    logo: Option<&[u8]>,
) -> Result<SpecRenderedReport, String> {
    SettlementReportWriter::default().render(settlement, logo)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatHelpers

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
