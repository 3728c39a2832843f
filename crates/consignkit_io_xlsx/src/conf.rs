//! Report constants, boilerplate text and default preset factories.

use std::collections::BTreeMap;

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel maximum column width in character units.
pub const N_WIDTH_EXCEL_COL_MAX: usize = 255;

/// Worksheet name of every settlement report.
pub const C_SHEET_NAME: &str = "Liquidación";
/// Title prefix; the publisher id follows after one space.
pub const C_TITLE_PREFIX: &str = "LIQUIDACION CONSIGNACIONES";

/// Client block text.
pub const C_TEXT_CLIENT: &str = "CLIENTE: Librería Virtual y Distribuidora El Ático Ltda.\n\
Venta y Distribución de Libros\n\
General Bari 234, Providencia - Santiago, Teléfono: (56)2 21452308\n\
Rut: 70.082.998-0";

/// Observations block text.
pub const C_TEXT_OBSERVATIONS: &str = "OBSERVACIONES:\n\
1.- DESPACHAR A GENERAL BARI 234, PROVIDENCIA, SANTIAGO.\n\
2.- HORARIO RECEPCION DE PEDIDOS: LUNES A VIERNES 09:30 A 13:00 Y 16:00 A 18:30";

/// Contact block labels, one per row.
pub const TUP_CONTACT_LABELS: [&str; 6] = [
    "PROVEEDOR:",
    "CONTACTO:",
    "FONO / MAIL:",
    "DESCUENTO:",
    "PAGO:",
    "FECHA:",
];

/// Data table header labels.
pub const TUP_TABLE_HEADERS: [&str; 3] = ["Unidades a liquidar", "Producto", "ISBN"];

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnumFmtKey {
    /// Merged title block.
    Title,
    /// Merged client information block.
    Client,
    /// Contact block label cell.
    Label,
    /// Contact block value cell.
    Value,
    /// Data table header cell.
    Header,
    /// Data table text cell.
    Text,
    /// Data table integer cell.
    Integer,
    /// Observations block.
    Observations,
}

/// Build default named format presets used by [`crate::writer::SettlementReportWriter`].
pub fn derive_default_report_formats() -> BTreeMap<EnumFmtKey, SpecCellFormat> {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Arial".to_string()),
        font_size: Some(10),
        align: Some("left".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };
    let cfg_grid_fmt_spec = cfg_base_fmt_spec.with_(SpecCellFormat {
        border: Some(1),
        ..Default::default()
    });

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumFmtKey::Title,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(16),
            bold: Some(true),
            align: Some("center".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Client,
        cfg_base_fmt_spec.with_(SpecCellFormat {
            align: Some("center".to_string()),
            valign: Some("top".to_string()),
            text_wrap: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Label,
        cfg_grid_fmt_spec.with_(SpecCellFormat {
            font_size: Some(11),
            bold: Some(true),
            ..Default::default()
        }),
    );
    dict_fmt.insert(EnumFmtKey::Value, cfg_grid_fmt_spec.clone());
    dict_fmt.insert(
        EnumFmtKey::Header,
        cfg_grid_fmt_spec.with_(SpecCellFormat {
            font_size: Some(11),
            bold: Some(true),
            align: Some("center".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(EnumFmtKey::Text, cfg_grid_fmt_spec.clone());
    dict_fmt.insert(
        EnumFmtKey::Integer,
        cfg_grid_fmt_spec.with_(SpecCellFormat {
            num_format: Some("0".to_string()),
            ..Default::default()
        }),
    );
    dict_fmt.insert(
        EnumFmtKey::Observations,
        cfg_grid_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            valign: Some("top".to_string()),
            text_wrap: Some(true),
            ..Default::default()
        }),
    );

    dict_fmt
}
