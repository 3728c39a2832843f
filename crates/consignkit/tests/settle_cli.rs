// End-to-end tests for the `consignkit` binary.
// Run with: cargo test -p consignkit --test settle_cli -- --nocapture

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use rust_xlsxwriter::Workbook;

fn consignkit(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_consignkit"));
    cmd.current_dir(dir);
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn run_ok(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("spawn consignkit");
    assert!(
        output.status.success(),
        "consignkit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn write_stock_workbook(path: &Path, headers: &[&str], rows: &[(&str, &str, f64, Vec<f64>)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Stock actual").expect("name");
    worksheet.write_string(0, 0, "Informe de stock").expect("banner");

    for (n_idx_col, c_header) in headers.iter().enumerate() {
        worksheet
            .write_string(5, n_idx_col as u16, *c_header)
            .expect("header");
    }
    for (n_idx_row, (c_product, c_code, n_warehouse, l_consignment)) in rows.iter().enumerate() {
        let n_row = 6 + n_idx_row as u32;
        worksheet.write_string(n_row, 0, *c_product).expect("product");
        worksheet.write_string(n_row, 1, *c_code).expect("code");
        worksheet.write_number(n_row, 2, *n_warehouse).expect("warehouse");
        for (n_offset, n_val) in l_consignment.iter().enumerate() {
            worksheet
                .write_number(n_row, 3 + n_offset as u16, *n_val)
                .expect("consignment");
        }
    }
    workbook.save(path).expect("save stock workbook");
}

fn read_report_cell(path: &Path, row: u32, col: u32) -> Option<Data> {
    let v_document = std::fs::read(path).expect("read report");
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(v_document)).expect("open");
    let range = workbook.worksheet_range("Liquidación").expect("sheet");
    range.get_value((row, col)).cloned()
}

fn seed_two_publishers(dir: &Path) -> PathBuf {
    let path = dir.join("stock.xlsx");
    write_stock_workbook(
        &path,
        &[
            "Producto",
            "Codigo",
            "BODEGA GENERAL BARI",
            "CONSIGNACIONES SM",
            "Consignacion-2024 Planeta",
        ],
        &[
            ("Libro B", "9789561234567", 3.0, vec![10.0, 1.0]),
            ("Libro A", "9789561111111/A", 0.0, vec![2.0, 0.0]),
        ],
    );
    path
}

#[test]
fn settle_writes_one_report_per_publisher_with_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path_stock = seed_two_publishers(dir.path());

    run_ok(consignkit(dir.path()).args([
        "contact",
        "set",
        "SM",
        "--proveedor",
        "Ediciones SM",
        "--fecha",
        "2024-03-01",
    ]));

    let output = run_ok(
        consignkit(dir.path())
            .arg("settle")
            .arg(&path_stock)
            .args(["--out", "salida"]),
    );
    let c_stdout = String::from_utf8_lossy(&output.stdout);
    assert!(c_stdout.contains("No data to settle:\n  PLANETA"));
    assert!(c_stdout.contains("[SETTLE] publishers=2 reports=1 no_data=1 rows=2"));

    let path_report = dir
        .path()
        .join("salida")
        .join("Liquidacion_Consignaciones_SM.xlsx");
    assert!(path_report.is_file());
    assert!(
        !dir.path()
            .join("salida")
            .join("Liquidacion_Consignaciones_PLANETA.xlsx")
            .exists()
    );

    assert_eq!(
        read_report_cell(&path_report, 0, 1),
        Some(Data::String("LIQUIDACION CONSIGNACIONES SM".to_string()))
    );
    assert_eq!(
        read_report_cell(&path_report, 7, 2),
        Some(Data::String("Ediciones SM".to_string()))
    );
    assert_eq!(read_report_cell(&path_report, 16, 1), Some(Data::Float(2.0)));
    assert_eq!(
        read_report_cell(&path_report, 16, 3),
        Some(Data::Float(9789561111111.0))
    );
    assert_eq!(read_report_cell(&path_report, 17, 1), Some(Data::Float(7.0)));
}

#[test]
fn settle_dry_run_prints_rows_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path_stock = seed_two_publishers(dir.path());

    let output = run_ok(
        consignkit(dir.path())
            .arg("settle")
            .arg(&path_stock)
            .arg("--dry-run"),
    );
    let c_stdout = String::from_utf8_lossy(&output.stdout);
    assert!(c_stdout.contains("== SM (2 rows)"));
    assert!(c_stdout.contains("Libro A  9789561111111"));
    assert!(!dir.path().join("liquidaciones").exists());
}

#[test]
fn settle_missing_column_fails_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path_stock = dir.path().join("stock.xlsx");
    write_stock_workbook(
        &path_stock,
        &["Producto", "Codigo", "CONSIGNACIONES SM"],
        &[],
    );

    let output = consignkit(dir.path())
        .arg("settle")
        .arg(&path_stock)
        .output()
        .expect("spawn consignkit");
    assert!(!output.status.success());
    let c_stderr = String::from_utf8_lossy(&output.stderr);
    assert!(c_stderr.contains("BODEGA GENERAL BARI"));
    assert!(!dir.path().join("liquidaciones").exists());
}

#[test]
fn settle_reads_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path_stock = seed_two_publishers(dir.path());
    std::fs::write(
        dir.path().join("consignkit.toml"),
        "sheet_name = \"Stock actual\"\ndir_output = \"desde_config\"\n",
    )
    .expect("config");

    run_ok(
        consignkit(dir.path())
            .args(["--config", "consignkit.toml", "settle"])
            .arg(&path_stock),
    );
    assert!(
        dir.path()
            .join("desde_config")
            .join("Liquidacion_Consignaciones_SM.xlsx")
            .is_file()
    );
}

#[test]
fn contact_show_lists_stored_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    run_ok(consignkit(dir.path()).args(["contact", "set", "SM", "--pago", "30 dias"]));

    let output = run_ok(consignkit(dir.path()).args(["contact", "show", "SM"]));
    let c_stdout = String::from_utf8_lossy(&output.stdout);
    assert!(c_stdout.starts_with("SM\n"));
    assert!(c_stdout.contains("PAGO: 30 dias"));

    let output = run_ok(consignkit(dir.path()).args(["contact", "show", "NADIE"]));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No contact stored for NADIE"));
}

#[test]
fn contact_set_with_lowercase_id_reaches_settle_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path_stock = seed_two_publishers(dir.path());

    let output = run_ok(consignkit(dir.path()).args([
        "contact",
        "set",
        " sm",
        "--proveedor",
        "Ediciones SM",
    ]));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Saved contact for SM"));

    run_ok(
        consignkit(dir.path())
            .arg("settle")
            .arg(&path_stock)
            .args(["--out", "salida"]),
    );
    let path_report = dir
        .path()
        .join("salida")
        .join("Liquidacion_Consignaciones_SM.xlsx");
    assert_eq!(
        read_report_cell(&path_report, 7, 2),
        Some(Data::String("Ediciones SM".to_string()))
    );

    let output = run_ok(consignkit(dir.path()).args(["contact", "show", "sm"]));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("SM\n"));
}
