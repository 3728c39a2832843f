//! `consignkit`: consignment settlement reports from a stock workbook.
//!
//! Usage:
//!   consignkit settle <WORKBOOK> [--out DIR] [--logo PATH] [--dry-run]
//!   consignkit contact set <PUBLISHER_ID> --proveedor .. --fecha ..
//!   consignkit contact show [<PUBLISHER_ID>]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use consignkit::batch::{plan_settlements, render_settlement_plan, write_batch_documents};
use consignkit::config::SpecConsignConfig;
use consignkit::contact::{ContactRepository, JsonFileContactRepository, derive_contact_key};
use consignkit::logo::load_logo;
use consignkit_io_xlsx::conf::TUP_CONTACT_LABELS;
use consignkit_settle::spec::{SpecContactInfo, SpecPublisherSettlement};

/// Consignment settlement reports.
#[derive(Parser, Debug)]
#[command(name = "consignkit", version, about = "Consignment settlement reports")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true, env = "CONSIGNKIT_CONFIG")]
    config: Option<PathBuf>,

    /// JSON contact store (overrides config).
    #[arg(long, global = true)]
    contacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one report per publisher with something to settle.
    Settle {
        /// Stock workbook (.xlsx/.xls/.ods).
        workbook: PathBuf,

        /// Output directory (overrides config).
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Logo image (overrides the default logo).
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Sheet to read (overrides config).
        #[arg(long)]
        sheet: Option<String>,

        /// Zero-based header row (overrides config).
        #[arg(long)]
        header_row: Option<usize>,

        /// Print the settlement rows without writing reports.
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage publisher contacts.
    #[command(subcommand)]
    Contact(ContactCommands),
}

#[derive(Subcommand, Debug)]
enum ContactCommands {
    /// Insert or replace a publisher contact.
    Set {
        /// Publisher id as printed in report titles.
        publisher_id: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Show one contact, or all when no id is given.
    Show { publisher_id: Option<String> },
}

#[derive(Args, Debug)]
struct ContactFields {
    #[arg(long, default_value = "")]
    proveedor: String,
    #[arg(long, default_value = "")]
    contacto: String,
    #[arg(long, default_value = "")]
    fono_mail: String,
    #[arg(long, default_value = "")]
    descuento: String,
    #[arg(long, default_value = "")]
    pago: String,
    #[arg(long, default_value = "")]
    fecha: String,
}

impl From<ContactFields> for SpecContactInfo {
    fn from(fields: ContactFields) -> Self {
        Self {
            proveedor: fields.proveedor,
            contacto: fields.contacto,
            fono_mail: fields.fono_mail,
            descuento: fields.descuento,
            pago: fields.pago,
            fecha: fields.fecha,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = SpecConsignConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.contacts {
        config.path_contacts = path;
    }
    let mut contacts = JsonFileContactRepository::new(&config.path_contacts);

    match cli.command {
        Commands::Settle {
            workbook,
            out,
            logo,
            sheet,
            header_row,
            dry_run,
        } => {
            if let Some(dir) = out {
                config.dir_output = dir;
            }
            if sheet.is_some() {
                config.sheet_name = sheet;
            }
            if let Some(n_row) = header_row {
                config.header_row_index = n_row;
            }
            run_settle(&config, &contacts, &workbook, logo.as_deref(), dry_run)
        }
        Commands::Contact(ContactCommands::Set {
            publisher_id,
            fields,
        }) => {
            let c_id = derive_contact_key(&publisher_id);
            contacts.put(&c_id, SpecContactInfo::from(fields))?;
            println!("Saved contact for {c_id}");
            Ok(())
        }
        Commands::Contact(ContactCommands::Show { publisher_id }) => {
            match publisher_id {
                Some(c_id) => {
                    let c_id = derive_contact_key(&c_id);
                    match contacts.get(&c_id)? {
                        Some(info) => print_contact(&c_id, &info),
                        None => println!("No contact stored for {c_id}"),
                    }
                }
                None => {
                    for (c_id, info) in contacts.list()? {
                        print_contact(&c_id, &info);
                    }
                }
            }
            Ok(())
        }
    }
}

fn run_settle(
    config: &SpecConsignConfig,
    contacts: &dyn ContactRepository,
    path_workbook: &Path,
    path_logo: Option<&Path>,
    dry_run: bool,
) -> Result<(), Box<dyn Error>> {
    let v_workbook = std::fs::read(path_workbook)
        .map_err(|err| format!("Failed to read {}: {err}", path_workbook.display()))?;
    let plan = plan_settlements(&v_workbook, &config.to_read_options(), contacts)?;

    if dry_run {
        for settlement in &plan.settlements {
            print_settlement(settlement);
        }
        print_no_data(&plan.publishers_no_data);
        println!("{}", plan.report);
        return Ok(());
    }

    let spec_logo = load_logo(path_logo, &config.path_logo_default);
    let mut batch = render_settlement_plan(plan, spec_logo.v_logo.as_deref())?;
    for c_warning in spec_logo.warnings {
        batch.report.add_warning(c_warning);
    }

    for path in write_batch_documents(&batch, &config.dir_output)? {
        println!("Wrote {}", path.display());
    }
    print_no_data(&batch.publishers_no_data);
    println!("{}", batch.report);
    Ok(())
}

fn print_settlement(settlement: &SpecPublisherSettlement) {
    println!(
        "== {} ({} rows)",
        settlement.publisher_id,
        settlement.rows.len()
    );
    for row in &settlement.rows {
        println!(
            "  {:>5}  {}  {}",
            row.settlement_quantity, row.product, row.isbn
        );
    }
}

fn print_no_data(publishers: &[String]) {
    if publishers.is_empty() {
        return;
    }
    println!("No data to settle:");
    for c_id in publishers {
        println!("  {c_id}");
    }
}

fn print_contact(publisher_id: &str, info: &SpecContactInfo) {
    println!("{publisher_id}");
    for (c_label, c_value) in TUP_CONTACT_LABELS.iter().zip(info.values()) {
        println!("  {c_label} {c_value}");
    }
}
