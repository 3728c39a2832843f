//! Settlement batch: workbook bytes in, one document per publisher out.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use consignkit_io_xlsx::writer::SettlementReportWriter;
use consignkit_settle::resolve::read_input_table;
use consignkit_settle::settle::settle_publisher;
use consignkit_settle::spec::{
    SettleError, SpecPublisherSettlement, SpecSettlementRow, SpecWorkbookReadOptions,
};
use consignkit_settle::util::derive_report_file_name;

use crate::contact::{ContactRepository, ContactStoreError};
use crate::report::ReportSettle;

////////////////////////////////////////////////////////////////////////////////
// #region BatchModels

/// One rendered publisher report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGeneratedReport {
    /// Canonical publisher id.
    pub publisher_id: String,
    /// Output file name.
    pub filename: String,
    /// Workbook bytes.
    pub v_document: Vec<u8>,
}

/// Settlements computed for every publisher, before rendering.
#[derive(Debug, Clone, Default)]
pub struct SpecSettlementPlan {
    /// Publishers with at least one row, in sheet order.
    pub settlements: Vec<SpecPublisherSettlement>,
    /// Publishers with nothing to settle, in sheet order.
    pub publishers_no_data: Vec<String>,
    /// Counters and warnings.
    pub report: ReportSettle,
}

/// Batch result.
#[derive(Debug, Clone, Default)]
pub struct SpecSettleBatch {
    /// Rendered documents, in sheet order.
    pub documents: Vec<SpecGeneratedReport>,
    /// Publishers with nothing to settle, in sheet order.
    pub publishers_no_data: Vec<String>,
    /// Counters and warnings.
    pub report: ReportSettle,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Batch

/// Compute the settlement of every publisher column.
///
/// Structural problems abort before any publisher is processed. When two
/// columns map to the same publisher id, the later column's outcome replaces
/// the earlier one in place.
pub fn plan_settlements(
    v_workbook: &[u8],
    options: &SpecWorkbookReadOptions,
    contacts: &dyn ContactRepository,
) -> Result<SpecSettlementPlan, BatchError> {
    let spec_table = read_input_table(v_workbook, options)?;
    let mut report = ReportSettle::default();

    let mut l_outcomes: Vec<(String, Vec<SpecSettlementRow>)> = Vec::new();
    let mut dict_idx_outcome: BTreeMap<String, usize> = BTreeMap::new();
    for spec_publisher in &spec_table.publisher_columns {
        let l_rows = settle_publisher(&spec_table, spec_publisher)?;
        let c_id = spec_publisher.publisher_id.clone();
        match dict_idx_outcome.get(&c_id) {
            Some(&n_idx) => {
                let c_warning = format!(
                    "Publisher id collision: {c_id:?} from column {:?} replaces an earlier column",
                    spec_publisher.raw_header
                );
                tracing::warn!("{c_warning}");
                report.add_warning(c_warning);
                l_outcomes[n_idx].1 = l_rows;
            }
            None => {
                dict_idx_outcome.insert(c_id.clone(), l_outcomes.len());
                l_outcomes.push((c_id, l_rows));
            }
        }
    }

    let mut plan = SpecSettlementPlan::default();
    for (c_id, l_rows) in l_outcomes {
        report.cnt_publishers += 1;
        if l_rows.is_empty() {
            tracing::warn!(publisher = %c_id, "No data to settle");
            report.cnt_no_data += 1;
            plan.publishers_no_data.push(c_id);
            continue;
        }

        let contact_info = contacts.get(&c_id)?.unwrap_or_default();
        tracing::info!(publisher = %c_id, rows = l_rows.len(), "Settled publisher");
        report.cnt_rows += l_rows.len() as u64;
        plan.settlements.push(SpecPublisherSettlement {
            publisher_id: c_id,
            rows: l_rows,
            contact_info,
        });
    }
    plan.report = report;
    Ok(plan)
}

/// Settle and render every publisher.
pub fn run_settlement_batch(
    v_workbook: &[u8],
    options: &SpecWorkbookReadOptions,
    contacts: &dyn ContactRepository,
    logo: Option<&[u8]>,
) -> Result<SpecSettleBatch, BatchError> {
    let plan = plan_settlements(v_workbook, options, contacts)?;
    render_settlement_plan(plan, logo)
}

/// Render an already computed plan.
pub fn render_settlement_plan(
    plan: SpecSettlementPlan,
    logo: Option<&[u8]>,
) -> Result<SpecSettleBatch, BatchError> {
    let writer = SettlementReportWriter::default();
    let SpecSettlementPlan {
        settlements,
        publishers_no_data,
        mut report,
    } = plan;

    let mut l_documents = Vec::with_capacity(settlements.len());
    for settlement in &settlements {
        let rendered = writer
            .render(settlement, logo)
            .map_err(|message| BatchError::Render {
                publisher_id: settlement.publisher_id.clone(),
                message,
            })?;
        for c_warning in rendered.report.warnings {
            report.add_warning(format!("{}: {c_warning}", settlement.publisher_id));
        }
        l_documents.push(SpecGeneratedReport {
            publisher_id: settlement.publisher_id.clone(),
            filename: derive_report_file_name(&settlement.publisher_id),
            v_document: rendered.v_document,
        });
        report.cnt_reports += 1;
    }

    tracing::info!("{report}");
    Ok(SpecSettleBatch {
        documents: l_documents,
        publishers_no_data,
        report,
    })
}

/// Write every document into `dir_output`, creating it when needed.
pub fn write_batch_documents(
    batch: &SpecSettleBatch,
    dir_output: &Path,
) -> Result<Vec<PathBuf>, BatchError> {
    let derive_io_error = |path: &Path, err: std::io::Error| BatchError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    std::fs::create_dir_all(dir_output).map_err(|err| derive_io_error(dir_output, err))?;

    let mut l_paths = Vec::with_capacity(batch.documents.len());
    for document in &batch.documents {
        let path = dir_output.join(&document.filename);
        std::fs::write(&path, &document.v_document).map_err(|err| derive_io_error(&path, err))?;
        tracing::debug!(path = %path.display(), "Wrote report");
        l_paths.push(path);
    }
    Ok(l_paths)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures that abort a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// Input workbook is structurally unusable.
    Settle(SettleError),
    /// Contact store could not be read.
    Contact(ContactStoreError),
    /// A report failed to render.
    Render {
        /// Publisher being rendered.
        publisher_id: String,
        /// Writer error text.
        message: String,
    },
    /// A report could not be written to disk.
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settle(err) => write!(f, "{err}"),
            Self::Contact(err) => write!(f, "{err}"),
            Self::Render {
                publisher_id,
                message,
            } => write!(f, "Failed to render report for {publisher_id}: {message}"),
            Self::Io { path, message } => {
                write!(f, "Failed to write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Settle(err) => Some(err),
            Self::Contact(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SettleError> for BatchError {
    fn from(err: SettleError) -> Self {
        Self::Settle(err)
    }
}

impl From<ContactStoreError> for BatchError {
    fn from(err: ContactStoreError) -> Self {
        Self::Contact(err)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
