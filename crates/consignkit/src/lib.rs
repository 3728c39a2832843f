//! `consignkit` v1:
//! Consignment settlement batch and command-line front end.
//!
//! - `batch`   : per-publisher settle/render orchestration
//! - `config`  : TOML run configuration
//! - `contact` : publisher contact store
//! - `logo`    : logo discovery
//! - `report`  : batch counters and summary line
pub mod batch;
pub mod config;
pub mod contact;
pub mod logo;
pub mod report;

pub use batch::{
    BatchError, SpecGeneratedReport, SpecSettleBatch, SpecSettlementPlan, plan_settlements,
    render_settlement_plan, run_settlement_batch, write_batch_documents,
};
pub use config::{ConfigError, SpecConsignConfig};
pub use contact::{
    ContactRepository, ContactStoreError, JsonFileContactRepository, MemoryContactRepository,
};
pub use logo::{SpecLogoLoad, load_logo};
pub use report::ReportSettle;
