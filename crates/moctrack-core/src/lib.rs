//! Core library for MOC invoice tracking.
//!
//! This crate provides:
//! - VAT, retention and payable derivation with exact decimal rounding
//! - The invoice status lifecycle (PMD, PMT, FINANCE, PAID) and edit paths
//! - Contract and portfolio rollups for reporting dashboards
//! - Supplier running-balance statements
//!
//! Every computation is a pure function over the snapshot it is given.

pub mod derivation;
pub mod error;
pub mod ledger;
pub mod models;
pub mod numbering;
pub mod rollup;
pub mod status;

pub use derivation::{derive, round2, with_vat, Derivation, Rates};
pub use error::{MocError, NumberingError, Result, ValidationError};
pub use ledger::{statement, Statement, StatementRow};
pub use models::config::MocConfig;
pub use models::contract::{Contract, ContractSnapshot};
pub use models::invoice::{Invoice, InvoiceStatus};
pub use models::supplier::{CertifiedInvoiceRecord, PurchaseOrder, Supplier, SupplierSnapshot};
pub use numbering::next_invoice_number;
pub use rollup::{
    aggregate, rollup_contract, ContractRollup, PortfolioQuery, PortfolioSummary, UnitMode,
    VatMode,
};
pub use status::{apply_change, apply_status, issue_invoice, InvoiceChange};
