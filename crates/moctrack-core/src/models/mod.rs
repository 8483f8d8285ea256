//! Data models: contracts, invoices, suppliers and configuration.

pub mod config;
pub mod contract;
pub mod invoice;
pub mod supplier;

pub use config::{MocConfig, ReportingConfig};
pub use contract::{Contract, ContractSnapshot};
pub use invoice::{Invoice, InvoiceStatus};
pub use supplier::{CertifiedInvoiceRecord, PurchaseOrder, Supplier, SupplierSnapshot};
