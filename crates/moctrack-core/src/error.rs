//! Error types for the moctrack-core library.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the moctrack library.
#[derive(Error, Debug)]
pub enum MocError {
    /// Invoice validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Invoice numbering error.
    #[error("numbering error: {0}")]
    Numbering(#[from] NumberingError),

    /// Snapshot (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised when an invoice write or record fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Moving an invoice into PAID without a receipt date.
    #[error("receipt date is required when marking an invoice as PAID")]
    ReceiptDateRequired,

    /// A monetary field was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// Status string outside PMD, PMT, FINANCE, PAID.
    #[error("unknown invoice status: {0}")]
    UnknownStatus(String),

    /// Stored payable does not equal amount + vat - retention.
    #[error("payable {found} does not match amount + vat - retention ({expected})")]
    PayableMismatch { expected: Decimal, found: Decimal },

    /// A receipt date is stored on an invoice that is not PAID.
    #[error("receipt date present on an invoice in status {0}")]
    UnexpectedReceiptDate(String),

    /// The invoice belongs to a different contract than the one being rolled up.
    #[error("invoice {invoice_id} belongs to contract {found}, expected {expected}")]
    ContractMismatch {
        invoice_id: String,
        expected: String,
        found: String,
    },

    /// A rate could not be parsed.
    #[error("invalid rate: {0}")]
    InvalidRate(String),
}

/// Errors related to contract-scoped invoice numbering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberingError {
    /// The invoice number has no trailing sequence.
    #[error("invoice number has no sequence: {0}")]
    MissingSequence(String),

    /// The contract number is empty.
    #[error("contract number is empty")]
    EmptyContractNumber,
}

/// Result type for the moctrack library.
pub type Result<T> = std::result::Result<T, MocError>;
