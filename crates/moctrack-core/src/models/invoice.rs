//! Partial invoice raised against a contract.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::derivation::payable_of;
use crate::error::ValidationError;

/// Payment status of an invoice.
///
/// PMD, PMT and FINANCE name the desk currently holding the invoice; they are
/// not a strict pipeline and any of them may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// With supply chain.
    Pmd,
    /// With project management.
    Pmt,
    /// With the finance desk.
    Finance,
    /// Paid; carries a receipt date.
    Paid,
}

impl InvoiceStatus {
    /// All statuses in pipeline display order.
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Pmd,
        InvoiceStatus::Pmt,
        InvoiceStatus::Finance,
        InvoiceStatus::Paid,
    ];

    /// Wire code of the status.
    pub fn code(&self) -> &'static str {
        match self {
            InvoiceStatus::Pmd => "PMD",
            InvoiceStatus::Pmt => "PMT",
            InvoiceStatus::Finance => "FINANCE",
            InvoiceStatus::Paid => "PAID",
        }
    }

    /// Human readable desk name.
    pub fn desk(&self) -> &'static str {
        match self {
            InvoiceStatus::Pmd => "Supply chain",
            InvoiceStatus::Pmt => "Project management",
            InvoiceStatus::Finance => "Finance",
            InvoiceStatus::Paid => "Paid",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, InvoiceStatus::Paid)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PMD" => Ok(InvoiceStatus::Pmd),
            "PMT" => Ok(InvoiceStatus::Pmt),
            "FINANCE" => Ok(InvoiceStatus::Finance),
            "PAID" => Ok(InvoiceStatus::Paid),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

/// One partial billing event against exactly one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice identifier.
    pub id: String,

    /// Owning contract identifier.
    pub contract_id: String,

    /// Invoice number, unique per contract.
    pub invoice_number: String,

    /// Date the invoice was raised.
    pub invoice_date: NaiveDate,

    /// Base amount (VAT-exclusive).
    pub amount: Decimal,

    /// VAT amount.
    pub vat: Decimal,

    /// Retention withheld.
    pub retention: Decimal,

    /// Net amount due: amount + vat - retention.
    pub payable: Decimal,

    /// Current payment status.
    pub status: InvoiceStatus,

    /// Date the payment was received. Present only when PAID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_date: Option<NaiveDate>,
}

impl Invoice {
    /// Amount plus VAT.
    pub fn gross(&self) -> Decimal {
        self.amount + self.vat
    }

    /// Cash actually collected for this invoice: amount + vat - retention.
    pub fn net_of_retention(&self) -> Decimal {
        self.amount + self.vat - self.retention
    }

    /// Check the stored invoice against its invariants.
    pub fn check(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("amount", self.amount),
            ("vat", self.vat),
            ("retention", self.retention),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ValidationError::NegativeAmount { field, value });
            }
        }

        let expected = payable_of(self.amount, self.vat, self.retention);
        if expected != self.payable {
            return Err(ValidationError::PayableMismatch {
                expected,
                found: self.payable,
            });
        }

        match (self.status, self.receipt_date) {
            (InvoiceStatus::Paid, None) => Err(ValidationError::ReceiptDateRequired),
            (status, Some(_)) if !status.is_paid() => {
                Err(ValidationError::UnexpectedReceiptDate(status.to_string()))
            }
            _ => Ok(()),
        }
    }
}
