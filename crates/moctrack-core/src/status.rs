//! Invoice status machine and the other invoice write paths.
//!
//! Any status may move to any other status. Moving into PAID needs a receipt
//! date; moving anywhere else clears it. Every function here returns a new
//! invoice snapshot and leaves persistence to the caller.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derivation::{derive, payable_of, round2, Rates};
use crate::error::{Result, ValidationError};
use crate::models::contract::Contract;
use crate::models::invoice::{Invoice, InvoiceStatus};
use crate::numbering::next_invoice_number;

/// Move an invoice to a new status.
///
/// The receipt date is only kept when the target is PAID; for any other
/// target it is dropped whatever the caller passed.
pub fn apply_status(
    invoice: &Invoice,
    status: InvoiceStatus,
    receipt_date: Option<NaiveDate>,
) -> std::result::Result<Invoice, ValidationError> {
    let receipt_date = match status {
        InvoiceStatus::Paid => Some(receipt_date.ok_or(ValidationError::ReceiptDateRequired)?),
        InvoiceStatus::Pmd | InvoiceStatus::Pmt | InvoiceStatus::Finance => None,
    };

    debug!(
        "Invoice {}: {} -> {}",
        invoice.invoice_number, invoice.status, status
    );

    Ok(Invoice {
        status,
        receipt_date,
        ..invoice.clone()
    })
}

/// A combined edit of an invoice's amounts and/or status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceChange {
    /// New base amount; VAT and retention are re-derived from it.
    pub amount: Option<Decimal>,

    /// Explicit VAT override.
    pub vat: Option<Decimal>,

    /// Explicit retention override.
    pub retention: Option<Decimal>,

    /// Target status.
    pub status: Option<InvoiceStatus>,

    /// Receipt date for a move into PAID.
    pub receipt_date: Option<NaiveDate>,
}

impl InvoiceChange {
    pub fn status(status: InvoiceStatus, receipt_date: Option<NaiveDate>) -> Self {
        Self {
            status: Some(status),
            receipt_date,
            ..Self::default()
        }
    }

    pub fn amount(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Apply an edit: amounts first (payable re-derived), then the status rule.
///
/// A PAID invoice that stays PAID keeps its receipt date unless a new one is given.
pub fn apply_change(
    invoice: &Invoice,
    change: &InvoiceChange,
    rates: &Rates,
) -> std::result::Result<Invoice, ValidationError> {
    let mut next = invoice.clone();

    if let Some(amount) = change.amount {
        let derived = derive(amount, rates)?;
        next.amount = derived.amount;
        next.vat = derived.vat;
        next.retention = derived.retention;
    }
    if let Some(vat) = change.vat {
        next.vat = non_negative("vat", vat)?;
    }
    if let Some(retention) = change.retention {
        next.retention = non_negative("retention", retention)?;
    }
    next.payable = payable_of(next.amount, next.vat, next.retention);

    let status = change.status.unwrap_or(invoice.status);
    let receipt_date = change.receipt_date.or(match status {
        InvoiceStatus::Paid => invoice.receipt_date,
        _ => None,
    });

    apply_status(&next, status, receipt_date)
}

fn non_negative(field: &'static str, value: Decimal) -> std::result::Result<Decimal, ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(round2(value))
}

/// Raise a new invoice against a contract.
///
/// The invoice starts in PMD without a receipt date, takes the next number in
/// the contract's sequence, and uses that number as its identifier.
pub fn issue_invoice(
    contract: &Contract,
    existing: &[Invoice],
    amount: Decimal,
    invoice_date: NaiveDate,
    rates: &Rates,
) -> Result<Invoice> {
    let derived = derive(amount, rates)?;
    let invoice_number = next_invoice_number(
        &contract.contract_number,
        existing.iter().map(|i| i.invoice_number.as_str()),
    )?;

    debug!(
        "Issuing {} against {} for {}",
        invoice_number, contract.contract_number, derived.amount
    );

    Ok(Invoice {
        id: invoice_number.clone(),
        contract_id: contract.id.clone(),
        invoice_number,
        invoice_date,
        amount: derived.amount,
        vat: derived.vat,
        retention: derived.retention,
        payable: derived.payable,
        status: InvoiceStatus::Pmd,
        receipt_date: None,
    })
}
