//! Per-contract rollup of submitted, received and outstanding amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::derivation::{round2, with_vat, Rates};
use crate::error::ValidationError;
use crate::models::contract::{Contract, ContractSnapshot};
use crate::models::invoice::{Invoice, InvoiceStatus};

/// Amounts bucketed by invoice status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBuckets {
    /// With supply chain.
    #[serde(rename = "PMD")]
    pub pmd: Decimal,
    /// With project management.
    #[serde(rename = "PMT")]
    pub pmt: Decimal,
    #[serde(rename = "FINANCE")]
    pub finance: Decimal,
    #[serde(rename = "PAID")]
    pub paid: Decimal,
}

impl StatusBuckets {
    pub fn get(&self, status: InvoiceStatus) -> Decimal {
        match status {
            InvoiceStatus::Pmd => self.pmd,
            InvoiceStatus::Pmt => self.pmt,
            InvoiceStatus::Finance => self.finance,
            InvoiceStatus::Paid => self.paid,
        }
    }

    pub fn add(&mut self, status: InvoiceStatus, value: Decimal) {
        let slot = match status {
            InvoiceStatus::Pmd => &mut self.pmd,
            InvoiceStatus::Pmt => &mut self.pmt,
            InvoiceStatus::Finance => &mut self.finance,
            InvoiceStatus::Paid => &mut self.paid,
        };
        *slot += value;
    }

    /// Merge another set of buckets into this one.
    pub fn absorb(&mut self, other: &StatusBuckets) {
        for status in InvoiceStatus::ALL {
            self.add(status, other.get(status));
        }
    }
}

/// Financial summary of one contract and its invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRollup {
    pub contract_id: String,
    pub contract_number: String,
    pub project_type: String,

    /// Awarded value, VAT-exclusive.
    pub contract_value: Decimal,
    /// Awarded value uplifted by VAT.
    pub contract_value_with_vat: Decimal,

    /// Sum of invoice amounts.
    pub total_submitted: Decimal,
    /// Sum of invoice amounts plus VAT.
    pub total_submitted_with_vat: Decimal,
    /// Cash received: amount + vat - retention over PAID invoices.
    pub total_received: Decimal,
    /// Retention withheld on PAID invoices.
    pub retention_held: Decimal,

    /// Amount + VAT per status.
    pub total_under_status: StatusBuckets,
    /// Amount per status, VAT-exclusive.
    pub total_under_status_excl_vat: StatusBuckets,

    /// Contract value with VAT minus cash received.
    pub balance_outstanding: Decimal,
    /// Submitted amount as a percentage of contract value.
    pub submitted_percentage: Decimal,

    /// Number of invoices included in the totals.
    pub invoice_count: usize,
    /// Number of malformed invoices left out of the totals.
    pub skipped_invoices: usize,

    /// Included invoices ordered by date, then id.
    pub rows: Vec<Invoice>,
}

impl ContractRollup {
    /// Roll up a contract snapshot.
    pub fn from_snapshot(snapshot: &ContractSnapshot, rates: &Rates) -> Self {
        rollup_contract(&snapshot.contract, &snapshot.invoices, rates)
    }
}

/// `100 * part / whole`, rounded to two places; zero when `whole` is not positive.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return round2(Decimal::ZERO);
    }
    round2(part * Decimal::ONE_HUNDRED / whole)
}

/// Why an invoice cannot take part in a contract's rollup, if it can't.
pub fn admit(contract: &Contract, invoice: &Invoice) -> Result<(), ValidationError> {
    if invoice.contract_id != contract.id {
        return Err(ValidationError::ContractMismatch {
            invoice_id: invoice.id.clone(),
            expected: contract.id.clone(),
            found: invoice.contract_id.clone(),
        });
    }
    invoice.check()
}

/// Sort invoices by invoice date, breaking ties by id.
pub fn ordered_rows(invoices: &[Invoice]) -> Vec<Invoice> {
    let mut rows = invoices.to_vec();
    rows.sort_by(|a, b| {
        a.invoice_date
            .cmp(&b.invoice_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    rows
}

/// Aggregate a contract's invoices.
///
/// Malformed invoices are logged and skipped so one bad row cannot blank
/// the whole summary.
pub fn rollup_contract(contract: &Contract, invoices: &[Invoice], rates: &Rates) -> ContractRollup {
    let mut included = Vec::with_capacity(invoices.len());
    let mut skipped = 0;

    for invoice in invoices {
        match admit(contract, invoice) {
            Ok(()) => included.push(invoice.clone()),
            Err(e) => {
                warn!(
                    "Skipping invoice {} on contract {}: {}",
                    invoice.id, contract.contract_number, e
                );
                skipped += 1;
            }
        }
    }

    let mut total_submitted = Decimal::ZERO;
    let mut total_submitted_with_vat = Decimal::ZERO;
    let mut total_received = Decimal::ZERO;
    let mut retention_held = Decimal::ZERO;
    let mut under_status = StatusBuckets::default();
    let mut under_status_excl = StatusBuckets::default();

    for invoice in &included {
        total_submitted += invoice.amount;
        total_submitted_with_vat += invoice.gross();
        under_status.add(invoice.status, invoice.gross());
        under_status_excl.add(invoice.status, invoice.amount);

        if invoice.status.is_paid() {
            total_received += invoice.net_of_retention();
            retention_held += invoice.retention;
        }
    }

    let contract_value_with_vat = with_vat(contract.contract_value, rates.vat_rate);

    debug!(
        "Contract {}: {} invoices, submitted {}, received {}",
        contract.contract_number,
        included.len(),
        total_submitted,
        total_received
    );

    ContractRollup {
        contract_id: contract.id.clone(),
        contract_number: contract.contract_number.clone(),
        project_type: contract.project_type.clone(),
        contract_value: contract.contract_value,
        contract_value_with_vat,
        total_submitted: round2(total_submitted),
        total_submitted_with_vat: round2(total_submitted_with_vat),
        total_received: round2(total_received),
        retention_held: round2(retention_held),
        total_under_status: under_status,
        total_under_status_excl_vat: under_status_excl,
        balance_outstanding: round2(contract_value_with_vat - total_received),
        submitted_percentage: percentage(total_submitted, contract.contract_value),
        invoice_count: included.len(),
        skipped_invoices: skipped,
        rows: ordered_rows(&included),
    }
}
