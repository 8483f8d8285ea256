//! Supplier statement of account.
//!
//! The supplier's purchase-order value is booked as an opening credit, then
//! each certified invoice is debited in certified-date order and the running
//! balance carried down. Over-certification shows up as a negative balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::derivation::round2;
use crate::models::supplier::{CertifiedInvoiceRecord, PurchaseOrder, SupplierSnapshot};

/// One line of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Certified date; `None` on the opening row.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date: Option<NaiveDate>,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub po_number: Option<String>,

    pub credit: Decimal,
    pub debit: Decimal,

    /// Balance after this row.
    pub balance: Decimal,
}

/// A running-balance statement for one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supplier_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supplier_name: Option<String>,

    /// Opening row followed by one row per record.
    pub rows: Vec<StatementRow>,

    /// Opening balance (VAT-inclusive PO value).
    pub total_po_value: Decimal,

    /// Sum of all debits.
    pub total_certified: Decimal,

    /// Balance after the last row.
    pub balance_remaining: Decimal,

    /// PO numbers referenced by the records, in first-seen order.
    pub distinct_po_numbers: Vec<String>,
}

impl Statement {
    /// Build a supplier's statement from its POs and certified records.
    ///
    /// Only POs owned by the supplier count towards the opening balance, and
    /// records against POs the supplier does not own are left out.
    pub fn for_supplier(snapshot: &SupplierSnapshot) -> Self {
        let supplier = &snapshot.supplier;
        let owned: Vec<PurchaseOrder> = snapshot
            .purchase_orders
            .iter()
            .filter(|po| po.supplier_id == supplier.id)
            .cloned()
            .collect();

        let records: Vec<CertifiedInvoiceRecord> = snapshot
            .records
            .iter()
            .filter(|r| {
                let known = owned.iter().any(|po| po.po_number == r.po_number);
                if !known {
                    warn!(
                        "Skipping record {} for supplier {}: PO {} not owned by supplier",
                        r.invoice_number, supplier.name, r.po_number
                    );
                }
                known
            })
            .cloned()
            .collect();

        let mut statement = statement(opening_balance(&owned), &records);
        statement.supplier_id = Some(supplier.id.clone());
        statement.supplier_name = Some(supplier.name.clone());
        statement
    }

    /// Number of certified rows, excluding the opening row.
    pub fn record_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Total VAT-inclusive local-currency value of purchase orders.
pub fn opening_balance(purchase_orders: &[PurchaseOrder]) -> Decimal {
    round2(purchase_orders.iter().map(|po| po.local_value_with_vat).sum())
}

/// Sort records by certified date, then invoice number. Stable.
pub fn ordered_records(records: &[CertifiedInvoiceRecord]) -> Vec<CertifiedInvoiceRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        a.certified_date
            .cmp(&b.certified_date)
            .then_with(|| a.invoice_number.cmp(&b.invoice_number))
    });
    sorted
}

/// Build a running-balance statement from an opening balance and records.
pub fn statement(opening_balance: Decimal, records: &[CertifiedInvoiceRecord]) -> Statement {
    let opening_balance = round2(opening_balance);

    let mut distinct_po_numbers: Vec<String> = Vec::new();
    for record in records {
        if !distinct_po_numbers.contains(&record.po_number) {
            distinct_po_numbers.push(record.po_number.clone());
        }
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(StatementRow {
        date: None,
        description: "Opening balance".to_string(),
        invoice_number: None,
        payment_type: None,
        po_number: None,
        credit: opening_balance,
        debit: round2(Decimal::ZERO),
        balance: opening_balance,
    });

    let mut balance = opening_balance;
    let mut total_certified = Decimal::ZERO;

    for record in ordered_records(records) {
        let debit = round2(record.payable);
        balance -= debit;
        total_certified += debit;

        rows.push(StatementRow {
            date: Some(record.certified_date),
            description: format!("Invoice {}", record.invoice_number),
            invoice_number: Some(record.invoice_number),
            payment_type: Some(record.payment_type),
            po_number: Some(record.po_number),
            credit: round2(Decimal::ZERO),
            debit,
            balance,
        });
    }

    if balance.is_sign_negative() && !balance.is_zero() {
        debug!("Statement over-certified by {}", -balance);
    }

    Statement {
        supplier_id: None,
        supplier_name: None,
        rows,
        total_po_value: opening_balance,
        total_certified: round2(total_certified),
        balance_remaining: balance,
        distinct_po_numbers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supplier::Supplier;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(number: &str, m: u32, d: u32, po: &str, payable: &str) -> CertifiedInvoiceRecord {
        CertifiedInvoiceRecord {
            invoice_number: number.to_string(),
            certified_date: NaiveDate::from_ymd_opt(2024, m, d).unwrap(),
            payment_type: "Progress".to_string(),
            po_number: po.to_string(),
            payable: dec(payable),
        }
    }

    fn po(number: &str, supplier_id: &str, with_vat: &str) -> PurchaseOrder {
        PurchaseOrder {
            po_number: number.to_string(),
            supplier_id: supplier_id.to_string(),
            currency: "USD".to_string(),
            value: Decimal::ZERO,
            value_with_vat: Decimal::ZERO,
            local_value: Decimal::ZERO,
            local_value_with_vat: dec(with_vat),
        }
    }

    fn balances(s: &Statement) -> Vec<Decimal> {
        s.rows.iter().map(|r| r.balance).collect()
    }

    #[test]
    fn test_running_balance() {
        let records = [
            record("INV-2", 3, 1, "PO-1", "20000"),
            record("INV-1", 1, 15, "PO-1", "30000"),
        ];
        let s = statement(dec("100000"), &records);

        assert_eq!(s.rows.len(), 3);
        assert_eq!(balances(&s), vec![dec("100000"), dec("70000"), dec("50000")]);
        assert_eq!(s.rows[0].credit, dec("100000"));
        assert_eq!(s.rows[1].debit, dec("30000"));
        assert_eq!(s.total_po_value, dec("100000"));
        assert_eq!(s.total_certified, dec("50000"));
        assert_eq!(s.balance_remaining, dec("50000"));
    }

    #[test]
    fn test_empty_records() {
        let s = statement(dec("2500.50"), &[]);

        assert_eq!(s.rows.len(), 1);
        assert_eq!(s.record_count(), 0);
        assert_eq!(s.balance_remaining, dec("2500.50"));
        assert_eq!(s.total_certified, Decimal::ZERO);
        assert!(s.distinct_po_numbers.is_empty());
    }

    #[test]
    fn test_same_day_ties_break_on_invoice_number() {
        let records = [
            record("B-7", 2, 2, "PO-1", "1"),
            record("A-9", 2, 2, "PO-1", "2"),
            record("C-1", 2, 1, "PO-1", "3"),
        ];
        let s = statement(dec("10"), &records);
        let numbers: Vec<&str> = s.rows[1..]
            .iter()
            .map(|r| r.invoice_number.as_deref().unwrap())
            .collect();

        assert_eq!(numbers, vec!["C-1", "A-9", "B-7"]);
    }

    #[test]
    fn test_over_certification_goes_negative() {
        let records = [
            record("INV-1", 1, 1, "PO-1", "800"),
            record("INV-2", 1, 2, "PO-1", "400"),
        ];
        let s = statement(dec("1000"), &records);

        assert_eq!(s.balance_remaining, dec("-200"));
        assert_eq!(s.balance_remaining, s.total_po_value - s.total_certified);
    }

    #[test]
    fn test_distinct_po_numbers_first_seen() {
        let records = [
            record("INV-3", 5, 1, "PO-9", "1"),
            record("INV-1", 1, 1, "PO-2", "1"),
            record("INV-2", 2, 1, "PO-9", "1"),
        ];
        let s = statement(dec("10"), &records);

        assert_eq!(s.distinct_po_numbers, vec!["PO-9", "PO-2"]);
    }

    #[test]
    fn test_for_supplier() {
        let snapshot = SupplierSnapshot {
            supplier: Supplier {
                id: "sup-1".to_string(),
                name: "Gulf Fabrication".to_string(),
            },
            purchase_orders: vec![
                po("PO-1", "sup-1", "60000"),
                po("PO-2", "sup-1", "40000"),
                po("PO-3", "sup-2", "99999"),
            ],
            records: vec![
                record("INV-1", 1, 10, "PO-1", "30000"),
                record("INV-2", 2, 10, "PO-2", "20000"),
                record("INV-X", 1, 1, "PO-3", "5"),
            ],
        };
        let s = Statement::for_supplier(&snapshot);

        assert_eq!(s.supplier_name.as_deref(), Some("Gulf Fabrication"));
        assert_eq!(s.total_po_value, dec("100000"));
        assert_eq!(s.record_count(), 2);
        assert_eq!(s.balance_remaining, dec("50000"));
        assert_eq!(s.distinct_po_numbers, vec!["PO-1", "PO-2"]);
    }

    #[test]
    fn test_round_trip_recomputes_identically() {
        let records = vec![
            record("INV-1", 1, 15, "PO-1", "30000"),
            record("INV-2", 3, 1, "PO-1", "20000"),
        ];
        let s = statement(dec("100000"), &records);
        let json = serde_json::to_string(&s).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let json = serde_json::to_string(&records).unwrap();
        let records_back: Vec<CertifiedInvoiceRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(statement(dec("100000"), &records_back), s);
    }
}
