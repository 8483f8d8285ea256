//! Suppliers, their purchase orders and certified invoice records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A vendor entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
}

/// Purchase order issued to a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// PO number.
    pub po_number: String,

    /// Owning supplier identifier.
    pub supplier_id: String,

    /// Original currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Value in the original currency, VAT-exclusive.
    pub value: Decimal,

    /// Value in the original currency, VAT-inclusive.
    pub value_with_vat: Decimal,

    /// Local-currency equivalent of `value`, resolved upstream.
    pub local_value: Decimal,

    /// Local-currency equivalent of `value_with_vat`, resolved upstream.
    pub local_value_with_vat: Decimal,
}

fn default_currency() -> String {
    "SAR".to_string()
}

/// Supplier-facing certified invoice, the input rows of a ledger statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertifiedInvoiceRecord {
    /// Supplier invoice number.
    pub invoice_number: String,

    /// Date the invoice was certified.
    pub certified_date: NaiveDate,

    /// Payment type, e.g. "Progress" or "Advance".
    #[serde(default)]
    pub payment_type: String,

    /// Purchase order the invoice was raised against.
    pub po_number: String,

    /// Certified payable amount.
    pub payable: Decimal,
}

/// Everything known about one supplier for a statement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSnapshot {
    pub supplier: Supplier,

    #[serde(default)]
    pub purchase_orders: Vec<PurchaseOrder>,

    #[serde(default)]
    pub records: Vec<CertifiedInvoiceRecord>,
}
