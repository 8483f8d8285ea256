//! Awarded contract (MOC) records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice::Invoice;

/// An awarded scope of work with a fixed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Contract identifier.
    pub id: String,

    /// Contract (MOC) number, also the prefix of its invoice numbers.
    pub contract_number: String,

    /// Short description of the scope.
    #[serde(default)]
    pub description: String,

    /// Awarded value, VAT-exclusive.
    pub contract_value: Decimal,

    /// Free-form classification, e.g. "Turnaround" or "Non-TA".
    #[serde(default)]
    pub project_type: String,

    /// PSSR review status.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pssr_status: Option<String>,

    /// PRB review status.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prb_status: Option<String>,

    /// Reviewer remarks.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remarks: Option<String>,
}

/// A contract together with the invoices raised against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub contract: Contract,

    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl ContractSnapshot {
    pub fn new(contract: Contract, invoices: Vec<Invoice>) -> Self {
        Self { contract, invoices }
    }
}
