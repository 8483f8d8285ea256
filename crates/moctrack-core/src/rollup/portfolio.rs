//! Portfolio-level aggregation for dashboards.
//!
//! Sums contract rollups across a (optionally project-type filtered) set of
//! contracts. Every sum is exact decimal addition, so the result does not
//! depend on the order contracts are given in.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derivation::{round2, Rates};
use crate::models::contract::ContractSnapshot;
use crate::models::invoice::InvoiceStatus;

use super::contract::{percentage, ContractRollup, StatusBuckets};

/// Label that means "every project type".
pub const OVERALL: &str = "Overall";

/// Whether headline values include VAT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatMode {
    #[default]
    Inclusive,
    Exclusive,
}

/// Display units for headline values. Scaling is left to the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    #[default]
    Full,
    Millions,
}

impl UnitMode {
    /// Scale a value for display.
    pub fn scale(&self, value: Decimal) -> Decimal {
        match self {
            UnitMode::Full => value,
            UnitMode::Millions => round2(value / Decimal::from(1_000_000)),
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            UnitMode::Full => "",
            UnitMode::Millions => "M",
        }
    }
}

/// A headline value on both VAT bases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePair {
    pub excluding_vat: Decimal,
    pub including_vat: Decimal,
}

impl ValuePair {
    pub fn new(excluding_vat: Decimal, including_vat: Decimal) -> Self {
        Self {
            excluding_vat,
            including_vat,
        }
    }

    /// The value on the requested basis.
    pub fn select(&self, mode: VatMode) -> Decimal {
        match mode {
            VatMode::Inclusive => self.including_vat,
            VatMode::Exclusive => self.excluding_vat,
        }
    }
}

/// Options for a portfolio run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioQuery {
    /// Project type to keep; `None` or "Overall" keeps everything.
    pub project_type: Option<String>,
    pub vat_mode: VatMode,
    pub unit_mode: UnitMode,
}

/// Aggregated dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Project type actually applied; `None` when unfiltered.
    pub project_type: Option<String>,
    pub vat_mode: VatMode,
    pub unit_mode: UnitMode,

    /// Σ contract value (VAT uplift applied per contract).
    pub awarded: ValuePair,
    /// Σ invoice amounts.
    pub submitted: ValuePair,
    /// Σ cash received; always VAT-inclusive and net of retention.
    pub collected: Decimal,
    /// Collected as a percentage of submitted (with VAT), on a 0 to 100
    /// scale (54.78 means 54.78%). Already multiplied by 100.
    pub collection_percentage: Decimal,
    /// Σ retention on PAID invoices.
    pub retention_held: Decimal,

    /// Per-status totals, VAT-inclusive.
    pub under_status: StatusBuckets,
    /// Per-status totals, VAT-exclusive.
    pub under_status_excl_vat: StatusBuckets,

    /// Number of contracts after filtering.
    pub contract_count: usize,
    pub invoice_count: usize,
    pub skipped_invoices: usize,

    /// Distinct project types across all contracts, before filtering.
    pub project_types: Vec<String>,
}

impl PortfolioSummary {
    /// Awarded value on the selected basis.
    pub fn awarded_value(&self) -> Decimal {
        self.awarded.select(self.vat_mode)
    }

    /// Submitted value on the selected basis.
    pub fn submitted_value(&self) -> Decimal {
        self.submitted.select(self.vat_mode)
    }

    /// Status total on the selected basis.
    pub fn status_value(&self, status: InvoiceStatus) -> Decimal {
        match self.vat_mode {
            VatMode::Inclusive => self.under_status.get(status),
            VatMode::Exclusive => self.under_status_excl_vat.get(status),
        }
    }
}

/// Distinct, sorted, non-empty project types.
pub fn project_types(contracts: &[ContractSnapshot]) -> Vec<String> {
    contracts
        .iter()
        .map(|s| s.contract.project_type.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve a requested filter to a known project type, or `None` for no filter.
pub fn resolve_filter(requested: Option<&str>, known: &[String]) -> Option<String> {
    let requested = requested?.trim();
    if requested.is_empty() || requested.eq_ignore_ascii_case(OVERALL) {
        return None;
    }
    known
        .iter()
        .find(|t| t.eq_ignore_ascii_case(requested))
        .cloned()
}

/// Aggregate contracts into dashboard figures.
pub fn aggregate(contracts: &[ContractSnapshot], query: &PortfolioQuery, rates: &Rates) -> PortfolioSummary {
    let types = project_types(contracts);
    let filter = resolve_filter(query.project_type.as_deref(), &types);

    let rollups: Vec<ContractRollup> = contracts
        .iter()
        .filter(|s| match &filter {
            Some(t) => s.contract.project_type.trim().eq_ignore_ascii_case(t),
            None => true,
        })
        .map(|s| ContractRollup::from_snapshot(s, rates))
        .collect();

    let mut awarded = ValuePair::default();
    let mut submitted = ValuePair::default();
    let mut collected = Decimal::ZERO;
    let mut retention_held = Decimal::ZERO;
    let mut under_status = StatusBuckets::default();
    let mut under_status_excl = StatusBuckets::default();
    let mut invoice_count = 0;
    let mut skipped_invoices = 0;

    for r in &rollups {
        awarded.excluding_vat += r.contract_value;
        awarded.including_vat += r.contract_value_with_vat;
        submitted.excluding_vat += r.total_submitted;
        submitted.including_vat += r.total_submitted_with_vat;
        collected += r.total_received;
        retention_held += r.retention_held;
        under_status.absorb(&r.total_under_status);
        under_status_excl.absorb(&r.total_under_status_excl_vat);
        invoice_count += r.invoice_count;
        skipped_invoices += r.skipped_invoices;
    }

    debug!(
        "Portfolio ({}): {} contracts, awarded {}, collected {}",
        filter.as_deref().unwrap_or(OVERALL),
        rollups.len(),
        awarded.excluding_vat,
        collected
    );

    PortfolioSummary {
        project_type: filter,
        vat_mode: query.vat_mode,
        unit_mode: query.unit_mode,
        awarded: ValuePair::new(round2(awarded.excluding_vat), round2(awarded.including_vat)),
        submitted: ValuePair::new(round2(submitted.excluding_vat), round2(submitted.including_vat)),
        collected: round2(collected),
        collection_percentage: percentage(collected, submitted.including_vat),
        retention_held: round2(retention_held),
        under_status,
        under_status_excl_vat: under_status_excl,
        contract_count: rollups.len(),
        invoice_count,
        skipped_invoices,
        project_types: types,
    }
}
