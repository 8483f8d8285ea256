//! Contract and portfolio rollups.

pub mod contract;
pub mod portfolio;

pub use contract::{ordered_rows, percentage, rollup_contract, ContractRollup, StatusBuckets};
pub use portfolio::{
    aggregate, project_types, resolve_filter, PortfolioQuery, PortfolioSummary, UnitMode,
    ValuePair, VatMode, OVERALL,
};
