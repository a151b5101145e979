//! Exchange data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use till_shared::types::LocationId;

use super::denomination::{Denomination, DenominationSubset};
use super::error::AllocationError;

/// An amount to break into bills from a chosen subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Cash amount; must be a positive whole number.
    pub amount: Decimal,
    /// Denominations the location may hand out.
    pub subset: DenominationSubset,
}

impl AllocationRequest {
    /// Creates a request. The engine validates the amount.
    #[must_use]
    pub const fn new(amount: Decimal, subset: DenominationSubset) -> Self {
        Self { amount, subset }
    }
}

/// Bill counts that add up exactly to a requested amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Bills per selected denomination. Unselected denominations never appear.
    pub counts: BTreeMap<Denomination, u64>,
    /// Total number of bills.
    pub total_bills: u64,
    /// Total value of the bills; equals the requested amount.
    pub total_value: u64,
}

impl AllocationResult {
    /// Bills of `denom`, zero if it was not selected.
    #[must_use]
    pub fn count(&self, denom: Denomination) -> u64 {
        self.counts.get(&denom).copied().unwrap_or(0)
    }

    /// Value contributed by `denom`.
    #[must_use]
    pub fn value_of(&self, denom: Denomination) -> u64 {
        self.count(denom) * u64::from(denom.value())
    }
}

/// Raw per-location input as collected by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    /// Location the cash belongs to.
    #[serde(alias = "id")]
    pub location_id: LocationId,
    /// Amount to exchange.
    pub amount: Decimal,
    /// Selected bill face values, unvalidated.
    #[serde(default)]
    pub denominations: Vec<u32>,
}

impl LocationRequest {
    /// Creates a location request.
    #[must_use]
    pub fn new(location_id: impl Into<LocationId>, amount: Decimal, denominations: &[u32]) -> Self {
        Self {
            location_id: location_id.into(),
            amount,
            denominations: denominations.to_vec(),
        }
    }
}

/// Outcome of allocating one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationReport {
    /// Location the report belongs to.
    pub location_id: LocationId,
    /// Request as supplied by the caller.
    pub request: LocationRequest,
    /// Allocation or the reason it failed.
    pub outcome: Result<AllocationResult, AllocationError>,
}

impl LocationReport {
    /// Builds a report for `request`.
    #[must_use]
    pub fn new(
        request: LocationRequest,
        outcome: Result<AllocationResult, AllocationError>,
    ) -> Self {
        Self {
            location_id: request.location_id.clone(),
            request,
            outcome,
        }
    }

    /// Returns true if the location was allocated.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Combined totals across locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeSummary {
    /// Bills handed out per denomination, summed across successful locations.
    pub per_denom_totals: BTreeMap<Denomination, u64>,
    /// Value handed out across successful locations.
    pub total_value_exchanged: u64,
    /// Locations whose allocation failed, sorted by location id.
    pub failed_locations: Vec<(LocationId, AllocationError)>,
}

/// Per-location reports together with their summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeReport {
    /// Reports in input order.
    pub locations: Vec<LocationReport>,
    /// Combined totals.
    pub summary: ExchangeSummary,
}
