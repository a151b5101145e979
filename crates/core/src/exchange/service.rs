//! Exchange service: allocate a batch of locations and summarize them.

use rayon::prelude::*;
use tracing::{info, warn};

use super::aggregate::aggregate;
use super::engine::AllocationEngine;
use super::policy::BandPolicy;
use super::types::{ExchangeReport, LocationReport, LocationRequest};

/// Runs allocations for many locations under one policy.
#[derive(Debug, Clone, Default)]
pub struct ExchangeService {
    policy: BandPolicy,
}

impl ExchangeService {
    /// Creates a service using `policy` for every location.
    #[must_use]
    pub const fn new(policy: BandPolicy) -> Self {
        Self { policy }
    }

    /// Policy in use.
    #[must_use]
    pub const fn policy(&self) -> &BandPolicy {
        &self.policy
    }

    /// Allocates a single location.
    ///
    /// Never fails as a whole: bad input or an infeasible amount ends up in
    /// the report's outcome.
    #[must_use]
    pub fn allocate_location(&self, request: &LocationRequest) -> LocationReport {
        let outcome = AllocationEngine::new(&self.policy)
            .allocate_raw(request.amount, &request.denominations);

        if let Err(err) = &outcome {
            warn!(
                location = %request.location_id,
                amount = %request.amount,
                denominations = ?request.denominations,
                error = %err,
                "location allocation failed"
            );
        }

        LocationReport::new(request.clone(), outcome)
    }

    /// Allocates every location in parallel and summarizes the batch.
    ///
    /// `locations` in the report keep the order of `requests`.
    #[must_use]
    pub fn run(&self, requests: &[LocationRequest]) -> ExchangeReport {
        let locations: Vec<LocationReport> = requests
            .par_iter()
            .map(|request| self.allocate_location(request))
            .collect();

        let summary = aggregate(&locations);

        info!(
            locations = locations.len(),
            failed = summary.failed_locations.len(),
            total_value = summary.total_value_exchanged,
            total_bills = summary.total_bills(),
            "exchange complete"
        );

        ExchangeReport { locations, summary }
    }
}
