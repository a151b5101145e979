//! Property-based tests for the exchange module.
//!
//! - Exact sum
//! - Band compliance
//! - Minimality against exhaustive enumeration
//! - Determinism
//! - Bounded search at large amounts
//! - Aggregation order independence

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregate::aggregate;
use super::denomination::{Denomination, DenominationSubset};
use super::engine::allocate;
use super::error::AllocationError;
use super::policy::BandPolicy;
use super::service::ExchangeService;
use super::types::LocationRequest;

/// Strategy for a non-empty selection from the catalog.
fn any_subset() -> impl Strategy<Value = DenominationSubset> {
    prop::sample::subsequence(vec![10u32, 5, 2], 1..=3)
        .prop_map(|raw| DenominationSubset::normalize(&raw).unwrap())
}

/// Strategy for amounts small enough to enumerate exhaustively.
fn small_amount() -> impl Strategy<Value = u64> {
    1u64..=250
}

/// Fewest bills over every assignment that meets the policy, if any.
fn brute_force_min_bills(
    policy: &BandPolicy,
    amount: u64,
    subset: &DenominationSubset,
) -> Option<u64> {
    let denoms: Vec<Denomination> = subset.descending().collect();
    let admits = |denom: Denomination, count: u64| {
        let value = count * u64::from(denom.value());
        policy
            .band_for(subset, denom)
            .is_none_or(|band| band.admits(amount, value))
    };

    let mut best: Option<u64> = None;
    let mut counts = vec![0u64; denoms.len()];
    loop {
        let value: u64 = denoms
            .iter()
            .zip(&counts)
            .map(|(denom, count)| u64::from(denom.value()) * count)
            .sum();
        if value == amount && denoms.iter().zip(&counts).all(|(d, c)| admits(*d, *c)) {
            let bills: u64 = counts.iter().sum();
            best = Some(best.map_or(bills, |b| b.min(bills)));
        }

        // Odometer over 0..=amount/face for each denomination.
        let mut i = 0;
        loop {
            if i == denoms.len() {
                return best;
            }
            if counts[i] < amount / u64::from(denoms[i].value()) {
                counts[i] += 1;
                break;
            }
            counts[i] = 0;
            i += 1;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any successful allocation, sum(denom * count) == amount.
    #[test]
    fn prop_exact_sum(amount in 1u64..100_000, subset in any_subset()) {
        let policy = BandPolicy::standard();
        if let Ok(result) = allocate(&policy, Decimal::from(amount), &subset) {
            let value: u64 = result
                .counts
                .iter()
                .map(|(denom, count)| u64::from(denom.value()) * count)
                .sum();
            prop_assert_eq!(value, amount);
            prop_assert_eq!(result.total_value, amount);
            prop_assert_eq!(result.total_bills, result.counts.values().sum::<u64>());
            prop_assert!(result.counts.keys().all(|denom| subset.contains(*denom)));
        }
    }

    /// Every banded denomination contributes within its band.
    #[test]
    fn prop_band_compliance(amount in 1u64..100_000, subset in any_subset()) {
        let policy = BandPolicy::standard();
        if let Ok(result) = allocate(&policy, Decimal::from(amount), &subset) {
            for band in policy.bands_for(&subset) {
                prop_assert!(
                    band.admits(amount, result.value_of(band.denom)),
                    "{} contributes {} of {}",
                    band.denom,
                    result.value_of(band.denom),
                    amount
                );
            }
        }
    }

    /// No valid assignment uses fewer bills, and infeasible means none exists.
    #[test]
    fn prop_minimal_bill_count(amount in small_amount(), subset in any_subset()) {
        let policy = BandPolicy::standard();
        let expected = brute_force_min_bills(&policy, amount, &subset);
        match allocate(&policy, Decimal::from(amount), &subset) {
            Ok(result) => prop_assert_eq!(Some(result.total_bills), expected),
            Err(err) => {
                prop_assert_eq!(err, AllocationError::Infeasible { amount });
                prop_assert_eq!(expected, None);
            }
        }
    }

    /// Minimality also holds when no bands apply.
    #[test]
    fn prop_minimal_without_bands(amount in small_amount(), subset in any_subset()) {
        let policy = BandPolicy::unconstrained();
        let expected = brute_force_min_bills(&policy, amount, &subset);
        let actual = allocate(&policy, Decimal::from(amount), &subset)
            .ok()
            .map(|result| result.total_bills);
        prop_assert_eq!(actual, expected);
    }

    /// Identical input gives identical output.
    #[test]
    fn prop_deterministic(amount in 1u64..100_000, subset in any_subset()) {
        let policy = BandPolicy::standard();
        let first = allocate(&policy, Decimal::from(amount), &subset);
        let second = allocate(&policy, Decimal::from(amount), &subset);
        prop_assert_eq!(first, second);
    }

    /// Large amounts settle in a handful of steps, feasible or not.
    #[test]
    fn prop_large_amounts_stay_bounded(
        amount in 1_000_000_000u64..1_000_000_000_000_000,
        subset in any_subset(),
    ) {
        let policy = BandPolicy::standard().with_max_search_steps(64);
        match allocate(&policy, Decimal::from(amount), &subset) {
            Ok(result) => {
                prop_assert_eq!(result.total_value, amount);
                for band in policy.bands_for(&subset) {
                    prop_assert!(band.admits(amount, result.value_of(band.denom)));
                }
            }
            Err(err) => prop_assert_eq!(err, AllocationError::Infeasible { amount }),
        }
    }

    /// Non-integer and non-positive amounts are rejected before searching.
    #[test]
    fn prop_rejects_fractional_amounts(whole in 0i64..10_000, cents in 1i64..100) {
        let amount = Decimal::new(whole * 100 + cents, 2);
        let result = allocate(&BandPolicy::standard(), amount, &DenominationSubset::full());
        prop_assert_eq!(result, Err(AllocationError::InvalidAmount(amount)));
    }

    /// The summary does not depend on the order of location reports.
    #[test]
    fn prop_aggregation_order_independent(
        batch in prop::collection::vec(
            (1u64..2_000, prop::sample::subsequence(vec![10u32, 5, 2], 0..=3)),
            1..8,
        )
        .prop_flat_map(|raw| {
            let n = raw.len();
            (Just(raw), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        })
    ) {
        let (raw_requests, order) = batch;
        let requests: Vec<LocationRequest> = raw_requests
            .iter()
            .enumerate()
            .map(|(i, (amount, raw))| {
                LocationRequest::new(format!("L{i}"), Decimal::from(*amount), raw)
            })
            .collect();

        let service = ExchangeService::default();
        let report = service.run(&requests);
        let shuffled: Vec<_> = order.iter().map(|&i| report.locations[i].clone()).collect();

        prop_assert_eq!(aggregate(&shuffled), report.summary);
    }
}
