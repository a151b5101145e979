//! Allocation engine: exact minimum-bill search under band constraints.
//!
//! The search works on at most one bill count per catalog denomination:
//!
//! 1. Order the subset largest face value first.
//! 2. Turn each band into an inclusive count interval
//!    `[ceil(lower * amount / d), floor(upper * amount / d)]`. Denominations
//!    without a band get `[0, floor(amount / d)]`.
//! 3. Reject amounts that the gcd of the selected faces does not divide.
//! 4. Depth-first over the intervals, trying larger counts first. The last
//!    two denominations are not searched: the largest count of the bigger
//!    one that leaves an exact, in-band remainder for the smaller one is
//!    computed directly. A lone denomination is forced to close the gap.
//! 5. Keep the first assignment with the fewest bills.
//!
//! Branches are cut when the remaining value cannot be covered by the
//! remaining intervals, or when the fractional fill of the remaining
//! intervals (largest faces first, each capped at its interval) cannot beat
//! the best assignment found so far.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::denomination::{Denomination, DenominationSubset};
use super::error::AllocationError;
use super::policy::{BandConstraint, BandPolicy};
use super::types::{AllocationRequest, AllocationResult};

/// Allocates `amount` over `subset` under `policy`.
///
/// # Errors
///
/// See [`AllocationEngine::allocate`].
pub fn allocate(
    policy: &BandPolicy,
    amount: Decimal,
    subset: &DenominationSubset,
) -> Result<AllocationResult, AllocationError> {
    AllocationEngine::new(policy).allocate(&AllocationRequest::new(amount, subset.clone()))
}

/// Engine bound to one band policy.
#[derive(Debug, Clone, Copy)]
pub struct AllocationEngine<'p> {
    policy: &'p BandPolicy,
}

impl<'p> AllocationEngine<'p> {
    /// Creates an engine reading bands from `policy`.
    #[must_use]
    pub const fn new(policy: &'p BandPolicy) -> Self {
        Self { policy }
    }

    /// Finds the minimum-bill allocation for `request`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` if the amount is not a positive
    /// whole number.
    /// Returns `AllocationError::EmptyDenominationSet` if nothing is selected.
    /// Returns `AllocationError::Infeasible` if no bill combination satisfies
    /// the constraints.
    /// Returns `AllocationError::SearchLimitExceeded` if the policy's step
    /// limit is reached first.
    pub fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationResult, AllocationError> {
        let amount = validate_amount(request.amount)?;
        let subset = &request.subset;
        if subset.is_empty() {
            return Err(AllocationError::EmptyDenominationSet);
        }

        let faces = subset.descending().map(|denom| u64::from(denom.value()));
        if amount % faces.fold(0, gcd) != 0 {
            debug!(amount, subset = %subset, "amount not a multiple of the subset gcd");
            return Err(AllocationError::Infeasible { amount });
        }

        let mut slots = Vec::with_capacity(subset.len());
        for denom in subset.descending() {
            let band = self.policy.band_for(subset, denom);
            match Slot::new(denom, band, amount) {
                Some(slot) => slots.push(slot),
                None => return Err(AllocationError::Infeasible { amount }),
            }
        }

        let mut search = Search::new(&slots, self.policy.max_search_steps());
        search.descend(0, amount, 0)?;

        let Some((total_bills, counts)) = search.best else {
            debug!(amount, subset = %subset, steps = search.steps, "no feasible allocation");
            return Err(AllocationError::Infeasible { amount });
        };

        debug!(
            amount,
            subset = %subset,
            total_bills,
            steps = search.steps,
            "allocation found"
        );

        Ok(AllocationResult {
            counts: slots
                .iter()
                .zip(counts)
                .map(|(slot, count)| (slot.denom, count))
                .collect::<BTreeMap<_, _>>(),
            total_bills,
            total_value: amount,
        })
    }

    /// Normalizes raw face values, then allocates.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::UnknownDenomination` or
    /// `AllocationError::EmptyDenominationSet` for bad selections, otherwise
    /// the errors of [`Self::allocate`].
    pub fn allocate_raw(
        &self,
        amount: Decimal,
        denominations: &[u32],
    ) -> Result<AllocationResult, AllocationError> {
        let subset = DenominationSubset::normalize(denominations)?;
        self.allocate(&AllocationRequest::new(amount, subset))
    }
}

/// Checks that `amount` is a positive whole number.
///
/// # Errors
///
/// Returns `AllocationError::InvalidAmount` otherwise.
pub fn validate_amount(amount: Decimal) -> Result<u64, AllocationError> {
    if amount <= Decimal::ZERO || !amount.fract().is_zero() {
        return Err(AllocationError::InvalidAmount(amount));
    }
    amount
        .to_u64()
        .ok_or(AllocationError::InvalidAmount(amount))
}

/// Count interval for one denomination.
#[derive(Debug, Clone, Copy)]
struct Slot {
    denom: Denomination,
    face: u64,
    min: u64,
    max: u64,
}

impl Slot {
    /// Returns `None` when the band admits no whole bill count.
    fn new(denom: Denomination, band: Option<&BandConstraint>, amount: u64) -> Option<Self> {
        let face = u64::from(denom.value());
        let ceiling = amount / face;
        let (min, max) = match band {
            None => (0, ceiling),
            Some(band) => (
                ceil_count(band.min_value(amount), face),
                floor_count(band.max_value(amount), face).min(ceiling),
            ),
        };

        (min <= max).then_some(Self {
            denom,
            face,
            min,
            max,
        })
    }

    fn min_value(&self) -> u64 {
        self.min * self.face
    }

    fn max_value(&self) -> u64 {
        self.max * self.face
    }
}

/// Smallest `c` with `c * face >= value`.
fn ceil_count(value: Decimal, face: u64) -> u64 {
    let mut count = (value / Decimal::from(face))
        .ceil()
        .to_u64()
        .unwrap_or_default();
    while count > 0 && Decimal::from((count - 1) * face) >= value {
        count -= 1;
    }
    while Decimal::from(count.saturating_mul(face)) < value {
        count += 1;
    }
    count
}

/// Largest `c` with `c * face <= value`.
fn floor_count(value: Decimal, face: u64) -> u64 {
    let mut count = (value / Decimal::from(face))
        .floor()
        .to_u64()
        .unwrap_or_default();
    while count > 0 && Decimal::from(count * face) > value {
        count -= 1;
    }
    while Decimal::from((count + 1).saturating_mul(face)) <= value {
        count += 1;
    }
    count
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

struct Search<'s> {
    slots: &'s [Slot],
    /// `rest_min[i]` / `rest_max[i]`: value range reachable by slots `i..`.
    rest_min: Vec<u64>,
    rest_max: Vec<u64>,
    /// `rest_gcd[i]`: gcd of the faces of slots `i..`, zero past the end.
    rest_gcd: Vec<u64>,
    /// Least common multiple of every face, for exact fractional bounds.
    scale: u128,
    counts: Vec<u64>,
    best: Option<(u64, Vec<u64>)>,
    steps: u64,
    limit: u64,
}

impl<'s> Search<'s> {
    fn new(slots: &'s [Slot], limit: u64) -> Self {
        let mut rest_min = vec![0u64; slots.len() + 1];
        let mut rest_max = vec![0u64; slots.len() + 1];
        let mut rest_gcd = vec![0u64; slots.len() + 1];
        for (i, slot) in slots.iter().enumerate().rev() {
            rest_min[i] = rest_min[i + 1].saturating_add(slot.min_value());
            rest_max[i] = rest_max[i + 1].saturating_add(slot.max_value());
            rest_gcd[i] = gcd(rest_gcd[i + 1], slot.face);
        }
        let scale = slots
            .iter()
            .fold(1u64, |lcm, slot| lcm / gcd(lcm, slot.face) * slot.face);

        Self {
            slots,
            rest_min,
            rest_max,
            rest_gcd,
            scale: u128::from(scale),
            counts: vec![0u64; slots.len()],
            best: None,
            steps: 0,
            limit,
        }
    }

    fn best_bills(&self) -> Option<u64> {
        self.best.as_ref().map(|(bills, _)| *bills)
    }

    fn record(&mut self, total: u64) {
        if self.best_bills().is_none_or(|best| total < best) {
            self.best = Some((total, self.counts.clone()));
        }
    }

    /// Fewest bills slots `from..` could use for `value`, allowing fractional
    /// bills. `value` must lie in `rest_min[from]..=rest_max[from]`.
    fn fill_bound(&self, from: usize, value: u64) -> u64 {
        let mut extra = value - self.rest_min[from];
        let mut scaled = 0u128;
        for slot in &self.slots[from..] {
            let take = extra.min(slot.max_value() - slot.min_value());
            extra -= take;
            scaled += u128::from(slot.min) * self.scale
                + u128::from(take) * (self.scale / u128::from(slot.face));
        }
        u64::try_from(scaled.div_ceil(self.scale)).unwrap_or(u64::MAX)
    }

    fn descend(&mut self, i: usize, remaining: u64, bills: u64) -> Result<(), AllocationError> {
        self.steps += 1;
        if self.steps > self.limit {
            return Err(AllocationError::SearchLimitExceeded { limit: self.limit });
        }

        match self.slots.len() - i {
            1 => self.settle_last(i, remaining, bills),
            2 => self.settle_pair(i, remaining, bills),
            _ => self.branch(i, remaining, bills)?,
        }
        Ok(())
    }

    fn settle_last(&mut self, i: usize, remaining: u64, bills: u64) {
        let slot = self.slots[i];
        if remaining % slot.face != 0 {
            return;
        }
        let count = remaining / slot.face;
        if count < slot.min || count > slot.max {
            return;
        }
        self.counts[i] = count;
        self.record(bills + count);
    }

    /// Solves the last two slots directly.
    ///
    /// Every extra bill of the bigger face replaces more than one bill of
    /// the smaller, so the largest admissible big count is the cheapest.
    fn settle_pair(&mut self, i: usize, remaining: u64, bills: u64) {
        let (big, small) = (self.slots[i], self.slots[i + 1]);
        let Some(room) = remaining.checked_sub(small.min_value()) else {
            return;
        };

        let hi = big.max.min(room / big.face);
        let lo = big
            .min
            .max(remaining.saturating_sub(small.max_value()).div_ceil(big.face));
        if lo > hi {
            return;
        }

        // Exact big counts repeat every `small.face / gcd` steps, so this
        // scans at most that many candidates.
        let Some(count) = (lo..=hi)
            .rev()
            .find(|count| (remaining - count * big.face) % small.face == 0)
        else {
            return;
        };
        let rest = (remaining - count * big.face) / small.face;

        self.counts[i] = count;
        self.counts[i + 1] = rest;
        self.record(bills + count + rest);
    }

    fn branch(&mut self, i: usize, remaining: u64, bills: u64) -> Result<(), AllocationError> {
        let slot = self.slots[i];
        let rest_min = self.rest_min[i + 1];
        let rest_max = self.rest_max[i + 1];
        if remaining < rest_min {
            return Ok(());
        }

        // Only counts leaving a multiple of the remaining faces' gcd can
        // close; they are `stride` apart.
        let rest_gcd = self.rest_gcd[i + 1];
        let stride = rest_gcd / gcd(slot.face, rest_gcd);
        let top = slot.max.min((remaining - rest_min) / slot.face);
        let Some(mut count) = (slot.min..=top)
            .rev()
            .find(|count| (remaining - count * slot.face) % rest_gcd == 0)
        else {
            return Ok(());
        };

        loop {
            let left = remaining - count * slot.face;
            // Fewer bills here only leaves more value for the rest.
            if left > rest_max {
                break;
            }
            // Each bill dropped here costs more than one smaller bill, so
            // the bound never decreases as `count` drops.
            if let Some(best) = self.best_bills()
                && bills + count + self.fill_bound(i + 1, left) >= best
            {
                break;
            }
            self.counts[i] = count;
            self.descend(i + 1, left, bills + count)?;

            match count.checked_sub(stride) {
                Some(next) if next >= slot.min => count = next,
                _ => break,
            }
        }
        Ok(())
    }
}
