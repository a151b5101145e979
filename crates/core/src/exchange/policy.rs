//! Band policy: the proportional limits each denomination must respect.
//!
//! A policy maps a selected subset to one band per denomination. Each band
//! bounds the value contributed by that denomination to
//! `[lower * amount, upper * amount]`. Single-denomination subsets carry no
//! band; the lone bill must cover the whole amount.
//!
//! The table is plain data. Alternate tables can be loaded from a file and
//! passed to the engine in place of [`BandPolicy::standard`].

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::denomination::{Denomination, DenominationSubset};
use super::error::PolicyError;

/// Default upper bound on search nodes visited per allocation.
pub const DEFAULT_MAX_SEARCH_STEPS: u64 = 1_000_000;

/// Value band for one denomination, as fractions of the requested amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConstraint {
    /// Denomination the band applies to.
    pub denom: Denomination,
    /// Minimum share of the amount this denomination must contribute.
    pub lower: Decimal,
    /// Maximum share of the amount this denomination may contribute.
    pub upper: Decimal,
}

impl BandConstraint {
    /// Creates a band.
    #[must_use]
    pub const fn new(denom: Denomination, lower: Decimal, upper: Decimal) -> Self {
        Self {
            denom,
            lower,
            upper,
        }
    }

    /// Smallest value the denomination may contribute to `amount`.
    #[must_use]
    pub fn min_value(&self, amount: u64) -> Decimal {
        self.lower * Decimal::from(amount)
    }

    /// Largest value the denomination may contribute to `amount`.
    #[must_use]
    pub fn max_value(&self, amount: u64) -> Decimal {
        self.upper * Decimal::from(amount)
    }

    /// Returns true if `value` lies inside the band for `amount`.
    #[must_use]
    pub fn admits(&self, amount: u64, value: u64) -> bool {
        let value = Decimal::from(value);
        self.min_value(amount) <= value && value <= self.max_value(amount)
    }

    fn validate(&self, subset: &DenominationSubset) -> Result<(), PolicyError> {
        let denom = self.denom.value();
        for fraction in [self.lower, self.upper] {
            if fraction < Decimal::ZERO || fraction > Decimal::ONE {
                return Err(PolicyError::FractionOutOfRange { denom, fraction });
            }
        }
        if self.lower > self.upper {
            return Err(PolicyError::InvertedBand {
                denom,
                lower: self.lower,
                upper: self.upper,
            });
        }
        if !subset.contains(self.denom) {
            return Err(PolicyError::DenominationNotInSubset {
                denom,
                subset: subset.to_string(),
            });
        }
        Ok(())
    }
}

/// One row group of the policy table: a subset and its bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// Subset the bands apply to.
    pub subset: DenominationSubset,
    /// Bands, conventionally largest denomination first.
    #[serde(default)]
    pub bands: Vec<BandConstraint>,
}

/// Serialized form of a policy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Upper bound on search nodes per allocation.
    #[serde(default = "default_max_search_steps")]
    pub max_search_steps: u64,
    /// Table rows.
    #[serde(default)]
    pub entries: Vec<PolicyEntry>,
}

fn default_max_search_steps() -> u64 {
    DEFAULT_MAX_SEARCH_STEPS
}

/// Lookup table from denomination subset to band constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyDocument", into = "PolicyDocument")]
pub struct BandPolicy {
    bands: BTreeMap<DenominationSubset, Vec<BandConstraint>>,
    max_search_steps: u64,
}

impl BandPolicy {
    /// The standard cash-office table.
    ///
    /// | Subset    | 10        | 5         | 2         |
    /// |-----------|-----------|-----------|-----------|
    /// | {10}      | all       |           |           |
    /// | {10,5}    | 0.70-0.80 | 0.20-0.30 |           |
    /// | {10,2}    | 0.80-0.90 |           | 0.10-0.20 |
    /// | {5,2}     |           | 0.65-0.75 | 0.25-0.35 |
    /// | {10,5,2}  | 0.60-0.70 | 0.22-0.32 | 0.08-0.18 |
    #[must_use]
    pub fn standard() -> Self {
        use Denomination::{Five, Ten, Two};

        let pct = |lower: i64, upper: i64| (Decimal::new(lower, 2), Decimal::new(upper, 2));
        let band = |denom, (lower, upper)| BandConstraint::new(denom, lower, upper);
        let subset = |denoms: &[Denomination]| DenominationSubset(denoms.iter().copied().collect());

        let mut bands = BTreeMap::new();
        bands.insert(subset(&[Ten]), Vec::new());
        bands.insert(
            subset(&[Ten, Five]),
            vec![band(Ten, pct(70, 80)), band(Five, pct(20, 30))],
        );
        bands.insert(
            subset(&[Ten, Two]),
            vec![band(Ten, pct(80, 90)), band(Two, pct(10, 20))],
        );
        bands.insert(
            subset(&[Five, Two]),
            vec![band(Five, pct(65, 75)), band(Two, pct(25, 35))],
        );
        bands.insert(
            subset(&[Ten, Five, Two]),
            vec![
                band(Ten, pct(60, 70)),
                band(Five, pct(22, 32)),
                band(Two, pct(8, 18)),
            ],
        );

        Self {
            bands,
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
        }
    }

    /// A table with no bands at all: every subset is bounded only by the
    /// exact-sum constraint.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            bands: BTreeMap::new(),
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
        }
    }

    /// Builds and validates a table from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns a `PolicyError` if an entry repeats a subset, a band is out
    /// of range, or `max_search_steps` is zero.
    pub fn from_entries(
        entries: impl IntoIterator<Item = PolicyEntry>,
        max_search_steps: u64,
    ) -> Result<Self, PolicyError> {
        let mut bands = BTreeMap::new();
        for entry in entries {
            let key = entry.subset.to_string();
            if bands.insert(entry.subset, entry.bands).is_some() {
                return Err(PolicyError::DuplicateSubset(key));
            }
        }

        let policy = Self {
            bands,
            max_search_steps,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Replaces the search step limit.
    #[must_use]
    pub fn with_max_search_steps(mut self, max_search_steps: u64) -> Self {
        self.max_search_steps = max_search_steps;
        self
    }

    /// Checks every band against its subset.
    ///
    /// # Errors
    ///
    /// Returns the first `PolicyError` found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_search_steps == 0 {
            return Err(PolicyError::ZeroSearchSteps);
        }

        for (subset, bands) in &self.bands {
            let mut seen = BTreeSet::new();
            for band in bands {
                band.validate(subset)?;
                if !seen.insert(band.denom) {
                    return Err(PolicyError::DuplicateBand {
                        denom: band.denom.value(),
                        subset: subset.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Bands defined for `subset`, or an empty slice if the table has none.
    #[must_use]
    pub fn bands_for(&self, subset: &DenominationSubset) -> &[BandConstraint] {
        self.bands.get(subset).map(Vec::as_slice).unwrap_or_default()
    }

    /// Band for one denomination within `subset`, if any.
    #[must_use]
    pub fn band_for(
        &self,
        subset: &DenominationSubset,
        denom: Denomination,
    ) -> Option<&BandConstraint> {
        self.bands_for(subset).iter().find(|band| band.denom == denom)
    }

    /// Upper bound on search nodes per allocation.
    #[must_use]
    pub const fn max_search_steps(&self) -> u64 {
        self.max_search_steps
    }
}

impl Default for BandPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<PolicyDocument> for BandPolicy {
    type Error = PolicyError;

    fn try_from(doc: PolicyDocument) -> Result<Self, Self::Error> {
        Self::from_entries(doc.entries, doc.max_search_steps)
    }
}

impl From<BandPolicy> for PolicyDocument {
    fn from(policy: BandPolicy) -> Self {
        Self {
            max_search_steps: policy.max_search_steps,
            entries: policy
                .bands
                .into_iter()
                .map(|(subset, bands)| PolicyEntry { subset, bands })
                .collect(),
        }
    }
}
