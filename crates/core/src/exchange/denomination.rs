//! Denomination catalog and selected-subset handling.
//!
//! The catalog is fixed data: the bill face values a location can hand out.
//! Callers select a subset of it per location; the subset is the lookup key
//! into the band policy, so it is kept in a canonical (sorted) form.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::AllocationError;

/// A bill face value from the catalog.
///
/// Variants are declared in ascending face value so the derived ordering
/// matches the numeric ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Denomination {
    /// 2-unit bill.
    Two,
    /// 5-unit bill.
    Five,
    /// 10-unit bill.
    Ten,
}

impl Denomination {
    /// Every catalog denomination, largest first.
    pub const CATALOG: [Self; 3] = [Self::Ten, Self::Five, Self::Two];

    /// Face value of the bill.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Five => 5,
            Self::Ten => 10,
        }
    }

    /// Looks up the catalog entry for a raw face value.
    #[must_use]
    pub const fn from_value(value: u32) -> Option<Self> {
        match value {
            2 => Some(Self::Two),
            5 => Some(Self::Five),
            10 => Some(Self::Ten),
            _ => None,
        }
    }

    /// Returns true if `value` is a face value in the catalog.
    #[must_use]
    pub const fn is_valid(value: u32) -> bool {
        Self::from_value(value).is_some()
    }
}

impl TryFrom<u32> for Denomination {
    type Error = AllocationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(AllocationError::UnknownDenomination(value))
    }
}

impl From<Denomination> for u32 {
    fn from(denom: Denomination) -> Self {
        denom.value()
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A non-empty set of catalog denominations.
///
/// Equality, hashing and ordering ignore the order in which the caller
/// listed the values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct DenominationSubset(pub(super) BTreeSet<Denomination>);

impl DenominationSubset {
    /// Validates raw face values into a canonical subset.
    ///
    /// Repeated values collapse into one.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::EmptyDenominationSet` if `raw` is empty.
    /// Returns `AllocationError::UnknownDenomination` for the first value
    /// outside the catalog.
    pub fn normalize(raw: &[u32]) -> Result<Self, AllocationError> {
        if raw.is_empty() {
            return Err(AllocationError::EmptyDenominationSet);
        }

        raw.iter()
            .map(|&value| Denomination::try_from(value))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// The whole catalog as one subset.
    #[must_use]
    pub fn full() -> Self {
        Self(Denomination::CATALOG.into_iter().collect())
    }

    /// Number of selected denominations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is selected.
    ///
    /// Only reachable through deserialization bugs; constructors reject it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `denom` is selected.
    #[must_use]
    pub fn contains(&self, denom: Denomination) -> bool {
        self.0.contains(&denom)
    }

    /// Selected denominations, largest face value first.
    pub fn descending(&self) -> impl Iterator<Item = Denomination> + '_ {
        self.0.iter().rev().copied()
    }

    /// Raw face values, largest first.
    #[must_use]
    pub fn values(&self) -> Vec<u32> {
        self.descending().map(Denomination::value).collect()
    }
}

impl TryFrom<Vec<u32>> for DenominationSubset {
    type Error = AllocationError;

    fn try_from(raw: Vec<u32>) -> Result<Self, Self::Error> {
        Self::normalize(&raw)
    }
}

impl From<DenominationSubset> for Vec<u32> {
    fn from(subset: DenominationSubset) -> Self {
        subset.values()
    }
}

impl fmt::Display for DenominationSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, denom) in self.descending().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{denom}")?;
        }
        f.write_str("}")
    }
}
