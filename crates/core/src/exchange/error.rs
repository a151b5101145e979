//! Exchange error types.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use till_shared::AppError;

/// Errors returned by the allocation engine for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AllocationError {
    /// Amount is zero, negative, or has a fractional part.
    #[error("Amount must be a positive whole number, got {0}")]
    InvalidAmount(Decimal),

    /// No denomination was selected.
    #[error("At least one denomination must be selected")]
    EmptyDenominationSet,

    /// A selected value is not a bill in the catalog.
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(u32),

    /// No bill combination satisfies the equality and band constraints.
    #[error("No combination of the selected bills adds up to {amount} within the policy bands")]
    Infeasible {
        /// Requested amount.
        amount: u64,
    },

    /// The search visited more nodes than the policy allows.
    #[error("Allocation search exceeded {limit} steps")]
    SearchLimitExceeded {
        /// Configured step limit.
        limit: u64,
    },
}

/// Errors raised while building or validating a band policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A band fraction lies outside `[0, 1]`.
    #[error("Band for {denom} uses fraction {fraction} outside [0, 1]")]
    FractionOutOfRange {
        /// Denomination the band applies to.
        denom: u32,
        /// Offending fraction.
        fraction: Decimal,
    },

    /// Lower fraction exceeds upper fraction.
    #[error("Band for {denom} has lower fraction {lower} above upper fraction {upper}")]
    InvertedBand {
        /// Denomination the band applies to.
        denom: u32,
        /// Lower fraction.
        lower: Decimal,
        /// Upper fraction.
        upper: Decimal,
    },

    /// A band names a denomination outside its subset.
    #[error("Band for {denom} does not belong to subset {subset}")]
    DenominationNotInSubset {
        /// Denomination the band applies to.
        denom: u32,
        /// Subset the band was listed under.
        subset: String,
    },

    /// Two bands in one subset name the same denomination.
    #[error("Subset {subset} has more than one band for {denom}")]
    DuplicateBand {
        /// Repeated denomination.
        denom: u32,
        /// Subset the bands were listed under.
        subset: String,
    },

    /// The same subset appears in two entries.
    #[error("Subset {0} is listed more than once")]
    DuplicateSubset(String),

    /// Step limit must allow at least one search step.
    #[error("Maximum search steps must be positive")]
    ZeroSearchSteps,
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidAmount(_)
            | AllocationError::EmptyDenominationSet
            | AllocationError::UnknownDenomination(_) => Self::Validation(err.to_string()),
            AllocationError::Infeasible { .. } => Self::BusinessRule(err.to_string()),
            AllocationError::SearchLimitExceeded { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        Self::Config(err.to_string())
    }
}
