//! Cash exchange: breaking location amounts into bills and summarizing them.

pub mod aggregate;
pub mod denomination;
pub mod engine;
pub mod error;
pub mod policy;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;


pub use aggregate::aggregate;
pub use denomination::{Denomination, DenominationSubset};
pub use engine::{AllocationEngine, allocate, validate_amount};
pub use error::{AllocationError, PolicyError};
pub use policy::{
    BandConstraint, BandPolicy, DEFAULT_MAX_SEARCH_STEPS, PolicyDocument, PolicyEntry,
};
pub use service::ExchangeService;
pub use types::{
    AllocationRequest, AllocationResult, ExchangeReport, ExchangeSummary, LocationReport,
    LocationRequest,
};
