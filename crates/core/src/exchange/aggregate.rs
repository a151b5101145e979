//! Folding per-location outcomes into one summary.

use std::collections::BTreeMap;

use super::denomination::Denomination;
use super::types::{ExchangeSummary, LocationReport};

/// Sums successful locations and collects failed ones.
///
/// A failed location never affects the totals of the others. The result is
/// the same for every ordering of `reports`.
pub fn aggregate<'a>(reports: impl IntoIterator<Item = &'a LocationReport>) -> ExchangeSummary {
    reports
        .into_iter()
        .fold(ExchangeSummary::empty(), |mut summary, report| {
            summary.record(report);
            summary
        })
        .sorted()
}

impl ExchangeSummary {
    /// Summary of zero locations: every catalog denomination at zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            per_denom_totals: Denomination::CATALOG
                .into_iter()
                .map(|denom| (denom, 0))
                .collect::<BTreeMap<_, _>>(),
            total_value_exchanged: 0,
            failed_locations: Vec::new(),
        }
    }

    /// Summary of a single location.
    #[must_use]
    pub fn from_report(report: &LocationReport) -> Self {
        let mut summary = Self::empty();
        summary.record(report);
        summary
    }

    /// Combines two partial summaries.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (denom, count) in other.per_denom_totals {
            *self.per_denom_totals.entry(denom).or_insert(0) += count;
        }
        self.total_value_exchanged += other.total_value_exchanged;
        self.failed_locations.extend(other.failed_locations);
        self.sorted()
    }

    /// Bills of `denom` across all successful locations.
    #[must_use]
    pub fn total_for(&self, denom: Denomination) -> u64 {
        self.per_denom_totals.get(&denom).copied().unwrap_or(0)
    }

    /// Total number of bills across all successful locations.
    #[must_use]
    pub fn total_bills(&self) -> u64 {
        self.per_denom_totals.values().sum()
    }

    fn record(&mut self, report: &LocationReport) {
        match &report.outcome {
            Ok(result) => {
                for (&denom, &count) in &result.counts {
                    *self.per_denom_totals.entry(denom).or_insert(0) += count;
                }
                self.total_value_exchanged += result.total_value;
            }
            Err(err) => self
                .failed_locations
                .push((report.location_id.clone(), err.clone())),
        }
    }

    fn sorted(mut self) -> Self {
        self.failed_locations.sort_by(|(a_id, a_err), (b_id, b_err)| {
            a_id.cmp(b_id)
                .then_with(|| a_err.to_string().cmp(&b_err.to_string()))
        });
        self
    }
}

impl Default for ExchangeSummary {
    fn default() -> Self {
        Self::empty()
    }
}
