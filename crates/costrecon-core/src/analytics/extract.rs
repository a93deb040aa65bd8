//! Metric extractors
//!
//! Pure functions that pull a single scalar out of a raw monthly record.

use crate::models::{CoverageSample, MonthlyCostReport};

/// Total cost across every (service, cost) pair in the report.
pub fn total_cost(report: &MonthlyCostReport) -> f64 {
    report.services.iter().map(|s| s.amount).sum()
}

/// Coverage percentage if the period has data. `None` is distinct from `0.0`.
pub fn coverage(sample: Option<&CoverageSample>) -> Option<f64> {
    sample.map(|s| s.coverage_percentage)
}
