//! Coverage and utilization snapshot records
//!
//! Absence of data for a period is always `Option::None` at the call site,
//! never a zeroed sample, so the trend analyzer can tell "0% coverage" apart
//! from "no data".

use serde::Serialize;

/// One billing period's coverage/utilization snapshot for a reservation-like
/// product (Savings Plans or a Reserved Instance family).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSample {
    pub coverage_percentage: f64,
    pub utilization_percentage: f64,
}

/// Reservation coverage percentages for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReservationCoverage {
    pub hours_coverage_percentage: f64,
    /// The billing API exposes no cost-coverage percentage (on-demand cost
    /// only), so this stays 0.0 for AWS-backed sources.
    pub cost_coverage_percentage: f64,
}

/// Reservation utilization for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReservationUtilization {
    pub utilization_percentage: f64,
    pub net_savings: f64,
}

/// Savings Plans utilization for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsPlanUtilization {
    pub net_savings: f64,
    pub utilization_percentage: f64,
}
