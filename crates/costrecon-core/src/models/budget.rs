//! Budget definition and performance records

use serde::Serialize;

/// A budget definition owned by the billing account. Fetched fresh per
/// invocation, never mutated by this system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub name: String,
    pub limit_amount: f64,
    pub currency: String,
    pub time_unit: String,
    pub budget_type: String,
}

/// Latest performance sample for one budget over a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetPerformance {
    pub actual_amount: f64,
    pub forecasted_amount: f64,
}
