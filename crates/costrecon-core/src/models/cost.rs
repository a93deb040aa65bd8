//! Per-month cost breakdown records

use serde::Serialize;

use crate::period::BillingPeriod;

/// Cost attributed to one service over a billing period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCost {
    pub service: String,
    pub amount: f64,
}

/// One billing period's raw cost breakdown, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCostReport {
    pub period: BillingPeriod,
    /// Per-service costs, sorted by amount descending (service name breaks ties).
    pub services: Vec<ServiceCost>,
}

impl MonthlyCostReport {
    /// Empty report substituted when a trailing month's fetch fails.
    pub fn empty(period: BillingPeriod) -> Self {
        Self {
            period,
            services: Vec::new(),
        }
    }

    /// The `n` most expensive services. Renderers use this for top-N tables;
    /// the aggregation layer itself only ever sums.
    pub fn top_services(&self, n: usize) -> &[ServiceCost] {
        &self.services[..n.min(self.services.len())]
    }
}
