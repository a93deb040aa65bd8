//! Report configuration
//!
//! An explicit configuration structure passed into client construction and
//! report generation; there is no module-level mutable state. Defaults match
//! the documented query defaults of the billing API integration.

/// Time granularity for billing API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    /// Wire value expected by the billing API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
            Granularity::Monthly => "MONTHLY",
        }
    }
}

/// Configuration for one report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// AWS region for the billing API clients.
    pub region: String,
    /// Named credential profile; the default chain is used when absent.
    pub profile: Option<String>,
    /// Granularity for coverage/savings queries.
    pub granularity: Granularity,
    /// Percentage above a budget limit at which an anomaly fires.
    pub budget_threshold_pct: f64,
    /// Cost metric requested from the cost-and-usage API.
    pub cost_metric: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            region: "eu-west-1".to_string(),
            profile: None,
            granularity: Granularity::Monthly,
            budget_threshold_pct: 10.0,
            cost_metric: "BlendedCost".to_string(),
        }
    }
}
