//! Savings aggregation
//!
//! Combines per-category savings into one breakdown with partial-failure
//! semantics: a failing category contributes 0.0 and a scoped error string,
//! and never aborts the other categories.

use serde::Serialize;

use crate::period::BillingPeriod;
use crate::source::{CostDataSource, ReservedService};

/// Display names for the four savings categories.
pub const SAVINGS_PLANS: &str = "Savings Plans";
pub const RDS_RESERVATIONS: &str = "RDS Reservations";
pub const OPENSEARCH_RESERVATIONS: &str = "OpenSearch Reservations";
pub const CREDIT_SAVINGS: &str = "Credit Savings";

/// Savings per category plus their exact sum. Amounts are unrounded;
/// rounding happens at the presentation boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SavingsBreakdown {
    pub savings_plans: f64,
    pub rds_reservations: f64,
    pub opensearch_reservations: f64,
    pub credit_savings: f64,
    pub total_savings: f64,
    pub errors: Vec<String>,
}

impl SavingsBreakdown {
    /// Categories in display order: (name, amount).
    pub fn categories(&self) -> [(&'static str, f64); 4] {
        [
            (SAVINGS_PLANS, self.savings_plans),
            (RDS_RESERVATIONS, self.rds_reservations),
            (OPENSEARCH_RESERVATIONS, self.opensearch_reservations),
            (CREDIT_SAVINGS, self.credit_savings),
        ]
    }
}

/// Display-inclusion policy: Savings Plans and Credit Savings are always
/// shown even at 0.0; other categories only when they saved something.
pub fn should_display_savings_item(source_name: &str, amount: f64) -> bool {
    if source_name == SAVINGS_PLANS || source_name == CREDIT_SAVINGS {
        return true;
    }
    amount > 0.0
}

/// Share of `total` that `amount` represents, 0.0 when there is no total.
pub fn savings_percentage(amount: f64, total: f64) -> f64 {
    if total > 0.0 {
        amount / total * 100.0
    } else {
        0.0
    }
}

/// Collect all four savings categories for `period`.
///
/// Each category is fetched independently; failures and empty results are
/// recorded as scoped messages while the total keeps summing whatever the
/// other categories returned.
pub async fn collect_savings(
    source: &dyn CostDataSource,
    period: BillingPeriod,
) -> SavingsBreakdown {
    let mut breakdown = SavingsBreakdown::default();

    match source.savings_plan_utilization(period).await {
        Ok(Some(utilization)) => breakdown.savings_plans = utilization.net_savings,
        Ok(None) => breakdown.errors.push(format!(
            "{}: no Savings Plans data available for this period",
            SAVINGS_PLANS
        )),
        Err(err) => {
            tracing::warn!(error = %err, "savings plan utilization fetch failed");
            breakdown.errors.push(format!("{}: {}", SAVINGS_PLANS, err));
        }
    }

    match source
        .reservation_utilization(period, ReservedService::Rds)
        .await
    {
        Ok(Some(utilization)) => breakdown.rds_reservations = utilization.net_savings,
        Ok(None) => breakdown
            .errors
            .push(format!("{}: no RDS Reserved Instances found", RDS_RESERVATIONS)),
        Err(err) => {
            tracing::warn!(error = %err, "RDS reservation utilization fetch failed");
            breakdown
                .errors
                .push(format!("{}: {}", RDS_RESERVATIONS, err));
        }
    }

    match source
        .reservation_utilization(period, ReservedService::OpenSearch)
        .await
    {
        Ok(Some(utilization)) => breakdown.opensearch_reservations = utilization.net_savings,
        Ok(None) => breakdown.errors.push(format!(
            "{}: no OpenSearch Reserved Instances found",
            OPENSEARCH_RESERVATIONS
        )),
        Err(err) => {
            tracing::warn!(error = %err, "OpenSearch reservation utilization fetch failed");
            breakdown
                .errors
                .push(format!("{}: {}", OPENSEARCH_RESERVATIONS, err));
        }
    }

    match source.credit_savings(period).await {
        Ok(credits) => breakdown.credit_savings = credits.total,
        Err(err) => {
            tracing::warn!(error = %err, "credit savings fetch failed");
            breakdown.errors.push(format!("{}: {}", CREDIT_SAVINGS, err));
        }
    }

    breakdown.total_savings = breakdown.savings_plans
        + breakdown.rds_reservations
        + breakdown.opensearch_reservations
        + breakdown.credit_savings;

    breakdown
}
