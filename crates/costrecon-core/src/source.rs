//! Remote cost/usage data-source interface
//!
//! A single narrow interface over the billing APIs, injected into the
//! aggregation layer as a trait object. The AWS-backed implementation lives
//! in the `costrecon-aws` crate; tests substitute an in-memory double.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{
    Budget, BudgetPerformance, CoverageSample, CreditSavings, MonthlyCostReport,
    ReservationCoverage, ReservationUtilization, SavingsPlanUtilization,
};
use crate::period::BillingPeriod;

pub type SourceResult<T> = Result<T, SourceError>;

/// Reserved-instance product families the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedService {
    Rds,
    OpenSearch,
}

impl ReservedService {
    /// SERVICE dimension value used when filtering billing API calls.
    pub fn dimension_value(&self) -> &'static str {
        match self {
            ReservedService::Rds => "Amazon Relational Database Service",
            ReservedService::OpenSearch => "Amazon OpenSearch Service",
        }
    }

    /// Human-facing name used in report sections and error scopes.
    pub fn display_name(&self) -> &'static str {
        match self {
            ReservedService::Rds => "RDS Reserved Instances",
            ReservedService::OpenSearch => "OpenSearch Reserved Instances",
        }
    }
}

/// Remote cost/usage data source, one method per billing API concern.
///
/// `Ok(None)` from the coverage/utilization/performance methods means the
/// call succeeded with zero result rows (data absence, not an error).
#[async_trait]
pub trait CostDataSource: Send + Sync {
    /// Cost grouped by service for one billing period.
    async fn cost_and_usage(&self, period: BillingPeriod) -> SourceResult<MonthlyCostReport>;

    /// Savings Plans coverage/utilization snapshot for one period.
    async fn savings_plan_coverage(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<CoverageSample>>;

    /// Reservation coverage for one period, filtered to one service family.
    async fn reservation_coverage(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationCoverage>>;

    /// Reservation utilization for one period, filtered to one service family.
    async fn reservation_utilization(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationUtilization>>;

    /// Savings Plans utilization (net savings) for one period.
    async fn savings_plan_utilization(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<SavingsPlanUtilization>>;

    /// Credits applied over one period.
    async fn credit_savings(&self, period: BillingPeriod) -> SourceResult<CreditSavings>;

    /// All budget definitions for the account.
    async fn list_budgets(&self) -> SourceResult<Vec<Budget>>;

    /// Latest performance sample for one budget over a period.
    async fn budget_performance(
        &self,
        budget_name: &str,
        period: BillingPeriod,
    ) -> SourceResult<Option<BudgetPerformance>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_service_dimension_values() {
        assert_eq!(
            ReservedService::Rds.dimension_value(),
            "Amazon Relational Database Service"
        );
        assert_eq!(
            ReservedService::OpenSearch.dimension_value(),
            "Amazon OpenSearch Service"
        );
    }

    #[test]
    fn test_reserved_service_display_names() {
        assert_eq!(ReservedService::Rds.display_name(), "RDS Reserved Instances");
        assert_eq!(
            ReservedService::OpenSearch.display_name(),
            "OpenSearch Reserved Instances"
        );
    }
}
