//! costrecon-aws - AWS-backed data source for costrecon
//!
//! Implements the core `CostDataSource` trait against Cost Explorer and
//! Budgets. One module per API concern (cost, coverage, savings, budgets),
//! composed into a single client struct.

mod budgets;
mod cost;
mod coverage;
mod error;
mod savings;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::types::DateInterval;

use costrecon_core::models::{
    Budget, BudgetPerformance, CoverageSample, CreditSavings, MonthlyCostReport,
    ReservationCoverage, ReservationUtilization, SavingsPlanUtilization,
};
use costrecon_core::{
    BillingPeriod, CostDataSource, Granularity, ReportConfig, ReservedService, SourceError,
    SourceResult,
};

pub(crate) use error::map_api_error;

/// Data source backed by the AWS Cost Explorer, Budgets, and STS APIs.
pub struct CostExplorerSource {
    ce: aws_sdk_costexplorer::Client,
    budgets: aws_sdk_budgets::Client,
    account_id: String,
    granularity: Granularity,
    cost_metric: String,
}

impl CostExplorerSource {
    /// Build the AWS clients and resolve the account id.
    ///
    /// Credential problems surface here, before any report work starts.
    pub async fn connect(config: &ReportConfig) -> Result<Self, SourceError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        // The Budgets API needs the account id; resolving it also validates
        // the credentials up front.
        let sts = aws_sdk_sts::Client::new(&sdk_config);
        let identity = sts.get_caller_identity().send().await.map_err(|err| {
            SourceError::credentials(format!(
                "unable to resolve caller identity: {}",
                map_api_error(&err, "get-caller-identity")
            ))
        })?;
        let account_id = identity
            .account()
            .map(str::to_string)
            .ok_or_else(|| SourceError::credentials("caller identity returned no account id"))?;

        tracing::debug!(account_id = %account_id, region = %config.region, "AWS clients initialized");

        Ok(Self {
            ce: aws_sdk_costexplorer::Client::new(&sdk_config),
            budgets: aws_sdk_budgets::Client::new(&sdk_config),
            account_id,
            granularity: config.granularity,
            cost_metric: config.cost_metric.clone(),
        })
    }

    pub(crate) fn sdk_granularity(&self) -> aws_sdk_costexplorer::types::Granularity {
        match self.granularity {
            Granularity::Daily => aws_sdk_costexplorer::types::Granularity::Daily,
            Granularity::Monthly => aws_sdk_costexplorer::types::Granularity::Monthly,
        }
    }
}

/// Numeric fields arrive as strings; unparsable values degrade to 0.0.
pub(crate) fn parse_f64(value: Option<&str>) -> f64 {
    value.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0)
}

/// Billing periods are sent as YYYY-MM-DD strings, end exclusive.
pub(crate) fn date_interval(period: BillingPeriod) -> Result<DateInterval, SourceError> {
    DateInterval::builder()
        .start(period.start.format("%Y-%m-%d").to_string())
        .end(period.end.format("%Y-%m-%d").to_string())
        .build()
        .map_err(|err| {
            SourceError::invalid_parameter(format!("date interval {}: {}", period, err))
        })
}

#[async_trait]
impl CostDataSource for CostExplorerSource {
    async fn cost_and_usage(&self, period: BillingPeriod) -> SourceResult<MonthlyCostReport> {
        self.fetch_cost_and_usage(period).await
    }

    async fn savings_plan_coverage(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<CoverageSample>> {
        self.fetch_savings_plan_coverage(period).await
    }

    async fn reservation_coverage(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationCoverage>> {
        self.fetch_reservation_coverage(period, service).await
    }

    async fn reservation_utilization(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationUtilization>> {
        self.fetch_reservation_utilization(period, service).await
    }

    async fn savings_plan_utilization(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<SavingsPlanUtilization>> {
        self.fetch_savings_plan_utilization(period).await
    }

    async fn credit_savings(&self, period: BillingPeriod) -> SourceResult<CreditSavings> {
        self.fetch_credit_savings(period).await
    }

    async fn list_budgets(&self) -> SourceResult<Vec<Budget>> {
        self.fetch_budgets().await
    }

    async fn budget_performance(
        &self,
        budget_name: &str,
        period: BillingPeriod,
    ) -> SourceResult<Option<BudgetPerformance>> {
        self.fetch_budget_performance(budget_name, period).await
    }
}
