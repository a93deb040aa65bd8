//! Savings queries: Savings Plans utilization and credits

use aws_sdk_costexplorer::error::ProvideErrorMetadata;
use aws_sdk_costexplorer::types::{
    Dimension, DimensionValues, Expression, GroupDefinition, GroupDefinitionType,
};

use costrecon_core::models::{CreditItem, CreditSavings, SavingsPlanUtilization};
use costrecon_core::{BillingPeriod, SourceResult};

use crate::{date_interval, map_api_error, parse_f64, CostExplorerSource};

impl CostExplorerSource {
    /// Savings Plans net savings and utilization for one period.
    ///
    /// DataUnavailableException means the account has no Savings Plans data
    /// for the period; that is absence, not an error.
    pub(crate) async fn fetch_savings_plan_utilization(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<SavingsPlanUtilization>> {
        let response = match self
            .ce
            .get_savings_plans_utilization()
            .time_period(date_interval(period)?)
            .granularity(self.sdk_granularity())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                if err.code() == Some("DataUnavailableException") {
                    return Ok(None);
                }
                return Err(map_api_error(&err, "savings plan utilization"));
            }
        };

        let by_time = response.savings_plans_utilizations_by_time();
        if by_time.is_empty() {
            return Ok(None);
        }

        let mut net_savings = 0.0;
        let mut total_utilization = 0.0;
        for entry in by_time {
            net_savings += parse_f64(entry.savings().and_then(|s| s.net_savings()));
            total_utilization += parse_f64(
                entry
                    .utilization()
                    .and_then(|u| u.utilization_percentage()),
            );
        }

        Ok(Some(SavingsPlanUtilization {
            net_savings,
            utilization_percentage: total_utilization / by_time.len() as f64,
        }))
    }

    /// Credits applied over one period, grouped by service and usage type.
    ///
    /// Credits are negative costs on the bill; amounts are surfaced as
    /// absolute values.
    pub(crate) async fn fetch_credit_savings(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<CreditSavings> {
        let credit_filter = Expression::builder()
            .dimensions(
                DimensionValues::builder()
                    .key(Dimension::RecordType)
                    .values("Credit")
                    .build(),
            )
            .build();

        let response = match self
            .ce
            .get_cost_and_usage()
            .time_period(date_interval(period)?)
            .granularity(self.sdk_granularity())
            .metrics("UnblendedCost")
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key("SERVICE")
                    .build(),
            )
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key("USAGE_TYPE")
                    .build(),
            )
            .filter(credit_filter)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                if err.code() == Some("DataUnavailableException") {
                    return Ok(CreditSavings::empty());
                }
                return Err(map_api_error(&err, "credit savings"));
            }
        };

        let mut total = 0.0;
        let mut items = Vec::new();
        for result in response.results_by_time() {
            for group in result.groups() {
                let keys = group.keys();
                let service = keys.first().map(String::as_str).unwrap_or("Unknown");
                let usage_type = keys.get(1).map(String::as_str).unwrap_or("Unknown");

                let amount = group
                    .metrics()
                    .and_then(|metrics| metrics.get("UnblendedCost"))
                    .and_then(|metric| metric.amount())
                    .and_then(|amount| amount.parse::<f64>().ok())
                    .unwrap_or(0.0)
                    .abs();

                if amount > 0.0 {
                    total += amount;
                    items.push(CreditItem {
                        service: service.to_string(),
                        usage_type: usage_type.to_string(),
                        amount,
                    });
                }
            }
        }

        Ok(CreditSavings { total, items })
    }
}
