//! Cost-and-usage queries

use std::cmp::Ordering;
use std::collections::HashMap;

use aws_sdk_costexplorer::types::{Granularity, GroupDefinition, GroupDefinitionType};

use costrecon_core::models::{MonthlyCostReport, ServiceCost};
use costrecon_core::{BillingPeriod, SourceResult};

use crate::{date_interval, map_api_error, CostExplorerSource};

impl CostExplorerSource {
    /// Cost grouped by service for one billing period.
    ///
    /// Queried at daily granularity and summed per service; amounts that do
    /// not parse are skipped, not fatal.
    pub(crate) async fn fetch_cost_and_usage(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<MonthlyCostReport> {
        let response = self
            .ce
            .get_cost_and_usage()
            .time_period(date_interval(period)?)
            .granularity(Granularity::Daily)
            .metrics(self.cost_metric.clone())
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key("SERVICE")
                    .build(),
            )
            .send()
            .await
            .map_err(|err| map_api_error(&err, "cost and usage"))?;

        let mut totals: HashMap<String, f64> = HashMap::new();
        for result in response.results_by_time() {
            for group in result.groups() {
                let Some(service) = group.keys().first() else {
                    continue;
                };
                let Some(metrics) = group.metrics() else {
                    continue;
                };
                let Some(amount) = metrics
                    .get(&self.cost_metric)
                    .and_then(|metric| metric.amount())
                    .and_then(|amount| amount.parse::<f64>().ok())
                else {
                    continue;
                };
                *totals.entry(service.clone()).or_insert(0.0) += amount;
            }
        }

        let mut services: Vec<ServiceCost> = totals
            .into_iter()
            .map(|(service, amount)| ServiceCost { service, amount })
            .collect();
        // Deterministic order: amount descending, service name breaks ties.
        services.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.service.cmp(&b.service))
        });

        Ok(MonthlyCostReport { period, services })
    }
}
