//! Budget definition and performance-history queries

use aws_sdk_budgets::primitives::DateTime;
use aws_sdk_budgets::types::TimePeriod;
use chrono::NaiveTime;

use costrecon_core::models::{Budget, BudgetPerformance};
use costrecon_core::{BillingPeriod, SourceResult};

use crate::{map_api_error, parse_f64, CostExplorerSource};

fn epoch(date: chrono::NaiveDate) -> DateTime {
    DateTime::from_secs(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

impl CostExplorerSource {
    /// All budget definitions for the account.
    pub(crate) async fn fetch_budgets(&self) -> SourceResult<Vec<Budget>> {
        let response = self
            .budgets
            .describe_budgets()
            .account_id(&self.account_id)
            .send()
            .await
            .map_err(|err| map_api_error(&err, "budget listing"))?;

        let budgets = response
            .budgets()
            .iter()
            .map(|budget| {
                let (limit_amount, currency) = match budget.budget_limit() {
                    Some(spend) => (
                        parse_f64(Some(spend.amount())),
                        spend.unit().to_string(),
                    ),
                    None => (0.0, "USD".to_string()),
                };
                Budget {
                    name: budget.budget_name().to_string(),
                    limit_amount,
                    currency,
                    time_unit: budget.time_unit().as_str().to_string(),
                    budget_type: budget.budget_type().as_str().to_string(),
                }
            })
            .collect();

        Ok(budgets)
    }

    /// Latest performance sample (actual and forecasted amounts) for one
    /// budget over `period`. `None` when the history has no entries for the
    /// period.
    pub(crate) async fn fetch_budget_performance(
        &self,
        budget_name: &str,
        period: BillingPeriod,
    ) -> SourceResult<Option<BudgetPerformance>> {
        let response = self
            .budgets
            .describe_budget_performance_history()
            .account_id(&self.account_id)
            .budget_name(budget_name)
            .time_period(
                TimePeriod::builder()
                    .start(epoch(period.start))
                    .end(epoch(period.end))
                    .build(),
            )
            .send()
            .await
            .map_err(|err| map_api_error(&err, "budget performance history"))?;

        let Some(history) = response.budget_performance_history() else {
            return Ok(None);
        };

        // The most recent period is the last list entry.
        let Some(latest) = history.budgeted_and_actual_amounts_list().last() else {
            return Ok(None);
        };

        Ok(Some(BudgetPerformance {
            actual_amount: parse_f64(latest.actual_amount().map(|spend| spend.amount())),
            forecasted_amount: parse_f64(latest.budgeted_amount().map(|spend| spend.amount())),
        }))
    }
}
