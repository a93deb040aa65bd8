//! In-memory data-source double for tests
//!
//! Keyed by billing-period start date. Empty maps mean "no data", the
//! `fail_*` fields force categorized errors for specific calls.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::SourceError;
use crate::models::{
    Budget, BudgetPerformance, CoverageSample, CreditSavings, MonthlyCostReport,
    ReservationCoverage, ReservationUtilization, SavingsPlanUtilization, ServiceCost,
};
use crate::period::BillingPeriod;
use crate::source::{CostDataSource, ReservedService, SourceResult};

#[derive(Default)]
pub(crate) struct StaticSource {
    pub costs: HashMap<NaiveDate, MonthlyCostReport>,
    pub fail_costs: HashSet<NaiveDate>,
    pub sp_coverage: HashMap<NaiveDate, CoverageSample>,
    pub fail_sp_coverage: HashSet<NaiveDate>,
    pub rds_coverage: HashMap<NaiveDate, ReservationCoverage>,
    pub fail_rds_coverage: HashSet<NaiveDate>,
    pub rds_utilization: HashMap<NaiveDate, ReservationUtilization>,
    pub os_utilization: HashMap<NaiveDate, ReservationUtilization>,
    pub fail_rds_utilization: bool,
    pub fail_os_utilization: bool,
    pub sp_utilization: HashMap<NaiveDate, SavingsPlanUtilization>,
    pub fail_sp_utilization: bool,
    pub credits: HashMap<NaiveDate, CreditSavings>,
    pub fail_credits: bool,
    pub budgets: Vec<Budget>,
    pub fail_list_budgets: bool,
    pub performances: HashMap<String, BudgetPerformance>,
    pub fail_performance: HashSet<String>,
}

pub(crate) fn day(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

pub(crate) fn month_report(start: NaiveDate, services: &[(&str, f64)]) -> MonthlyCostReport {
    MonthlyCostReport {
        period: BillingPeriod {
            start,
            end: start + chrono::Months::new(1),
        },
        services: services
            .iter()
            .map(|(service, amount)| ServiceCost {
                service: service.to_string(),
                amount: *amount,
            })
            .collect(),
    }
}

fn fail(what: &str, key: impl std::fmt::Display) -> SourceError {
    SourceError::api("TestFailure", format!("{} failed for {}", what, key))
}

#[async_trait]
impl CostDataSource for StaticSource {
    async fn cost_and_usage(&self, period: BillingPeriod) -> SourceResult<MonthlyCostReport> {
        if self.fail_costs.contains(&period.start) {
            return Err(fail("cost and usage", period.start));
        }
        Ok(self
            .costs
            .get(&period.start)
            .cloned()
            .unwrap_or_else(|| MonthlyCostReport::empty(period)))
    }

    async fn savings_plan_coverage(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<CoverageSample>> {
        if self.fail_sp_coverage.contains(&period.start) {
            return Err(fail("savings plan coverage", period.start));
        }
        Ok(self.sp_coverage.get(&period.start).copied())
    }

    async fn reservation_coverage(
        &self,
        period: BillingPeriod,
        _service: ReservedService,
    ) -> SourceResult<Option<ReservationCoverage>> {
        if self.fail_rds_coverage.contains(&period.start) {
            return Err(fail("reservation coverage", period.start));
        }
        Ok(self.rds_coverage.get(&period.start).copied())
    }

    async fn reservation_utilization(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationUtilization>> {
        let (map, failing) = match service {
            ReservedService::Rds => (&self.rds_utilization, self.fail_rds_utilization),
            ReservedService::OpenSearch => (&self.os_utilization, self.fail_os_utilization),
        };
        if failing {
            return Err(fail("reservation utilization", service.display_name()));
        }
        Ok(map.get(&period.start).copied())
    }

    async fn savings_plan_utilization(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<SavingsPlanUtilization>> {
        if self.fail_sp_utilization {
            return Err(fail("savings plan utilization", period.start));
        }
        Ok(self.sp_utilization.get(&period.start).copied())
    }

    async fn credit_savings(&self, period: BillingPeriod) -> SourceResult<CreditSavings> {
        if self.fail_credits {
            return Err(fail("credit savings", period.start));
        }
        Ok(self
            .credits
            .get(&period.start)
            .cloned()
            .unwrap_or_else(CreditSavings::empty))
    }

    async fn list_budgets(&self) -> SourceResult<Vec<Budget>> {
        if self.fail_list_budgets {
            return Err(SourceError::access_denied("budget listing"));
        }
        Ok(self.budgets.clone())
    }

    async fn budget_performance(
        &self,
        budget_name: &str,
        _period: BillingPeriod,
    ) -> SourceResult<Option<BudgetPerformance>> {
        if self.fail_performance.contains(budget_name) {
            return Err(fail("budget performance", budget_name));
        }
        Ok(self.performances.get(budget_name).copied())
    }
}
