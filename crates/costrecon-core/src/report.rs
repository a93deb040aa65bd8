//! Report assembly
//!
//! Fetches three trailing months of billing data sequentially and folds them
//! through the aggregation layer into one renderable report. The selected
//! month's primary cost fetch is the only mandatory input; everything else
//! degrades to warnings and empty aggregates.

use serde::Serialize;

use crate::analytics::budget::{detect_budget_anomalies, BudgetAnomalyReport};
use crate::analytics::extract;
use crate::analytics::quarterly::{month_over_month, summarize_quarter, MonthOverMonth, QuarterlyCostSummary};
use crate::analytics::savings::{collect_savings, SavingsBreakdown};
use crate::analytics::trend::{analyze_trend, TrendResult};
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::models::{CoverageSample, MonthlyCostReport};
use crate::period::{BillingPeriod, SelectedMonth};
use crate::source::{CostDataSource, ReservedService};

/// Coverage section for one reservation-like product: the selected month's
/// snapshot plus the 3-month trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageOverview {
    pub selected_month: Option<CoverageSample>,
    pub trend: TrendResult,
}

/// Everything the renderers consume for one report run.
#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    /// Full label of the selected month, e.g. "January 2024".
    pub month_label: String,
    /// Short labels, selected month first, then month-1 and month-2.
    pub short_labels: [String; 3],
    pub period: BillingPeriod,
    /// Raw selected-month breakdown; renderers derive top-N service tables
    /// from this themselves.
    pub selected_month_costs: MonthlyCostReport,
    pub quarterly: QuarterlyCostSummary,
    pub month_over_month: MonthOverMonth,
    pub savings: SavingsBreakdown,
    pub savings_plan: CoverageOverview,
    pub rds: CoverageOverview,
    pub budget_anomalies: BudgetAnomalyReport,
    /// Scoped warnings accumulated during fetch, for the report's error
    /// section.
    pub warnings: Vec<String>,
}

/// Generate the full cost report for `month`.
///
/// All fetches are sequential. Failures on the trailing months or on any
/// optional metric are recorded in `warnings` (or the aggregate's own error
/// list) and replaced with empty data; a failure fetching the selected
/// month's cost breakdown aborts the run.
pub async fn generate_report(
    source: &dyn CostDataSource,
    config: &ReportConfig,
    month: SelectedMonth,
) -> Result<CostReport, ReportError> {
    let months = [month, month.months_back(1), month.months_back(2)];
    let periods = [months[0].period(), months[1].period(), months[2].period()];
    let mut warnings = Vec::new();

    tracing::info!(month = %month.label(), "fetching cost and usage data");
    let selected_month_costs = source.cost_and_usage(periods[0]).await?;
    let minus_one_costs =
        fetch_trailing_costs(source, periods[1], &months[1].short_label(), &mut warnings).await;
    let minus_two_costs =
        fetch_trailing_costs(source, periods[2], &months[2].short_label(), &mut warnings).await;

    let quarterly = summarize_quarter(
        extract::total_cost(&selected_month_costs),
        extract::total_cost(&minus_one_costs),
        extract::total_cost(&minus_two_costs),
    );
    let mom = month_over_month(quarterly.selected_month_cost, quarterly.month_minus_one_cost);

    // The trend analyzer takes samples oldest first.
    let trend_labels = [
        months[2].short_label(),
        months[1].short_label(),
        months[0].short_label(),
    ];
    let trend_label_refs = [
        trend_labels[0].as_str(),
        trend_labels[1].as_str(),
        trend_labels[2].as_str(),
    ];

    tracing::info!("fetching savings plan coverage");
    let mut sp_samples: [Option<CoverageSample>; 3] = [None, None, None];
    for (slot, idx) in [(0usize, 2usize), (1, 1), (2, 0)] {
        sp_samples[slot] =
            fetch_sp_coverage(source, periods[idx], &months[idx].short_label(), &mut warnings)
                .await;
    }
    let savings_plan = CoverageOverview {
        selected_month: sp_samples[2],
        trend: analyze_trend(
            [
                extract::coverage(sp_samples[0].as_ref()),
                extract::coverage(sp_samples[1].as_ref()),
                extract::coverage(sp_samples[2].as_ref()),
            ],
            trend_label_refs,
        ),
    };

    tracing::info!("fetching RDS reservation coverage");
    let mut rds_samples: [Option<CoverageSample>; 3] = [None, None, None];
    for (slot, idx) in [(0usize, 2usize), (1, 1), (2, 0)] {
        rds_samples[slot] =
            fetch_rds_coverage(source, periods[idx], &months[idx].short_label(), &mut warnings)
                .await;
    }
    let rds = CoverageOverview {
        selected_month: rds_samples[2],
        trend: analyze_trend(
            [
                extract::coverage(rds_samples[0].as_ref()),
                extract::coverage(rds_samples[1].as_ref()),
                extract::coverage(rds_samples[2].as_ref()),
            ],
            trend_label_refs,
        ),
    };

    tracing::info!("collecting savings breakdown");
    let savings = collect_savings(source, periods[0]).await;

    tracing::info!("scanning budgets for anomalies");
    let budget_anomalies =
        match detect_budget_anomalies(source, periods[0], config.budget_threshold_pct).await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "budget anomaly scan failed");
                warnings.push(format!("Budget anomalies: {}", err));
                BudgetAnomalyReport::new(config.budget_threshold_pct)
            }
        };

    Ok(CostReport {
        month_label: month.label(),
        short_labels: [
            months[0].short_label(),
            months[1].short_label(),
            months[2].short_label(),
        ],
        period: periods[0],
        selected_month_costs,
        quarterly,
        month_over_month: mom,
        savings,
        savings_plan,
        rds,
        budget_anomalies,
        warnings,
    })
}

/// Trailing months degrade to an empty report instead of aborting.
async fn fetch_trailing_costs(
    source: &dyn CostDataSource,
    period: BillingPeriod,
    label: &str,
    warnings: &mut Vec<String>,
) -> MonthlyCostReport {
    match source.cost_and_usage(period).await {
        Ok(report) => report,
        Err(err) => {
            tracing::warn!(month = label, error = %err, "trailing month cost fetch failed");
            warnings.push(format!("Cost data for {}: {}", label, err));
            MonthlyCostReport::empty(period)
        }
    }
}

async fn fetch_sp_coverage(
    source: &dyn CostDataSource,
    period: BillingPeriod,
    label: &str,
    warnings: &mut Vec<String>,
) -> Option<CoverageSample> {
    match source.savings_plan_coverage(period).await {
        Ok(sample) => sample,
        Err(err) => {
            tracing::warn!(month = label, error = %err, "savings plan coverage fetch failed");
            warnings.push(format!("Savings Plan coverage for {}: {}", label, err));
            None
        }
    }
}

/// RDS needs two calls per month; the coverage call decides whether the
/// month has data, the utilization call fills in the second axis.
async fn fetch_rds_coverage(
    source: &dyn CostDataSource,
    period: BillingPeriod,
    label: &str,
    warnings: &mut Vec<String>,
) -> Option<CoverageSample> {
    let coverage = match source
        .reservation_coverage(period, ReservedService::Rds)
        .await
    {
        Ok(coverage) => coverage?,
        Err(err) => {
            tracing::warn!(month = label, error = %err, "RDS coverage fetch failed");
            warnings.push(format!("RDS coverage for {}: {}", label, err));
            return None;
        }
    };

    let utilization = match source
        .reservation_utilization(period, ReservedService::Rds)
        .await
    {
        Ok(utilization) => utilization,
        Err(err) => {
            tracing::warn!(month = label, error = %err, "RDS utilization fetch failed");
            warnings.push(format!("RDS utilization for {}: {}", label, err));
            None
        }
    };

    Some(CoverageSample {
        coverage_percentage: coverage.hours_coverage_percentage,
        utilization_percentage: utilization.map(|u| u.utilization_percentage).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::trend::TrendDirection;
    use crate::models::ReservationCoverage;
    use crate::testing::{day, month_report, StaticSource};

    fn selected() -> SelectedMonth {
        SelectedMonth { year: 2024, month: 3 }
    }

    fn populated_source() -> StaticSource {
        let mut source = StaticSource::default();
        // Oldest -> newest: Jan 100, Feb 200, Mar 150.
        source.costs.insert(
            day(2024, 3),
            month_report(day(2024, 3), &[("Amazon EC2", 90.0), ("Amazon S3", 60.0)]),
        );
        source
            .costs
            .insert(day(2024, 2), month_report(day(2024, 2), &[("Amazon EC2", 200.0)]));
        source
            .costs
            .insert(day(2024, 1), month_report(day(2024, 1), &[("Amazon EC2", 100.0)]));

        for (month, pct) in [(1, 52.0), (2, 58.0), (3, 65.0)] {
            source.sp_coverage.insert(
                day(2024, month),
                CoverageSample {
                    coverage_percentage: pct,
                    utilization_percentage: 95.0,
                },
            );
        }
        source
    }

    #[tokio::test]
    async fn test_generate_report_happy_path() {
        let source = populated_source();
        let config = ReportConfig::default();

        let report = generate_report(&source, &config, selected()).await.unwrap();

        assert_eq!(report.month_label, "March 2024");
        assert_eq!(report.short_labels[0], "Mar 2024");
        assert_eq!(report.short_labels[2], "Jan 2024");
        assert!((report.quarterly.quarterly_total_cost - 450.0).abs() < 1e-9);
        assert_eq!(report.quarterly.selected_month_cost, 150.0);
        assert_eq!(report.month_over_month.change, -50.0);

        // SP coverage 52 -> 65 over the quarter.
        assert_eq!(report.savings_plan.trend.quarterly_change, 13.0);
        assert_eq!(
            report.savings_plan.trend.direction,
            TrendDirection::Increasing
        );
        assert_eq!(
            report.savings_plan.selected_month.unwrap().coverage_percentage,
            65.0
        );

        // No RDS data anywhere: trend stays neutral, labels flag it.
        assert!(report.rds.selected_month.is_none());
        assert_eq!(report.rds.trend.direction, TrendDirection::Stable);
        assert!(report.rds.trend.labels[0].ends_with("(No Data)"));

        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_selected_month_failure_is_fatal() {
        let mut source = populated_source();
        source.fail_costs.insert(day(2024, 3));
        let config = ReportConfig::default();

        let result = generate_report(&source, &config, selected()).await;
        assert!(matches!(result, Err(ReportError::Source(_))));
    }

    #[tokio::test]
    async fn test_trailing_month_failure_is_recovered() {
        let mut source = populated_source();
        source.fail_costs.insert(day(2024, 1));
        let config = ReportConfig::default();

        let report = generate_report(&source, &config, selected()).await.unwrap();

        // Jan degraded to an empty report.
        assert_eq!(report.quarterly.month_minus_two_cost, 0.0);
        assert!((report.quarterly.quarterly_total_cost - 350.0).abs() < 1e-9);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Jan 2024"));
    }

    #[tokio::test]
    async fn test_coverage_fetch_failure_becomes_no_data() {
        let mut source = populated_source();
        source.fail_sp_coverage.insert(day(2024, 1));
        let config = ReportConfig::default();

        let report = generate_report(&source, &config, selected()).await.unwrap();

        // Oldest endpoint missing: trend neutralized, warning recorded.
        assert_eq!(report.savings_plan.trend.quarterly_change, 0.0);
        assert!(report.savings_plan.trend.labels[0].ends_with("(No Data)"));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("Savings Plan coverage for Jan 2024")));
    }

    #[tokio::test]
    async fn test_rds_coverage_combines_both_calls() {
        let mut source = populated_source();
        source.rds_coverage.insert(
            day(2024, 3),
            ReservationCoverage {
                hours_coverage_percentage: 81.0,
                cost_coverage_percentage: 0.0,
            },
        );
        source.rds_utilization.insert(
            day(2024, 3),
            crate::models::ReservationUtilization {
                utilization_percentage: 93.0,
                net_savings: 12.0,
            },
        );
        let config = ReportConfig::default();

        let report = generate_report(&source, &config, selected()).await.unwrap();

        let sample = report.rds.selected_month.unwrap();
        assert_eq!(sample.coverage_percentage, 81.0);
        assert_eq!(sample.utilization_percentage, 93.0);
    }

    #[tokio::test]
    async fn test_budget_listing_failure_is_recovered() {
        let mut source = populated_source();
        source.fail_list_budgets = true;
        let config = ReportConfig::default();

        let report = generate_report(&source, &config, selected()).await.unwrap();

        assert!(report.budget_anomalies.anomalies.is_empty());
        assert_eq!(report.budget_anomalies.total_budgets_checked, 0);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("Budget anomalies:")));
    }
}
