//! Cross-module analytics tests
//!
//! Property checks and end-to-end scenarios over the aggregation layer,
//! running against the in-memory data-source double.

use super::budget::{detect_budget_anomalies, Severity};
use super::quarterly::{cost_trend_description, month_over_month, summarize_quarter};
use super::savings::collect_savings;
use super::trend::{analyze_trend, TrendDirection, TrendStrength};
use crate::models::{Budget, BudgetPerformance, ReservationUtilization, SavingsPlanUtilization};
use crate::testing::{day, StaticSource};

const LABELS: [&str; 3] = ["Nov 2023", "Dec 2023", "Jan 2024"];

fn trend_of(change: f64) -> (TrendDirection, TrendStrength) {
    // Base 50.0 keeps both endpoints comfortably positive.
    let result = analyze_trend([Some(50.0), Some(50.0), Some(50.0 + change)], LABELS);
    assert!((result.quarterly_change - change).abs() < 1e-9);
    (result.direction, result.strength)
}

#[test]
fn test_threshold_boundaries() {
    use TrendDirection::*;
    use TrendStrength::*;

    // Direction flips at |change| >= 2.0; strength tiers start strictly
    // above 5.0 and 10.0.
    assert_eq!(trend_of(1.99), (Stable, Minimal));
    assert_eq!(trend_of(2.0), (Increasing, Weak));
    assert_eq!(trend_of(2.01), (Increasing, Weak));
    assert_eq!(trend_of(5.0), (Increasing, Weak));
    assert_eq!(trend_of(5.01), (Increasing, Moderate));
    assert_eq!(trend_of(10.0), (Increasing, Moderate));
    assert_eq!(trend_of(10.01), (Increasing, Strong));

    assert_eq!(trend_of(-1.99), (Stable, Minimal));
    assert_eq!(trend_of(-2.0), (Decreasing, Weak));
    assert_eq!(trend_of(-5.01), (Decreasing, Moderate));
    assert_eq!(trend_of(-10.01), (Decreasing, Strong));
}

#[test]
fn test_missing_data_symmetry() {
    // Any missing endpoint forces the neutral result, regardless of the
    // other values.
    let cases: [[Option<f64>; 3]; 4] = [
        [None, Some(80.0), Some(90.0)],
        [Some(80.0), Some(90.0), None],
        [Some(0.0), Some(80.0), Some(90.0)],
        [Some(80.0), Some(90.0), Some(0.0)],
    ];
    for values in cases {
        let result = analyze_trend(values, LABELS);
        assert_eq!(result.quarterly_change, 0.0, "input {:?}", values);
        assert_eq!(result.direction, TrendDirection::Stable, "input {:?}", values);
        assert_eq!(result.strength, TrendStrength::None, "input {:?}", values);
    }

    // A missing middle month does not block the quarterly change.
    let result = analyze_trend([Some(80.0), None, Some(90.0)], LABELS);
    assert_eq!(result.quarterly_change, 10.0);
    assert_eq!(result.direction, TrendDirection::Increasing);
}

#[test]
fn test_scenario_quarterly_costs() {
    // Monthly costs oldest -> newest: 100, 200, 150.
    let summary = summarize_quarter(150.0, 200.0, 100.0);
    assert!((summary.quarterly_total_cost - 450.0).abs() < 1e-9);
    assert_eq!(summary.selected_month_cost, 150.0);
    assert_eq!(summary.month_minus_two_cost, 100.0);

    // Cost trend across the quarter: 100 -> 150 is +50% growth.
    let trend = cost_trend_description(100.0, 200.0, 150.0);
    assert!(trend.starts_with("Increasing"), "got {}", trend);

    // Month-over-month against the middle month.
    let mom = month_over_month(summary.selected_month_cost, summary.month_minus_one_cost);
    assert_eq!(mom.change, -50.0);
    assert_eq!(mom.percentage, -25.0);
}

#[test]
fn test_scenario_flat_coverage() {
    let result = analyze_trend([Some(60.0), Some(60.0), Some(60.0)], LABELS);
    assert_eq!(result.quarterly_change, 0.0);
    assert_eq!(result.direction, TrendDirection::Stable);
    assert_eq!(result.strength, TrendStrength::Minimal);
    assert_eq!(result.month_to_month_changes.len(), 2);
}

#[tokio::test]
async fn test_scenario_budget_overage_critical() {
    let mut source = StaticSource::default();
    source.budgets.push(Budget {
        name: "platform".to_string(),
        limit_amount: 1000.0,
        currency: "USD".to_string(),
        time_unit: "MONTHLY".to_string(),
        budget_type: "COST".to_string(),
    });
    source.performances.insert(
        "platform".to_string(),
        BudgetPerformance {
            actual_amount: 1350.0,
            forecasted_amount: 0.0,
        },
    );

    let period = crate::period::BillingPeriod {
        start: day(2024, 1),
        end: day(2024, 2),
    };
    let report = detect_budget_anomalies(&source, period, 10.0).await.unwrap();

    assert_eq!(report.total_budgets_checked, 1);
    assert_eq!(report.anomalies_found, 1);
    let anomaly = &report.anomalies[0];
    assert_eq!(anomaly.actual_above_target, 350.0);
    assert_eq!(anomaly.actual_above_target_percentage, 35.0);
    assert_eq!(anomaly.severity, Severity::Critical);
}

#[tokio::test]
async fn test_scenario_one_budget_failure_does_not_abort_rest() {
    let mut source = StaticSource::default();
    for name in ["alpha", "broken", "gamma"] {
        source.budgets.push(Budget {
            name: name.to_string(),
            limit_amount: 100.0,
            currency: "USD".to_string(),
            time_unit: "MONTHLY".to_string(),
            budget_type: "COST".to_string(),
        });
        source.performances.insert(
            name.to_string(),
            BudgetPerformance {
                actual_amount: 150.0,
                forecasted_amount: 0.0,
            },
        );
    }
    source.fail_performance.insert("broken".to_string());

    let period = crate::period::BillingPeriod {
        start: day(2024, 1),
        end: day(2024, 2),
    };
    let report = detect_budget_anomalies(&source, period, 10.0).await.unwrap();

    assert_eq!(report.total_budgets_checked, 3);
    assert_eq!(report.anomalies_found, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("broken"));
}

#[tokio::test]
async fn test_scenario_failing_savings_category() {
    let start = day(2024, 1);
    let mut source = StaticSource::default();
    source.sp_utilization.insert(
        start,
        SavingsPlanUtilization {
            net_savings: 120.0,
            utilization_percentage: 97.0,
        },
    );
    source.rds_utilization.insert(
        start,
        ReservationUtilization {
            utilization_percentage: 88.0,
            net_savings: 40.0,
        },
    );
    source.os_utilization.insert(
        start,
        ReservationUtilization {
            utilization_percentage: 70.0,
            net_savings: 15.0,
        },
    );
    source.fail_credits = true;

    let period = crate::period::BillingPeriod {
        start,
        end: day(2024, 2),
    };
    let breakdown = collect_savings(&source, period).await;

    assert_eq!(breakdown.errors.len(), 1);
    assert!(breakdown.errors[0].starts_with("Credit Savings:"));
    assert_eq!(breakdown.credit_savings, 0.0);
    assert!((breakdown.total_savings - 175.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_savings_empty_categories_noted_not_fatal() {
    let source = StaticSource::default();
    let period = crate::period::BillingPeriod {
        start: day(2024, 1),
        end: day(2024, 2),
    };
    let breakdown = collect_savings(&source, period).await;

    assert_eq!(breakdown.total_savings, 0.0);
    // Savings Plans, RDS, and OpenSearch each note the absence; credits
    // legitimately sum to zero without a note.
    assert_eq!(breakdown.errors.len(), 3);
}
