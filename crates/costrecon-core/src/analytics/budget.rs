//! Budget anomaly detection
//!
//! Compares each budget's latest actual/forecasted amounts against its limit
//! plus a configured threshold percentage, and classifies how far the worst
//! overage runs past that threshold.

use serde::Serialize;

use crate::models::{Budget, BudgetPerformance};
use crate::period::BillingPeriod;
use crate::source::{CostDataSource, SourceResult};

/// Severity tier for a budget anomaly, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Marker for console output.
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Low => "\u{1f7e2}",
            Severity::Medium => "\u{1f7e1}",
            Severity::High => "\u{1f7e0}",
            Severity::Critical => "\u{1f534}",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One budget whose actual or forecasted spend breached its threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAnomaly {
    pub budget_name: String,
    pub budget_limit: f64,
    pub actual_amount: f64,
    pub forecasted_amount: f64,
    pub actual_percentage: f64,
    pub forecast_percentage: f64,
    pub actual_above_target: f64,
    pub forecast_above_target: f64,
    pub actual_above_target_percentage: f64,
    pub forecast_above_target_percentage: f64,
    pub excess_amount: f64,
    pub severity: Severity,
    pub currency: String,
    pub time_unit: String,
    pub budget_type: String,
}

/// Result of scanning every budget in the account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAnomalyReport {
    pub anomalies: Vec<BudgetAnomaly>,
    pub total_budgets_checked: usize,
    pub anomalies_found: usize,
    pub threshold_percentage: f64,
    pub errors: Vec<String>,
}

impl BudgetAnomalyReport {
    pub fn new(threshold_percentage: f64) -> Self {
        Self {
            anomalies: Vec::new(),
            total_budgets_checked: 0,
            anomalies_found: 0,
            threshold_percentage,
            errors: Vec::new(),
        }
    }

    /// Anomaly counts per severity tier: (critical, high, medium, low).
    pub fn severity_counts(&self) -> (usize, usize, usize, usize) {
        let count = |severity| {
            self.anomalies
                .iter()
                .filter(|a| a.severity == severity)
                .count()
        };
        (
            count(Severity::Critical),
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low),
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classify severity from the worst above-target percentage.
///
/// Severity runs on the relative overage percentage while the anomaly
/// trigger runs on the absolute threshold amount, so an anomaly can fire
/// with an overage percentage still below the threshold - that lands in
/// `Low`. Deliberately kept as-is.
pub fn classify_severity(
    actual_above_pct: f64,
    forecast_above_pct: f64,
    threshold_pct: f64,
) -> Severity {
    let max_overage = actual_above_pct.max(forecast_above_pct);

    if max_overage >= threshold_pct * 3.0 {
        Severity::Critical
    } else if max_overage >= threshold_pct * 2.0 {
        Severity::High
    } else if max_overage >= threshold_pct {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Evaluate one budget against its latest performance sample.
///
/// Returns `None` for budgets without a positive limit (skipped silently)
/// and for budgets within their threshold.
pub fn evaluate_budget(
    budget: &Budget,
    performance: &BudgetPerformance,
    threshold_pct: f64,
) -> Option<BudgetAnomaly> {
    if budget.limit_amount <= 0.0 {
        return None;
    }

    let limit = budget.limit_amount;
    let actual = performance.actual_amount;
    let forecast = performance.forecasted_amount;
    let threshold_amount = limit * (1.0 + threshold_pct / 100.0);

    if !(forecast > threshold_amount || actual > threshold_amount) {
        return None;
    }

    let actual_above_target = (actual - limit).max(0.0);
    let forecast_above_target = (forecast - limit).max(0.0);
    let actual_above_pct = if actual > limit {
        (actual - limit) / limit * 100.0
    } else {
        0.0
    };
    let forecast_above_pct = if forecast > limit {
        (forecast - limit) / limit * 100.0
    } else {
        0.0
    };

    Some(BudgetAnomaly {
        budget_name: budget.name.clone(),
        budget_limit: limit,
        actual_amount: actual,
        forecasted_amount: forecast,
        actual_percentage: round2(actual / limit * 100.0),
        forecast_percentage: round2(forecast / limit * 100.0),
        actual_above_target: round2(actual_above_target),
        forecast_above_target: round2(forecast_above_target),
        actual_above_target_percentage: round2(actual_above_pct),
        forecast_above_target_percentage: round2(forecast_above_pct),
        excess_amount: round2((forecast - limit).max(actual - limit).max(0.0)),
        severity: classify_severity(actual_above_pct, forecast_above_pct, threshold_pct),
        currency: budget.currency.clone(),
        time_unit: budget.time_unit.clone(),
        budget_type: budget.budget_type.clone(),
    })
}

/// Scan every budget in the account for anomalies over `period`.
///
/// A failure fetching one budget's performance history is recorded as an
/// error scoped to that budget; the remaining budgets are still processed.
/// Only the initial budget listing propagates an error.
pub async fn detect_budget_anomalies(
    source: &dyn CostDataSource,
    period: BillingPeriod,
    threshold_pct: f64,
) -> SourceResult<BudgetAnomalyReport> {
    let budgets = source.list_budgets().await?;
    let mut report = BudgetAnomalyReport::new(threshold_pct);

    for budget in &budgets {
        report.total_budgets_checked += 1;

        match source.budget_performance(&budget.name, period).await {
            Ok(Some(performance)) => {
                if let Some(anomaly) = evaluate_budget(budget, &performance, threshold_pct) {
                    report.anomalies.push(anomaly);
                    report.anomalies_found += 1;
                }
            }
            Ok(None) => {
                tracing::debug!(budget = %budget.name, "no performance history for period");
            }
            Err(err) => {
                tracing::warn!(budget = %budget.name, error = %err, "budget performance fetch failed");
                report
                    .errors
                    .push(format!("Budget '{}': {}", budget.name, err));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(name: &str, limit: f64) -> Budget {
        Budget {
            name: name.to_string(),
            limit_amount: limit,
            currency: "USD".to_string(),
            time_unit: "MONTHLY".to_string(),
            budget_type: "COST".to_string(),
        }
    }

    fn performance(actual: f64, forecast: f64) -> BudgetPerformance {
        BudgetPerformance {
            actual_amount: actual,
            forecasted_amount: forecast,
        }
    }

    #[test]
    fn test_within_threshold_is_not_an_anomaly() {
        // Limit 1000, threshold 10% -> anomaly only above 1100.
        let result = evaluate_budget(&budget("team-a", 1000.0), &performance(1050.0, 1080.0), 10.0);
        assert!(result.is_none());
    }

    #[test]
    fn test_zero_limit_budget_is_skipped() {
        let result = evaluate_budget(&budget("unlimited", 0.0), &performance(9999.0, 9999.0), 10.0);
        assert!(result.is_none());
    }

    #[test]
    fn test_actual_overage_critical() {
        // Limit 1000, threshold 10%: actual 1350 -> above target 350 (35%),
        // 35 >= 30 (3x threshold) -> CRITICAL.
        let anomaly = evaluate_budget(&budget("team-a", 1000.0), &performance(1350.0, 900.0), 10.0)
            .expect("anomaly should fire");

        assert_eq!(anomaly.actual_above_target, 350.0);
        assert_eq!(anomaly.actual_above_target_percentage, 35.0);
        assert_eq!(anomaly.forecast_above_target, 0.0);
        assert_eq!(anomaly.excess_amount, 350.0);
        assert_eq!(anomaly.severity, Severity::Critical);
    }

    #[test]
    fn test_forecast_only_overage() {
        let anomaly = evaluate_budget(&budget("team-b", 500.0), &performance(400.0, 620.0), 10.0)
            .expect("anomaly should fire");

        assert_eq!(anomaly.actual_above_target, 0.0);
        assert_eq!(anomaly.forecast_above_target, 120.0);
        assert_eq!(anomaly.forecast_above_target_percentage, 24.0);
        // 24% >= 2x10% -> HIGH
        assert_eq!(anomaly.severity, Severity::High);
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(classify_severity(5.0, 0.0, 10.0), Severity::Low);
        assert_eq!(classify_severity(10.0, 0.0, 10.0), Severity::Medium);
        assert_eq!(classify_severity(0.0, 20.0, 10.0), Severity::High);
        assert_eq!(classify_severity(30.0, 0.0, 10.0), Severity::Critical);
    }

    #[test]
    fn test_severity_monotonic_in_overage() {
        let threshold = 10.0;
        let mut last = classify_severity(0.0, 0.0, threshold);
        for step in 0..500 {
            let overage = step as f64 * 0.1;
            let severity = classify_severity(overage, 0.0, threshold);
            assert!(severity >= last, "severity regressed at overage {}", overage);
            last = severity;
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_trigger_and_severity_use_different_bases() {
        // Known quirk kept from the documented behavior: the trigger runs on
        // the absolute threshold amount (limit * 1.1 here) while severity
        // runs on the relative above-target percentage, so LOW exists as the
        // fallback tier for overage percentages below the threshold even
        // though a triggering amount always lands at MEDIUM or above.
        let anomaly = evaluate_budget(&budget("edge", 1000.0), &performance(0.0, 1105.0), 10.0)
            .expect("anomaly should fire");
        assert_eq!(anomaly.severity, Severity::Medium);
        assert_eq!(classify_severity(4.0, 2.0, 10.0), Severity::Low);
    }

    #[test]
    fn test_severity_counts() {
        let mut report = BudgetAnomalyReport::new(10.0);
        for (name, actual) in [("a", 1350.0), ("b", 1250.0), ("c", 1150.0)] {
            if let Some(anomaly) =
                evaluate_budget(&budget(name, 1000.0), &performance(actual, 0.0), 10.0)
            {
                report.anomalies.push(anomaly);
                report.anomalies_found += 1;
            }
        }
        let (critical, high, medium, low) = report.severity_counts();
        assert_eq!((critical, high, medium, low), (1, 1, 1, 0));
    }
}
