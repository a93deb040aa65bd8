//! Quarterly cost aggregation
//!
//! Pure sums and comparisons over the three extracted monthly totals.
//! Extraction already degrades missing data to 0, so nothing here needs
//! error handling.

use serde::Serialize;

/// Three-month cost summary. The total is the exact sum of the parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuarterlyCostSummary {
    pub selected_month_cost: f64,
    pub month_minus_one_cost: f64,
    pub month_minus_two_cost: f64,
    pub quarterly_total_cost: f64,
}

/// Month-over-month comparison between two monthly totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthOverMonth {
    pub change: f64,
    pub percentage: f64,
}

/// Sum the three monthly totals into a quarterly summary.
pub fn summarize_quarter(
    selected_month_cost: f64,
    month_minus_one_cost: f64,
    month_minus_two_cost: f64,
) -> QuarterlyCostSummary {
    QuarterlyCostSummary {
        selected_month_cost,
        month_minus_one_cost,
        month_minus_two_cost,
        quarterly_total_cost: selected_month_cost + month_minus_one_cost + month_minus_two_cost,
    }
}

/// Change and percentage change from `previous` to `current`. Both stay 0.0
/// when `previous` has no cost to compare against.
pub fn month_over_month(current: f64, previous: f64) -> MonthOverMonth {
    if previous > 0.0 {
        let change = current - previous;
        MonthOverMonth {
            change,
            percentage: change / previous * 100.0,
        }
    } else {
        MonthOverMonth {
            change: 0.0,
            percentage: 0.0,
        }
    }
}

/// Average monthly cost over the quarter.
pub fn quarterly_average(quarterly_total: f64) -> f64 {
    if quarterly_total > 0.0 {
        quarterly_total / 3.0
    } else {
        0.0
    }
}

/// One-line cost trend sentence over three months, oldest first.
///
/// Needs all three months to say anything about direction; the ±5% band
/// counts as stable.
pub fn cost_trend_description(oldest: f64, middle: f64, newest: f64) -> String {
    if oldest == 0.0 && middle == 0.0 && newest == 0.0 {
        return "No data available".to_string();
    }

    if oldest > 0.0 && middle > 0.0 && newest > 0.0 {
        let overall_change = (newest - oldest) / oldest * 100.0;

        if overall_change > 5.0 {
            format!("Increasing ({:+.1}% growth)", overall_change)
        } else if overall_change < -5.0 {
            format!("Decreasing ({:+.1}% decline)", overall_change)
        } else {
            format!("Stable ({:+.1}% change)", overall_change)
        }
    } else {
        "Insufficient data for trend analysis".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarterly_total_is_exact_sum() {
        let summary = summarize_quarter(150.0, 200.0, 100.0);
        assert!(
            (summary.quarterly_total_cost
                - (summary.selected_month_cost
                    + summary.month_minus_one_cost
                    + summary.month_minus_two_cost))
                .abs()
                < 1e-9
        );
        assert_eq!(summary.quarterly_total_cost, 450.0);
    }

    #[test]
    fn test_month_over_month() {
        let mom = month_over_month(150.0, 100.0);
        assert_eq!(mom.change, 50.0);
        assert_eq!(mom.percentage, 50.0);

        let mom = month_over_month(80.0, 100.0);
        assert_eq!(mom.change, -20.0);
        assert_eq!(mom.percentage, -20.0);
    }

    #[test]
    fn test_month_over_month_zero_previous() {
        let mom = month_over_month(150.0, 0.0);
        assert_eq!(mom.change, 0.0);
        assert_eq!(mom.percentage, 0.0);
    }

    #[test]
    fn test_quarterly_average() {
        assert_eq!(quarterly_average(450.0), 150.0);
        assert_eq!(quarterly_average(0.0), 0.0);
    }

    #[test]
    fn test_cost_trend_description() {
        assert!(cost_trend_description(100.0, 110.0, 120.0).starts_with("Increasing"));
        assert!(cost_trend_description(120.0, 110.0, 100.0).starts_with("Decreasing"));
        assert!(cost_trend_description(100.0, 101.0, 103.0).starts_with("Stable"));
        assert_eq!(cost_trend_description(0.0, 0.0, 0.0), "No data available");
        assert_eq!(
            cost_trend_description(0.0, 110.0, 120.0),
            "Insufficient data for trend analysis"
        );
    }
}
