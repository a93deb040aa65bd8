//! Console report renderer
//!
//! Prints the aggregated report as sectioned terminal output with
//! comfy-table tables for service costs and budget anomalies.

use comfy_table::{Cell, Color, ContentArrangement, Table};

use costrecon_core::analytics::savings::should_display_savings_item;
use costrecon_core::analytics::status::{
    coverage_recommendation, optimization_rate, utilization_recommendation,
};
use costrecon_core::analytics::{cost_trend_description, quarterly_average, savings_percentage};
use costrecon_core::report::{CostReport, CoverageOverview};

const REPORT_WIDTH: usize = 80;

fn banner(text: &str) {
    println!("{}", "=".repeat(REPORT_WIDTH));
    println!("{:^width$}", text, width = REPORT_WIDTH);
    println!("{}", "=".repeat(REPORT_WIDTH));
}

fn section(title: &str) {
    println!("\n{}", title);
    println!("{}", "-".repeat(40));
}

/// Print the full console report.
pub fn print_report(report: &CostReport) {
    println!();
    banner("AWS COST RECONNAISSANCE REPORT");
    println!("Period: {} to {}", report.period.start, report.period.end);
    println!("{}", "=".repeat(REPORT_WIDTH));

    print_executive_summary(report);
    print_top_services(report);
    print_coverage_section(
        "SAVINGS PLAN COVERAGE/UTILIZATION",
        "Savings Plan",
        "Savings Plans",
        &report.savings_plan,
    );
    print_trend_section("3-MONTH SAVINGS PLAN TREND", &report.savings_plan);
    print_coverage_section(
        "RDS RESERVED INSTANCES COVERAGE/UTILIZATION",
        "RDS Reserved Instance",
        "Reserved Instances",
        &report.rds,
    );
    print_trend_section("3-MONTH RDS RESERVED INSTANCE TREND", &report.rds);
    print_savings_summary(report);
    print_monthly_comparison(report);
    print_quarterly_summary(report);
    print_budget_anomalies(report);
    print_warnings(report);

    println!("\n{}", "=".repeat(REPORT_WIDTH));
    println!("Report complete.");
    println!("{}\n", "=".repeat(REPORT_WIDTH));
}

fn print_executive_summary(report: &CostReport) {
    section("EXECUTIVE SUMMARY");

    let total_cost = report.quarterly.selected_month_cost;
    println!("{} Cost: ${:.2}", report.month_label, total_cost);
    println!(
        "Quarterly Total (3 months): ${:.2}",
        report.quarterly.quarterly_total_cost
    );
    println!("Monthly Savings: ${:.2}", report.savings.total_savings);
    if total_cost > 0.0 {
        println!(
            "Cost Optimization Rate: {:.1}%",
            optimization_rate(report.savings.total_savings, total_cost)
        );
    }
}

fn print_top_services(report: &CostReport) {
    let top = report.selected_month_costs.top_services(10);
    if top.is_empty() {
        return;
    }

    section("TOP SERVICES BY COST");
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Service").fg(Color::Cyan),
        Cell::new("Cost").fg(Color::Cyan),
    ]);
    for service in top {
        table.add_row(vec![
            service.service.clone(),
            format!("${:.2}", service.amount),
        ]);
    }
    println!("{}", table);
}

fn print_coverage_section(
    title: &str,
    coverage_label: &str,
    utilization_label: &str,
    overview: &CoverageOverview,
) {
    section(title);

    let Some(sample) = &overview.selected_month else {
        println!("No {} data available", coverage_label);
        return;
    };

    println!("Coverage: {:.1}%", sample.coverage_percentage);
    println!("Utilization Rate: {:.1}%", sample.utilization_percentage);
    println!(
        "  {}",
        coverage_recommendation(sample.coverage_percentage, coverage_label)
    );
    println!(
        "  {}",
        utilization_recommendation(sample.utilization_percentage, utilization_label)
    );
}

fn print_trend_section(title: &str, overview: &CoverageOverview) {
    section(title);

    let trend = &overview.trend;
    println!("Monthly Coverage Progression:");
    for i in 0..3 {
        let arrow = if i > 0 && trend.values[i - 1] > 0.0 && trend.values[i] > 0.0 {
            let change = trend.values[i] - trend.values[i - 1];
            if change > 1.0 {
                " \u{2197}"
            } else if change < -1.0 {
                " \u{2198}"
            } else {
                " \u{2192}"
            }
        } else {
            ""
        };
        println!(
            "  \u{2022} {:<22} {:>6.1}%{}",
            trend.labels[i], trend.values[i], arrow
        );
    }

    println!("\nQuarterly Change: {:+.1}%", trend.quarterly_change);
    println!("Trend Direction: {}", trend.direction);
    println!("Trend Strength: {}", trend.strength);
    println!("\nTrend Analysis:");
    println!("   {}", trend.summary);
}

fn print_savings_summary(report: &CostReport) {
    section("SAVINGS SUMMARY");

    let savings = &report.savings;
    println!("Total Monthly Savings: ${:.2}", savings.total_savings);

    println!("\nSavings Breakdown:");
    for (name, amount) in savings.categories() {
        if should_display_savings_item(name, amount) {
            println!(
                "  \u{2022} {:<25} ${:>8.2} ({:>5.1}%)",
                name,
                amount,
                savings_percentage(amount, savings.total_savings)
            );
        }
    }

    if !savings.errors.is_empty() {
        println!("\nSavings Collection Errors:");
        for error in &savings.errors {
            println!("  \u{2022} {}", error);
        }
    }
}

fn print_monthly_comparison(report: &CostReport) {
    section(&format!(
        "{} COST VS {}",
        report.short_labels[0].to_uppercase(),
        report.short_labels[1].to_uppercase()
    ));

    let mom = &report.month_over_month;
    println!(
        "{} Cost: ${:.2}",
        report.short_labels[0], report.quarterly.selected_month_cost
    );
    println!(
        "{} Cost: ${:.2}",
        report.short_labels[1], report.quarterly.month_minus_one_cost
    );
    println!("Month-over-Month Change: ${:.2}", mom.change);
    println!("Change Percentage: {:+.1}%", mom.percentage);

    let trend = if mom.change > 0.0 {
        "Increasing"
    } else if mom.change < 0.0 {
        "Decreasing"
    } else {
        "Stable"
    };
    println!("Trend: {}", trend);
}

fn print_quarterly_summary(report: &CostReport) {
    section("QUARTERLY COST SUMMARY (3 MONTHS)");

    let quarterly = &report.quarterly;
    println!(
        "{:<12}: ${:.2}",
        report.short_labels[0], quarterly.selected_month_cost
    );
    println!(
        "{:<12}: ${:.2}",
        report.short_labels[1], quarterly.month_minus_one_cost
    );
    println!(
        "{:<12}: ${:.2}",
        report.short_labels[2], quarterly.month_minus_two_cost
    );
    println!("Quarter Total: ${:.2}", quarterly.quarterly_total_cost);

    if quarterly.quarterly_total_cost > 0.0 {
        println!(
            "Average Monthly: ${:.2}",
            quarterly_average(quarterly.quarterly_total_cost)
        );
        println!(
            "Quarterly Trend: {}",
            cost_trend_description(
                quarterly.month_minus_two_cost,
                quarterly.month_minus_one_cost,
                quarterly.selected_month_cost,
            )
        );
    }
}

fn print_budget_anomalies(report: &CostReport) {
    section("BUDGET ANOMALIES ANALYSIS");

    let anomalies = &report.budget_anomalies;
    println!("Total Budgets Checked: {}", anomalies.total_budgets_checked);
    println!("Anomalies Found: {}", anomalies.anomalies_found);
    println!("Threshold Used: {}%", anomalies.threshold_percentage);

    if anomalies.anomalies.is_empty() {
        println!("Budget Health: GOOD");
        println!("All budgets are within acceptable thresholds");
    } else {
        println!("Budget Health: REQUIRES ATTENTION");
        println!("\nBudget Anomalies Details:");

        for anomaly in &anomalies.anomalies {
            println!("\n  \u{2022} {}", anomaly.budget_name);
            println!(
                "    Budget Limit:     {} {:.2}",
                anomaly.currency, anomaly.budget_limit
            );
            println!(
                "    Actual Amount:    {} {:.2}",
                anomaly.currency, anomaly.actual_amount
            );
            println!(
                "    Above Target:     {} {:.2} ({:+.1}%)",
                anomaly.currency, anomaly.actual_above_target, anomaly.actual_above_target_percentage
            );
            println!(
                "    Severity:         {} {}",
                anomaly.severity.marker(),
                anomaly.severity
            );
        }

        let (critical, high, _, _) = anomalies.severity_counts();
        println!("\nRecommendations:");
        if critical > 0 {
            println!(
                "  \u{2022} {} budget(s) in CRITICAL state - immediate attention required",
                critical
            );
        }
        if high > 0 {
            println!(
                "  \u{2022} {} budget(s) in HIGH state - review spending patterns",
                high
            );
        }
        if critical == 0 && high == 0 {
            println!("  \u{2022} Monitor budget trends closely to prevent future overages");
        }
        println!("  \u{2022} Consider adjusting budget limits or implementing cost controls");
    }

    if !anomalies.errors.is_empty() {
        println!("\nBudget Analysis Errors:");
        for error in &anomalies.errors {
            println!("  \u{2022} {}", error);
        }
    }
}

fn print_warnings(report: &CostReport) {
    if report.warnings.is_empty() {
        return;
    }

    section("DATA COLLECTION WARNINGS");
    for warning in &report.warnings {
        println!("  \u{2022} {}", warning);
    }
}
