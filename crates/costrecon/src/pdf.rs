//! Paginated PDF report renderer
//!
//! Renders the aggregated report with printpdf and the builtin Helvetica
//! fonts. Layout is a simple top-down flow with page breaks; builtin fonts
//! cover WinAnsi only, so the PDF sticks to plain ASCII text.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use costrecon_core::analytics::savings::should_display_savings_item;
use costrecon_core::analytics::status::{coverage_status, optimization_rate, utilization_status};
use costrecon_core::analytics::{cost_trend_description, quarterly_average, savings_percentage};
use costrecon_core::report::{CostReport, CoverageOverview};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 18.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 18.0;
const LINE_HEIGHT: f32 = 6.0;

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("failed to load builtin font")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("failed to load builtin font")?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN_TOP,
        })
    }

    fn break_page_if_needed(&mut self, lines: usize) {
        if self.y - lines as f32 * LINE_HEIGHT < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN_TOP;
        }
    }

    fn title(&mut self, text: &str) {
        self.layer
            .use_text(text, 18.0, Mm(MARGIN_LEFT), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT * 2.0;
    }

    fn heading(&mut self, text: &str) {
        self.break_page_if_needed(4);
        self.y -= LINE_HEIGHT;
        self.layer
            .use_text(text, 13.0, Mm(MARGIN_LEFT), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT;
    }

    fn line(&mut self, text: &str) {
        self.break_page_if_needed(1);
        self.layer
            .use_text(text, 10.0, Mm(MARGIN_LEFT), Mm(self.y), &self.regular);
        self.y -= LINE_HEIGHT;
    }

    fn bullet(&mut self, text: &str) {
        self.break_page_if_needed(1);
        self.layer
            .use_text(format!("- {}", text), 10.0, Mm(MARGIN_LEFT + 4.0), Mm(self.y), &self.regular);
        self.y -= LINE_HEIGHT;
    }

    fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.doc.save(&mut BufWriter::new(file))?;
        Ok(())
    }
}

/// Write the paginated PDF report to `path`.
pub fn write_report(report: &CostReport, path: &Path) -> Result<()> {
    let mut page = PageWriter::new("AWS Cost Reconnaissance Report")?;

    page.title("AWS Cost Reconnaissance Report");
    page.line(&format!(
        "Period: {} to {}",
        report.period.start, report.period.end
    ));

    write_executive_summary(&mut page, report);
    write_top_services(&mut page, report);
    write_coverage(&mut page, "Savings Plan Coverage", &report.savings_plan);
    write_trend(&mut page, "3-Month Savings Plan Trend", &report.savings_plan);
    write_coverage(&mut page, "RDS Reserved Instance Coverage", &report.rds);
    write_trend(&mut page, "3-Month RDS Reserved Instance Trend", &report.rds);
    write_savings(&mut page, report);
    write_quarterly(&mut page, report);
    write_budget_anomalies(&mut page, report);
    write_warnings(&mut page, report);

    page.save(path)
}

fn write_executive_summary(page: &mut PageWriter, report: &CostReport) {
    page.heading("Executive Summary");
    let total_cost = report.quarterly.selected_month_cost;
    page.line(&format!("{} cost: ${:.2}", report.month_label, total_cost));
    page.line(&format!(
        "Quarterly total (3 months): ${:.2}",
        report.quarterly.quarterly_total_cost
    ));
    page.line(&format!(
        "Monthly savings: ${:.2}",
        report.savings.total_savings
    ));
    if total_cost > 0.0 {
        page.line(&format!(
            "Cost optimization rate: {:.1}%",
            optimization_rate(report.savings.total_savings, total_cost)
        ));
    }
}

fn write_top_services(page: &mut PageWriter, report: &CostReport) {
    let top = report.selected_month_costs.top_services(10);
    if top.is_empty() {
        return;
    }

    page.heading("Top Services by Cost");
    for service in top {
        page.bullet(&format!("{}: ${:.2}", service.service, service.amount));
    }
}

fn write_coverage(page: &mut PageWriter, title: &str, overview: &CoverageOverview) {
    page.heading(title);

    let Some(sample) = &overview.selected_month else {
        page.line("No data available for this period.");
        return;
    };

    page.line(&format!(
        "Coverage: {:.1}% ({})",
        sample.coverage_percentage,
        coverage_status(sample.coverage_percentage)
    ));
    page.line(&format!(
        "Utilization: {:.1}% ({})",
        sample.utilization_percentage,
        utilization_status(sample.utilization_percentage)
    ));
}

fn write_trend(page: &mut PageWriter, title: &str, overview: &CoverageOverview) {
    page.heading(title);

    let trend = &overview.trend;
    for i in 0..3 {
        page.bullet(&format!("{}: {:.1}%", trend.labels[i], trend.values[i]));
    }
    page.line(&format!(
        "Quarterly change: {:+.1}%  Direction: {}  Strength: {}",
        trend.quarterly_change, trend.direction, trend.strength
    ));
    page.line(&trend.summary);
}

fn write_savings(page: &mut PageWriter, report: &CostReport) {
    page.heading("Savings Summary");

    let savings = &report.savings;
    page.line(&format!(
        "Total monthly savings: ${:.2}",
        savings.total_savings
    ));
    for (name, amount) in savings.categories() {
        if should_display_savings_item(name, amount) {
            page.bullet(&format!(
                "{}: ${:.2} ({:.1}%)",
                name,
                amount,
                savings_percentage(amount, savings.total_savings)
            ));
        }
    }
    if !savings.errors.is_empty() {
        page.line("Collection errors:");
        for error in &savings.errors {
            page.bullet(error);
        }
    }
}

fn write_quarterly(page: &mut PageWriter, report: &CostReport) {
    page.heading("Quarterly Cost Summary");

    let quarterly = &report.quarterly;
    page.bullet(&format!(
        "{}: ${:.2}",
        report.short_labels[0], quarterly.selected_month_cost
    ));
    page.bullet(&format!(
        "{}: ${:.2}",
        report.short_labels[1], quarterly.month_minus_one_cost
    ));
    page.bullet(&format!(
        "{}: ${:.2}",
        report.short_labels[2], quarterly.month_minus_two_cost
    ));
    page.line(&format!(
        "Quarter total: ${:.2}",
        quarterly.quarterly_total_cost
    ));

    if quarterly.quarterly_total_cost > 0.0 {
        page.line(&format!(
            "Average monthly: ${:.2}",
            quarterly_average(quarterly.quarterly_total_cost)
        ));
        page.line(&format!(
            "Quarterly trend: {}",
            cost_trend_description(
                quarterly.month_minus_two_cost,
                quarterly.month_minus_one_cost,
                quarterly.selected_month_cost,
            )
        ));
    }

    page.line(&format!(
        "Month-over-month change: ${:.2} ({:+.1}%)",
        report.month_over_month.change, report.month_over_month.percentage
    ));
}

fn write_budget_anomalies(page: &mut PageWriter, report: &CostReport) {
    page.heading("Budget Anomalies");

    let anomalies = &report.budget_anomalies;
    page.line(&format!(
        "Budgets checked: {}  Anomalies found: {}  Threshold: {}%",
        anomalies.total_budgets_checked, anomalies.anomalies_found, anomalies.threshold_percentage
    ));

    if anomalies.anomalies.is_empty() {
        page.line("All budgets are within acceptable thresholds.");
    } else {
        for anomaly in &anomalies.anomalies {
            page.bullet(&format!(
                "{} [{}]: limit {} {:.2}, actual {} {:.2}, above target {} {:.2} ({:+.1}%)",
                anomaly.budget_name,
                anomaly.severity,
                anomaly.currency,
                anomaly.budget_limit,
                anomaly.currency,
                anomaly.actual_amount,
                anomaly.currency,
                anomaly.actual_above_target,
                anomaly.actual_above_target_percentage
            ));
        }
    }

    if !anomalies.errors.is_empty() {
        page.line("Budget analysis errors:");
        for error in &anomalies.errors {
            page.bullet(error);
        }
    }
}

fn write_warnings(page: &mut PageWriter, report: &CostReport) {
    if report.warnings.is_empty() {
        return;
    }

    page.heading("Data Collection Warnings");
    for warning in &report.warnings {
        page.bullet(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costrecon_core::analytics::budget::BudgetAnomalyReport;
    use costrecon_core::analytics::{analyze_trend, month_over_month, summarize_quarter, SavingsBreakdown};
    use costrecon_core::models::{CoverageSample, MonthlyCostReport, ServiceCost};
    use costrecon_core::BillingPeriod;

    fn sample_report() -> CostReport {
        let period = BillingPeriod {
            start: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        let labels = ["Jan 2024", "Feb 2024", "Mar 2024"];

        CostReport {
            month_label: "March 2024".to_string(),
            short_labels: [
                "Mar 2024".to_string(),
                "Feb 2024".to_string(),
                "Jan 2024".to_string(),
            ],
            period,
            selected_month_costs: MonthlyCostReport {
                period,
                services: vec![ServiceCost {
                    service: "Amazon Elastic Compute Cloud - Compute".to_string(),
                    amount: 123.45,
                }],
            },
            quarterly: summarize_quarter(150.0, 200.0, 100.0),
            month_over_month: month_over_month(150.0, 200.0),
            savings: SavingsBreakdown {
                savings_plans: 42.0,
                rds_reservations: 0.0,
                opensearch_reservations: 0.0,
                credit_savings: 8.0,
                total_savings: 50.0,
                errors: vec![],
            },
            savings_plan: CoverageOverview {
                selected_month: Some(CoverageSample {
                    coverage_percentage: 72.0,
                    utilization_percentage: 96.0,
                }),
                trend: analyze_trend([Some(60.0), Some(66.0), Some(72.0)], labels),
            },
            rds: CoverageOverview {
                selected_month: None,
                trend: analyze_trend([None, None, None], labels),
            },
            budget_anomalies: BudgetAnomalyReport::new(10.0),
            warnings: vec!["Cost data for Jan 2024: no data available".to_string()],
        }
    }

    #[test]
    fn test_write_report_produces_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        write_report(&sample_report(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 500, "PDF should not be empty");
        assert!(bytes.starts_with(b"%PDF"), "file should be a PDF");
    }
}
