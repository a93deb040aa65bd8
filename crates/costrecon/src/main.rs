//! costrecon - AWS cost reconnaissance reports

mod console;
mod pdf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use std::path::PathBuf;

use costrecon_aws::CostExplorerSource;
use costrecon_core::{generate_report, ReportConfig, SelectedMonth};

#[derive(Parser)]
#[command(
    name = "costrecon",
    version,
    about = "AWS cost reconnaissance reports",
    long_about = "Fetches AWS cost, savings, and reservation-coverage data for a month\n\
                  and its two predecessors, aggregates it into comparable metrics\n\
                  (month-over-month change, quarterly trends, budget overages), and\n\
                  renders a console report plus a paginated PDF.\n\
                  \n\
                  Examples:\n\
                    costrecon --month jan                 # January of the current year\n\
                    costrecon --month january2024         # January 2024\n\
                    costrecon --month feb-2024            # February 2024\n\
                    costrecon -m dec --skip-pdf           # console report only\n\
                    costrecon                             # current month\n\
                  \n\
                  Environment Variables:\n\
                    AWS_PROFILE                           # credential profile\n\
                    RUST_LOG                              # tracing filter (default: costrecon=info)"
)]
struct Cli {
    /// Month for cost analysis (jan, feb, march, ...). May include a year
    /// (jan2024, feb-2024). Defaults to the current month.
    #[arg(long, short = 'm')]
    month: Option<String>,

    /// Output PDF filename
    #[arg(long, short = 'o', default_value = "cost_report.pdf")]
    output: PathBuf,

    /// AWS profile to use (default credential chain if not specified)
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// AWS region
    #[arg(long, default_value = "eu-west-1")]
    region: String,

    /// Budget anomaly threshold, percent above the budget limit
    #[arg(long, default_value_t = 10.0)]
    threshold: f64,

    /// Skip PDF generation, print the console report only
    #[arg(long)]
    skip_pdf: bool,

    /// Dump the aggregated report as JSON instead of the console report
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("costrecon=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let today = chrono::Local::now().date_naive();
    let month = match &cli.month {
        Some(input) => SelectedMonth::parse(input, today.year())?,
        None => SelectedMonth::current(today),
    };

    let config = ReportConfig {
        region: cli.region.clone(),
        profile: cli.profile.clone(),
        budget_threshold_pct: cli.threshold,
        ..ReportConfig::default()
    };

    let period = month.period();
    println!("Generating cost report for {}", month.label());
    println!("Period: {} to {}", period.start, period.end);

    let source = CostExplorerSource::connect(&config)
        .await
        .context("Failed to initialize AWS clients")?;

    let report = generate_report(&source, &config, month)
        .await
        .context("Failed to generate cost report")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    console::print_report(&report);

    if !cli.skip_pdf {
        pdf::write_report(&report, &cli.output)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        println!("Report written to {}", cli.output.display());
    }

    Ok(())
}
