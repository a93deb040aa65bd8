//! Coverage and utilization queries

use aws_sdk_costexplorer::error::ProvideErrorMetadata;
use aws_sdk_costexplorer::types::{Dimension, DimensionValues, Expression};

use costrecon_core::models::{CoverageSample, ReservationCoverage, ReservationUtilization};
use costrecon_core::{BillingPeriod, ReservedService, SourceResult};

use crate::{date_interval, map_api_error, parse_f64, CostExplorerSource};

/// SERVICE dimension filter for reservation queries.
pub(crate) fn service_filter(service: ReservedService) -> Expression {
    Expression::builder()
        .dimensions(
            DimensionValues::builder()
                .key(Dimension::Service)
                .values(service.dimension_value())
                .build(),
        )
        .build()
}

impl CostExplorerSource {
    /// Savings Plans coverage/utilization snapshot for one period.
    ///
    /// Coverage and utilization live on separate endpoints; both percentages
    /// are averaged across the returned sub-periods. Zero coverage rows mean
    /// the period has no Savings Plans data at all.
    pub(crate) async fn fetch_savings_plan_coverage(
        &self,
        period: BillingPeriod,
    ) -> SourceResult<Option<CoverageSample>> {
        let response = self
            .ce
            .get_savings_plans_coverage()
            .time_period(date_interval(period)?)
            .granularity(self.sdk_granularity())
            .send()
            .await
            .map_err(|err| map_api_error(&err, "savings plan coverage"))?;

        let coverages = response.savings_plans_coverages();
        if coverages.is_empty() {
            return Ok(None);
        }

        let total: f64 = coverages
            .iter()
            .map(|entry| parse_f64(entry.coverage().and_then(|c| c.coverage_percentage())))
            .sum();
        let coverage_percentage = total / coverages.len() as f64;

        let utilization_percentage = self
            .fetch_savings_plan_utilization(period)
            .await?
            .map(|u| u.utilization_percentage)
            .unwrap_or(0.0);

        Ok(Some(CoverageSample {
            coverage_percentage,
            utilization_percentage,
        }))
    }

    /// Reservation coverage for one period, filtered to one service family.
    pub(crate) async fn fetch_reservation_coverage(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationCoverage>> {
        let response = self
            .ce
            .get_reservation_coverage()
            .time_period(date_interval(period)?)
            .filter(service_filter(service))
            .granularity(self.sdk_granularity())
            .send()
            .await
            .map_err(|err| map_api_error(&err, "reservation coverage"))?;

        let by_time = response.coverages_by_time();
        if by_time.is_empty() {
            return Ok(None);
        }

        let total_hours: f64 = by_time
            .iter()
            .map(|entry| {
                parse_f64(
                    entry
                        .total()
                        .and_then(|c| c.coverage_hours())
                        .and_then(|h| h.coverage_hours_percentage()),
                )
            })
            .sum();

        Ok(Some(ReservationCoverage {
            hours_coverage_percentage: total_hours / by_time.len() as f64,
            // The API reports on-demand cost only, no cost-coverage percentage.
            cost_coverage_percentage: 0.0,
        }))
    }

    /// Reservation utilization for one period, filtered to one service
    /// family. A ValidationException means no reservations of that type
    /// exist; that is data absence, not an error.
    pub(crate) async fn fetch_reservation_utilization(
        &self,
        period: BillingPeriod,
        service: ReservedService,
    ) -> SourceResult<Option<ReservationUtilization>> {
        let response = match self
            .ce
            .get_reservation_utilization()
            .time_period(date_interval(period)?)
            .filter(service_filter(service))
            .granularity(self.sdk_granularity())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                if err.code() == Some("ValidationException") {
                    tracing::debug!(service = service.display_name(), "no reservations found");
                    return Ok(None);
                }
                return Err(map_api_error(&err, "reservation utilization"));
            }
        };

        let by_time = response.utilizations_by_time();
        if by_time.is_empty() {
            return Ok(None);
        }

        let mut total_utilization = 0.0;
        let mut net_savings = 0.0;
        for entry in by_time {
            let Some(aggregates) = entry.total() else {
                continue;
            };
            total_utilization += parse_f64(aggregates.utilization_percentage());
            net_savings += parse_f64(aggregates.net_ri_savings());
        }

        Ok(Some(ReservationUtilization {
            utilization_percentage: total_utilization / by_time.len() as f64,
            net_savings,
        }))
    }
}
