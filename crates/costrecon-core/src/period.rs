//! Billing periods and month selection
//!
//! Parses the CLI month selector (bare month names or month+year combos) and
//! derives the three trailing billing periods a report covers, along with
//! their display labels.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::ReportError;

/// Month names accepted by the CLI selector, mapped to month numbers.
const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, num)| *num)
}

fn available_months() -> String {
    let mut names: Vec<&str> = MONTH_NAMES.iter().map(|(n, _)| *n).collect();
    names.sort_unstable();
    names.join(", ")
}

/// One billing period `[start, end)`, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// The calendar month starting at `year`/`month`.
    pub fn month_of(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?;
        Some(Self { start, end })
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// The month a report is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectedMonth {
    pub year: i32,
    pub month: u32,
}

impl SelectedMonth {
    /// Parse a CLI month selector: `jan`, `january`, `jan2024`, `feb-2024`,
    /// `mar 2024`. Bare names use `default_year`.
    pub fn parse(input: &str, default_year: i32) -> Result<Self, ReportError> {
        let cleaned = input.trim().to_lowercase();
        if cleaned.is_empty() {
            return Err(ReportError::InvalidMonth {
                input: input.to_string(),
                reason: "empty month selector".to_string(),
            });
        }

        let (name, year) = match cleaned.find(|c: char| c.is_ascii_digit()) {
            Some(0) => {
                return Err(ReportError::InvalidMonth {
                    input: input.to_string(),
                    reason: format!("expected a month name, available: {}", available_months()),
                });
            }
            Some(idx) => {
                let (name_part, year_part) = cleaned.split_at(idx);
                let year = year_part.trim().parse::<i32>().map_err(|_| {
                    ReportError::InvalidMonth {
                        input: input.to_string(),
                        reason: format!("unrecognized year '{}'", year_part.trim()),
                    }
                })?;
                (name_part.trim_end_matches(&['-', ' ', '_'][..]), year)
            }
            None => (
                cleaned.trim_end_matches(&['-', ' ', '_'][..]),
                default_year,
            ),
        };

        let month = month_number(name).ok_or_else(|| ReportError::InvalidMonth {
            input: input.to_string(),
            reason: format!(
                "unknown month '{}', available: {}",
                name,
                available_months()
            ),
        })?;

        if BillingPeriod::month_of(year, month).is_none() {
            return Err(ReportError::InvalidMonth {
                input: input.to_string(),
                reason: format!("year {} is out of range", year),
            });
        }

        Ok(Self { year, month })
    }

    /// The month containing `today`.
    pub fn current(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The month `n` months before this one.
    pub fn months_back(&self, n: u32) -> Self {
        let date = self
            .first_day()
            .checked_sub_months(Months::new(n))
            .unwrap_or_else(|| self.first_day());
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Billing period for this month, end exclusive.
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::month_of(self.year, self.month).unwrap_or(BillingPeriod {
            start: self.first_day(),
            end: self.first_day(),
        })
    }

    /// Full label, e.g. "January 2024".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Short label, e.g. "Jan 2024".
    pub fn short_label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }
}
