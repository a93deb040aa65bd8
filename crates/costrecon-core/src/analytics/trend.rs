//! Quarterly trend analysis
//!
//! Derives direction, strength, and month-to-month deltas from three monthly
//! samples (oldest first). Missing months are recorded as 0.0 but excluded
//! from every delta computation, so a month with genuinely 0% coverage and a
//! month with no data never produce the same deltas.

use serde::Serialize;

/// Trend direction across the quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "Increasing"),
            TrendDirection::Decreasing => write!(f, "Decreasing"),
            TrendDirection::Stable => write!(f, "Stable"),
        }
    }
}

/// Trend strength, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    None,
    Minimal,
    Weak,
    Moderate,
    Strong,
}

impl TrendStrength {
    /// Lowercase label used inside summary sentences.
    pub fn label(&self) -> &'static str {
        match self {
            TrendStrength::None => "none",
            TrendStrength::Minimal => "minimal",
            TrendStrength::Weak => "weak",
            TrendStrength::Moderate => "moderate",
            TrendStrength::Strong => "strong",
        }
    }
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendStrength::None => write!(f, "None"),
            TrendStrength::Minimal => write!(f, "Minimal"),
            TrendStrength::Weak => write!(f, "Weak"),
            TrendStrength::Moderate => write!(f, "Moderate"),
            TrendStrength::Strong => write!(f, "Strong"),
        }
    }
}

/// Delta between two adjacent months that both have data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthChange {
    pub from: String,
    pub to: String,
    pub change: f64,
}

/// Derived trend over three monthly samples. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    /// Monthly values oldest first; missing months recorded as 0.0.
    pub values: [f64; 3],
    /// Month labels oldest first; missing months carry a " (No Data)" suffix.
    pub labels: [String; 3],
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// Newest minus oldest, only when both endpoints have data; else 0.0.
    pub quarterly_change: f64,
    /// Deltas for adjacent pairs where both months have data.
    pub month_to_month_changes: Vec<MonthChange>,
    /// Natural-language one-liner for report output.
    pub summary: String,
}

/// Magnitude below which a quarter counts as stable.
const STABLE_THRESHOLD: f64 = 2.0;
/// Magnitude above which a trend counts as moderate.
const MODERATE_THRESHOLD: f64 = 5.0;
/// Magnitude above which a trend counts as strong.
const STRONG_THRESHOLD: f64 = 10.0;

/// Analyze a three-month trend, oldest first.
///
/// `None` and non-positive values both count as "no data": they are recorded
/// as 0.0 in `values`, flagged in `labels`, and contribute no deltas. The
/// quarterly change only exists when both endpoints (oldest, newest) have
/// data; the middle month is irrelevant to it. With no usable endpoints the
/// result stays at its initial state (`Stable`/`None`/0.0) - callers that
/// need to tell this apart from a genuinely flat trend check the labels.
pub fn analyze_trend(values: [Option<f64>; 3], labels: [&str; 3]) -> TrendResult {
    let mut resolved = [0.0f64; 3];
    let mut present = [false; 3];
    for i in 0..3 {
        if let Some(v) = values[i] {
            if v > 0.0 {
                resolved[i] = v;
                present[i] = true;
            }
        }
    }

    let out_labels: [String; 3] = std::array::from_fn(|i| {
        if present[i] {
            labels[i].to_string()
        } else {
            format!("{} (No Data)", labels[i])
        }
    });

    let mut month_to_month_changes = Vec::new();
    for i in 0..2 {
        if present[i] && present[i + 1] {
            month_to_month_changes.push(MonthChange {
                from: labels[i].to_string(),
                to: labels[i + 1].to_string(),
                change: resolved[i + 1] - resolved[i],
            });
        }
    }

    let mut direction = TrendDirection::Stable;
    let mut strength = TrendStrength::None;
    let mut quarterly_change = 0.0;

    if present[0] && present[2] {
        quarterly_change = resolved[2] - resolved[0];
        let magnitude = quarterly_change.abs();

        if magnitude < STABLE_THRESHOLD {
            strength = TrendStrength::Minimal;
        } else {
            direction = if quarterly_change > 0.0 {
                TrendDirection::Increasing
            } else {
                TrendDirection::Decreasing
            };
            strength = if magnitude > STRONG_THRESHOLD {
                TrendStrength::Strong
            } else if magnitude > MODERATE_THRESHOLD {
                TrendStrength::Moderate
            } else {
                TrendStrength::Weak
            };
        }
    }

    let summary = summarize(direction, strength, quarterly_change);

    TrendResult {
        values: resolved,
        labels: out_labels,
        direction,
        strength,
        quarterly_change,
        month_to_month_changes,
        summary,
    }
}

fn summarize(direction: TrendDirection, strength: TrendStrength, change: f64) -> String {
    match direction {
        TrendDirection::Stable => format!(
            "Coverage remained stable over the last 3 months ({:+.1} point change).",
            change
        ),
        TrendDirection::Increasing => format!(
            "Coverage increased by {:.1} percentage points over the last 3 months ({} upward trend).",
            change.abs(),
            strength.label()
        ),
        TrendDirection::Decreasing => format!(
            "Coverage decreased by {:.1} percentage points over the last 3 months ({} downward trend).",
            change.abs(),
            strength.label()
        ),
    }
}
