//! Credit savings records

use serde::Serialize;

/// One credit line item (service + usage type) for a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditItem {
    pub service: String,
    pub usage_type: String,
    pub amount: f64,
}

/// Credits applied over a billing period. Amounts are absolute values; the
/// billing API reports credits as negative costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditSavings {
    pub total: f64,
    pub items: Vec<CreditItem>,
}

impl CreditSavings {
    pub fn empty() -> Self {
        Self {
            total: 0.0,
            items: Vec::new(),
        }
    }
}
