use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coverage terms a lessee bought for damage repairs on a redelivered unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCoverage {
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_covered: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_currency: Option<String>,
    #[serde(rename = "appliesToCTL", skip_serializing_if = "Option::is_none")]
    pub applies_to_ctl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_or_nothing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusions: Option<Vec<String>>,
}

impl InsuranceCoverage {
    /// Portion of `damage` the coverage pays for.
    ///
    /// All-or-nothing coverage pays nothing once the damage exceeds the covered amount.
    pub fn covered_portion(&self, damage: Decimal) -> Decimal {
        let Some(limit) = self.amount_covered else {
            return Decimal::ZERO;
        };
        if damage <= limit {
            damage
        } else if self.all_or_nothing.unwrap_or(false) {
            Decimal::ZERO
        } else {
            limit
        }
    }
}
