use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_empty, EstimateId, PartyRef, PartyReferences, PhotoStatus};

/// Party a line item is billed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Responsibility {
    #[serde(rename = "O")]
    Owner,
    /// The lessee / user of the unit.
    #[serde(rename = "U")]
    Customer,
    #[serde(rename = "I")]
    Insurance,
    #[serde(rename = "D")]
    Depot,
    #[serde(rename = "S")]
    Special,
    #[serde(rename = "X")]
    ThirdParty,
}

impl Responsibility {
    pub const CODES: [&'static str; 6] = ["O", "U", "I", "D", "S", "X"];
}

/// A damage or upgrade estimate written by a depot after turn-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub estimate_number: String,
    #[serde(default)]
    pub revision: u32,
    pub depot: PartyRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<PartyRef>,
    pub unit_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    pub estimate_time: DateTime<FixedOffset>,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub labour_rate: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub depreciated_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<EstimateLineItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<EstimatePhoto>,
}

impl PartyReferences for Estimate {
    fn party_refs_mut(&mut self) -> Vec<&mut PartyRef> {
        let mut refs = vec![&mut self.depot];
        refs.extend([&mut self.customer, &mut self.owner].into_iter().flatten());
        refs
    }
}

/// A single damage/repair line on an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLineItem {
    pub line_number: u32,
    pub damage_location_code: String,
    pub component_code: String,
    pub damage_code: String,
    pub repair_code: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub length: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    pub hours: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub material: Option<Decimal>,
    pub responsibility: Responsibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parts: Vec<EstimateLineItemPart>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<EstimatePhoto>,
}

impl EstimateLineItem {
    /// Number of repairs the line covers; absent means one.
    pub fn repair_quantity(&self) -> Decimal {
        Decimal::from(self.quantity.unwrap_or(1))
    }

    /// `None` when the amount leaves the decimal range.
    pub fn labour_cost(&self, labour_rate: Decimal) -> Option<Decimal> {
        self.hours
            .checked_mul(labour_rate)?
            .checked_mul(self.repair_quantity())
    }

    pub fn material_cost(&self) -> Option<Decimal> {
        self.parts
            .iter()
            .try_fold(self.material.unwrap_or(Decimal::ZERO), |total, part| {
                total.checked_add(part.cost()?)
            })
    }
}

/// A part used for the repair of a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLineItemPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub number: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl EstimateLineItemPart {
    pub fn cost(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatePhoto {
    pub url: String,
    #[serde(default)]
    pub status: PhotoStatus,
}

/// Estimate totals per billed party, returned after an estimate is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateAllocation {
    pub id: EstimateId,
    pub estimate_number: String,
    pub revision: u32,
    pub currency: String,
    pub allocations: Vec<AllocationTotal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preliminary_decision: Option<PreliminaryDecision>,
}

impl EstimateAllocation {
    pub fn total_for(&self, party: Responsibility) -> Decimal {
        self.allocations
            .iter()
            .find(|entry| entry.party_type == party)
            .map_or(Decimal::ZERO, |entry| entry.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTotal {
    pub party_type: Responsibility,
    #[serde(with = "rust_decimal::serde::float")]
    pub labour: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub material: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Fix,
    /// Constructive total loss.
    Ctl,
}

/// Early recommendation whether repairing the unit makes economic sense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreliminaryDecision {
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A customer accepting their share of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateCustomerApproval {
    pub approval_number: String,
    pub approval_time: DateTime<FixedOffset>,
    #[serde(with = "rust_decimal::serde::float")]
    pub approval_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
}
