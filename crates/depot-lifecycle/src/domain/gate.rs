use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_empty, InsuranceCoverage, PartyRef, PartyReferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    In,
    Out,
}

impl GateType {
    pub const CODES: [&'static str; 2] = ["IN", "OUT"];

    pub const fn label(self) -> &'static str {
        match self {
            GateType::In => "IN",
            GateType::Out => "OUT",
        }
    }
}

/// Damage status reported when a unit passes the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitCondition {
    /// Available / sound.
    #[serde(rename = "AV")]
    Available,
    #[serde(rename = "DM")]
    Damaged,
}

impl UnitCondition {
    pub const CODES: [&'static str; 2] = ["AV", "DM"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transportation {
    Truck,
    Rail,
    Vessel,
    Barge,
}

impl Transportation {
    pub const CODES: [&'static str; 4] = ["TRUCK", "RAIL", "VESSEL", "BARGE"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhotoStatus {
    #[default]
    Before,
    After,
}

impl PhotoStatus {
    pub const CODES: [&'static str; 2] = ["BEFORE", "AFTER"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatePhoto {
    pub url: String,
    #[serde(default)]
    pub status: PhotoStatus,
}

/// A depot reporting a unit entering or leaving its facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateCreateRequest {
    pub advice_number: String,
    pub depot: PartyRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<PartyRef>,
    #[serde(rename = "type")]
    pub gate_type: GateType,
    pub unit_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    pub status: UnitCondition,
    pub activity_time: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transportation: Option<Transportation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<GatePhoto>,
}

impl PartyReferences for GateCreateRequest {
    fn party_refs_mut(&mut self) -> Vec<&mut PartyRef> {
        let mut refs = vec![&mut self.depot];
        refs.extend(self.customer.as_mut());
        refs
    }
}

/// Corrections to a previously reported gate movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateUpdateRequest {
    pub advice_number: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub gate_type: Option<GateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    /// `Some(vec![])` removes every recorded photo; `None` keeps them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<GatePhoto>>,
}

/// Latest known gate movement of a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStatus {
    pub advice_number: String,
    pub unit_number: String,
    #[serde(rename = "type")]
    pub gate_type: GateType,
    pub status: UnitCondition,
    pub activity_time: DateTime<FixedOffset>,
    pub depot: PartyRef,
}

/// Confirmation of a gate movement plus what a depot needs to write a damage estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub advice_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_coverage: Option<InsuranceCoverage>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_exchange_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    pub current_inspection_criteria: String,
}
