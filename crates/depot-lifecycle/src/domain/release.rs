use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{null_as_empty, PartyRef, PartyReferences, APPROVED_STATUS};

/// Authorization to lease units out to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub release_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depot: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<PartyRef>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: Vec<ReleaseDetail>,
}

impl Release {
    /// Approved and not yet expired at `now`.
    pub fn is_active(&self, now: DateTime<FixedOffset>) -> bool {
        let approved = self
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case(APPROVED_STATUS));
        let unexpired = self.expiration_date.map_or(true, |expires| expires >= now);
        approved && unexpired
    }

    pub fn contains_unit(&self, unit_number: &str) -> bool {
        self.details
            .iter()
            .any(|detail| detail.unit(unit_number).is_some())
    }

    /// The detail a unit would be released under: a detail naming it, otherwise a blanket
    /// detail whose equipment matches (or any blanket detail when the equipment is unknown).
    pub fn detail_for(&self, unit_number: &str, equipment: Option<&str>) -> Option<&ReleaseDetail> {
        if let Some(detail) = self
            .details
            .iter()
            .find(|detail| detail.unit(unit_number).is_some())
        {
            return Some(detail);
        }

        self.details.iter().find(|detail| {
            detail.is_blanket()
                && equipment.map_or(true, |code| detail.equipment.eq_ignore_ascii_case(code))
        })
    }

    pub fn served_by(&self, company_id: &str) -> bool {
        self.depot
            .as_ref()
            .is_some_and(|depot| depot.company_id == company_id)
    }
}

impl PartyReferences for Release {
    fn party_refs_mut(&mut self) -> Vec<&mut PartyRef> {
        let mut refs: Vec<&mut PartyRef> = [&mut self.depot, &mut self.owner, &mut self.recipient]
            .into_iter()
            .flatten()
            .collect();
        refs.extend(self.details.iter_mut().map(|detail| &mut detail.customer));
        refs
    }
}

/// Groups similar units on a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDetail {
    pub customer: PartyRef,
    pub contract: String,
    pub equipment: String,
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_type: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_trip_inspection_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_temperature: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ventilation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub units: Vec<ReleaseUnit>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub criteria: Vec<ReleaseDetailCriteria>,
}

impl ReleaseDetail {
    /// A detail without named units accepts any matching unit up to its quantity.
    pub fn is_blanket(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit(&self, unit_number: &str) -> Option<&ReleaseUnit> {
        self.units
            .iter()
            .find(|unit| unit.unit_number.eq_ignore_ascii_case(unit_number))
    }
}

/// A specific unit named on a release detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseUnit {
    pub unit_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
}

/// Extra restriction on units that may be released under a detail, i.e. manufacture year <= 2003.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDetailCriteria {
    pub attribute: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub const CODES: [&'static str; 6] = ["EQ", "NE", "LT", "LE", "GT", "GE"];
}
