use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{null_as_empty, InsuranceCoverage, PartyRef, PartyReferences, APPROVED_STATUS};

/// Authorization for a customer to turn units back in at a depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redelivery {
    pub redelivery_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depot: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<PartyRef>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_recipients: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: Vec<RedeliveryDetail>,
}

impl Redelivery {
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

    /// The detail a unit is turned in under, preferring one that names the unit.
    pub fn detail_for(
        &self,
        unit_number: &str,
        equipment: Option<&str>,
    ) -> Option<&RedeliveryDetail> {
        if let Some(detail) = self
            .details
            .iter()
            .find(|detail| detail.unit(unit_number).is_some())
        {
            return Some(detail);
        }

        self.details.iter().find(|detail| {
            detail.units.is_empty()
                && equipment.map_or(true, |code| detail.equipment.eq_ignore_ascii_case(code))
        })
    }

    pub fn served_by(&self, company_id: &str) -> bool {
        self.depot
            .as_ref()
            .is_some_and(|depot| depot.company_id == company_id)
    }
}

impl PartyReferences for Redelivery {
    fn party_refs_mut(&mut self) -> Vec<&mut PartyRef> {
        let mut refs: Vec<&mut PartyRef> = [&mut self.depot, &mut self.recipient, &mut self.owner]
            .into_iter()
            .flatten()
            .collect();
        for detail in &mut self.details {
            refs.push(&mut detail.customer);
            for unit in &mut detail.units {
                refs.extend(
                    [&mut unit.last_on_hire_location, &mut unit.billing_party]
                        .into_iter()
                        .flatten(),
                );
            }
        }
        refs
    }
}

/// Groups similar units on a redelivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeliveryDetail {
    pub customer: PartyRef,
    pub contract: String,
    pub equipment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_coverage: Option<InsuranceCoverage>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub units: Vec<RedeliveryUnit>,
}

impl RedeliveryDetail {
    pub fn unit(&self, unit_number: &str) -> Option<&RedeliveryUnit> {
        self.units
            .iter()
            .find(|unit| unit.unit_number.eq_ignore_ascii_case(unit_number))
    }

    /// Inspection standard for a unit: the unit's own criteria, then the detail grade.
    pub fn inspection_criteria_for(&self, unit_number: &str) -> Option<&str> {
        self.unit(unit_number)
            .and_then(|unit| unit.inspection_criteria.as_deref())
            .or(self.grade.as_deref())
    }
}

/// A specific unit expected back on a redelivery detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeliveryUnit {
    pub unit_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_on_hire_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_on_hire_location: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_party: Option<PartyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_bulletins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machinery: Option<MachineryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
}

/// Cooling machinery fitted to a reefer unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
}
