use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{null_as_empty, PartyRef, PartyReferences};

/// Estimates approved for repair, grouped for a depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub work_order_number: String,
    pub depot: PartyRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub units: Vec<WorkOrderUnit>,
}

impl WorkOrder {
    pub fn unit_mut(&mut self, unit_number: &str) -> Option<&mut WorkOrderUnit> {
        self.units
            .iter_mut()
            .find(|unit| unit.unit_number.eq_ignore_ascii_case(unit_number))
    }
}

impl PartyReferences for WorkOrder {
    fn party_refs_mut(&mut self) -> Vec<&mut PartyRef> {
        vec![&mut self.depot]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderUnit {
    pub unit_number: String,
    pub estimate_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    /// Set by the server when the depot reports the repair complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_complete_time: Option<DateTime<FixedOffset>>,
}

/// A depot reporting a unit repaired under a work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairComplete {
    pub unit_number: String,
    pub completion_time: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
}
