//! Plain data structures for the depot lifecycle contract.
//!
//! JSON conventions shared by every record:
//! - optional scalars are `Option<T>`; `null` and an absent property mean the same thing;
//! - free-text lists are `Option<Vec<String>>`; `null`/absent is `None`, `[]` is "explicitly none";
//! - owned child collections are plain `Vec<T>`; `null`/absent deserialize to an empty vector.

pub mod estimate;
pub mod gate;
pub mod insurance;
pub mod party;
pub mod redelivery;
pub mod release;
pub mod work_order;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub use estimate::{
    AllocationTotal, Estimate, EstimateAllocation, EstimateCustomerApproval, EstimateLineItem,
    EstimateLineItemPart, EstimatePhoto, PreliminaryDecision, Recommendation, Responsibility,
};
pub use gate::{
    GateCreateRequest, GatePhoto, GateResponse, GateStatus, GateType, GateUpdateRequest,
    PhotoStatus, Transportation, UnitCondition,
};
pub use insurance::InsuranceCoverage;
pub use party::{Party, PartyRef};
pub use redelivery::{MachineryInfo, Redelivery, RedeliveryDetail, RedeliveryUnit};
pub use release::{Comparison, Release, ReleaseDetail, ReleaseDetailCriteria, ReleaseUnit};
pub use work_order::{RepairComplete, WorkOrder, WorkOrderUnit};

/// Status used by lessors to mark an authorization as usable at the gate.
pub const APPROVED_STATUS: &str = "APPROVED";

/// The 14 upgrade indicators a release or redelivery detail may carry.
pub const UPGRADE_TYPES: [&str; 14] = [
    "FG", "ML", "DB", "EV", "WH", "SU", "CF", "TB", "MC", "MP", "AM", "CH", "TE", "FT",
];

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{:06}"), self.0)
            }
        }
    };
}

record_id!(
    /// Server-assigned identity of a registered party.
    PartyId,
    "party"
);
record_id!(
    /// Server-assigned identity of a stored release aggregate.
    ReleaseId,
    "release"
);
record_id!(
    /// Server-assigned identity of a stored redelivery aggregate.
    RedeliveryId,
    "redelivery"
);
record_id!(
    /// Server-assigned identity of a recorded gate movement.
    GateId,
    "gate"
);
record_id!(
    /// Server-assigned identity of an estimate; doubles as the allocation id for photo uploads.
    EstimateId,
    "estimate"
);
record_id!(
    /// Server-assigned identity of a stored work order.
    WorkOrderId,
    "work-order"
);

/// Records that point at parties by shared reference.
///
/// The lifecycle service walks these handles to swap request copies for the registered party.
pub trait PartyReferences {
    fn party_refs_mut(&mut self) -> Vec<&mut PartyRef>;
}

/// Deserialize an owned child collection, treating `null` like an absent property.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Borrow a free-text list, yielding an empty slice when it was not provided.
pub fn list_or_empty(list: &Option<Vec<String>>) -> &[String] {
    list.as_deref().unwrap_or(&[])
}
