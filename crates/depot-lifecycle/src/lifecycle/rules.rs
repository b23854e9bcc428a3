use rust_decimal::Decimal;

use crate::domain::GateType;

/// Business rule a well-formed request broke; answered with `405` and a stable code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BusinessViolation {
    #[error("party {company_id} is not registered")]
    UnknownParty { company_id: String },
    #[error("{kind} {number} already exists")]
    Duplicate { kind: &'static str, number: String },
    #[error("estimate {number} already exists; submit a revision instead")]
    DuplicateEstimate { number: String },
    #[error("gate {} for {unit_number} under {advice_number} was already recorded", .gate_type.label())]
    DuplicateGate {
        advice_number: String,
        unit_number: String,
        gate_type: GateType,
    },
    #[error("no approved {kind} {advice_number} covers {unit_number}")]
    NoAuthorization {
        kind: &'static str,
        advice_number: String,
        unit_number: String,
    },
    #[error("{advice_number} is not addressed to depot {depot}")]
    WrongDepot {
        advice_number: String,
        depot: String,
    },
    #[error("{advice_number} has no units left ({quantity} authorized)")]
    QuantityExhausted { advice_number: String, quantity: u32 },
    #[error("{unit_number} has not been gated in at depot {depot}")]
    NotGatedIn { unit_number: String, depot: String },
    #[error("revision {submitted} of estimate {number} must be greater than {current}")]
    RevisionNotIncreasing {
        number: String,
        current: u32,
        submitted: u32,
    },
    #[error("estimate {number} is already approved by the customer")]
    EstimateApproved { number: String },
    #[error("approval total {submitted} does not match the customer total {expected} of estimate {number}")]
    ApprovalMismatch {
        number: String,
        expected: Decimal,
        submitted: Decimal,
    },
    #[error("estimate {estimate_number} does not exist")]
    UnknownEstimate { estimate_number: String },
    #[error("estimate {estimate_number} was written for {estimate_unit}, not {unit_number}")]
    EstimateUnitMismatch {
        estimate_number: String,
        estimate_unit: String,
        unit_number: String,
    },
    #[error("{unit_number} is not on work order {work_order_number}")]
    UnitNotOnWorkOrder {
        work_order_number: String,
        unit_number: String,
    },
    #[error("repair of {unit_number} on work order {work_order_number} was already completed")]
    RepairAlreadyComplete {
        work_order_number: String,
        unit_number: String,
    },
    /// Every rule one request broke, reported together.
    #[error("{} business rules were broken", .0.len())]
    Several(Vec<BusinessViolation>),
}

impl BusinessViolation {
    /// Response code matching `^[A-Z0-9]{3}[0-9]{3}$`.
    pub fn code(&self) -> &'static str {
        match self {
            BusinessViolation::UnknownParty { .. } => "PTY405",
            BusinessViolation::Duplicate { .. } => "DUP405",
            BusinessViolation::DuplicateEstimate { .. } => "EST405",
            BusinessViolation::DuplicateGate { .. } => "GTE405",
            BusinessViolation::NoAuthorization { .. } => "ADV405",
            BusinessViolation::WrongDepot { .. } => "DPT405",
            BusinessViolation::QuantityExhausted { .. } => "QTY405",
            BusinessViolation::NotGatedIn { .. } => "GIN405",
            BusinessViolation::RevisionNotIncreasing { .. } => "REV405",
            BusinessViolation::EstimateApproved { .. }
            | BusinessViolation::ApprovalMismatch { .. } => "APR405",
            BusinessViolation::UnknownEstimate { .. }
            | BusinessViolation::EstimateUnitMismatch { .. } => "WOE405",
            BusinessViolation::UnitNotOnWorkOrder { .. } => "WOU405",
            BusinessViolation::RepairAlreadyComplete { .. } => "RPC405",
            BusinessViolation::Several(violations) => violations
                .first()
                .map_or("BUS405", BusinessViolation::code),
        }
    }

    /// A single violation stays as is; more than one becomes [`BusinessViolation::Several`].
    pub fn from_all(mut violations: Vec<BusinessViolation>) -> Option<Self> {
        match violations.len() {
            0 => None,
            1 => violations.pop(),
            _ => Some(BusinessViolation::Several(violations)),
        }
    }

    /// One message per broken rule, listed in the error response.
    pub fn details(&self) -> Vec<String> {
        match self {
            BusinessViolation::Several(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}
