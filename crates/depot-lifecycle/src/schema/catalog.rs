//! Field-level contract of every documented body, mirroring the published OpenAPI models.

use super::{FieldKind, FieldSchema, ObjectSchema};
use crate::domain::{
    Comparison, GateType, PhotoStatus, Responsibility, Transportation, UnitCondition,
    UPGRADE_TYPES,
};

pub const BIC_FACILITY_CODE: &str = "^[A-Z0-9]{9}$";
pub const CURRENCY_CODE: &str = "^[A-Z]{3}$";
pub const COUNTRY_CODE: &str = "^[A-Z]{2}$";
/// ISO 6346 owner code, category identifier, serial number and check digit.
pub const UNIT_NUMBER: &str = "^[A-Z]{4}[0-9]{7}$";
pub const RESPONSE_CODE: &str = "^[A-Z0-9]{3}[0-9]{3}$";

const RECOMMENDATIONS: [&str; 2] = ["FIX", "CTL"];

static STRING_ITEM: FieldKind = FieldKind::Text(super::TextRules {
    min_length: None,
    max_length: None,
    pattern: None,
    allowed: &[],
});
static EMAIL_ITEM: FieldKind = FieldKind::text(250);

static RELEASE_UNIT_ITEM: FieldKind = FieldKind::Object {
    schema: &RELEASE_UNIT,
};
static RELEASE_CRITERIA_ITEM: FieldKind = FieldKind::Object {
    schema: &RELEASE_DETAIL_CRITERIA,
};
static RELEASE_DETAIL_ITEM: FieldKind = FieldKind::Object {
    schema: &RELEASE_DETAIL,
};
static REDELIVERY_UNIT_ITEM: FieldKind = FieldKind::Object {
    schema: &REDELIVERY_UNIT,
};
static REDELIVERY_DETAIL_ITEM: FieldKind = FieldKind::Object {
    schema: &REDELIVERY_DETAIL,
};
static GATE_PHOTO_ITEM: FieldKind = FieldKind::Object { schema: &GATE_PHOTO };
static ESTIMATE_PHOTO_ITEM: FieldKind = FieldKind::Object {
    schema: &ESTIMATE_PHOTO,
};
static LINE_ITEM_PART_ITEM: FieldKind = FieldKind::Object {
    schema: &ESTIMATE_LINE_ITEM_PART,
};
static LINE_ITEM_ITEM: FieldKind = FieldKind::Object {
    schema: &ESTIMATE_LINE_ITEM,
};
static ALLOCATION_TOTAL_ITEM: FieldKind = FieldKind::Object {
    schema: &ALLOCATION_TOTAL,
};
static WORK_ORDER_UNIT_ITEM: FieldKind = FieldKind::Object {
    schema: &WORK_ORDER_UNIT,
};

pub static PARTY: ObjectSchema = ObjectSchema {
    name: "Party",
    description: "identifies a depot, lessor or customer",
    fields: &[
        FieldSchema::required("companyId", FieldKind::pattern(BIC_FACILITY_CODE, 9))
            .describe("the BIC facility code of the party"),
        FieldSchema::optional("code", FieldKind::text(10)),
        FieldSchema::optional("name", FieldKind::text(100)),
        FieldSchema::optional("userCode", FieldKind::text(10))
            .describe("code of the user acting for the party"),
        FieldSchema::optional("userName", FieldKind::text(100)),
        FieldSchema::optional("email", FieldKind::text(250)),
        FieldSchema::optional("phone", FieldKind::text(30)),
        FieldSchema::optional("faxNumber", FieldKind::text(30)),
        FieldSchema::optional("streetAddress", FieldKind::text(250)),
        FieldSchema::optional("streetAddress2", FieldKind::text(250)),
        FieldSchema::optional("city", FieldKind::text(100)),
        FieldSchema::optional("postalCode", FieldKind::text(20)),
        FieldSchema::optional("countryCode", FieldKind::pattern(COUNTRY_CODE, 2)),
        FieldSchema::optional("latitude", FieldKind::Decimal { minimum: Some(-90.0) }),
        FieldSchema::optional("longitude", FieldKind::Decimal { minimum: Some(-180.0) }),
    ],
};

pub static INSURANCE_COVERAGE: ObjectSchema = ObjectSchema {
    name: "InsuranceCoverage",
    description: "describes the type of insurance coverage a given shipping container has for a damage repair",
    fields: &[
        FieldSchema::optional("amountCovered", FieldKind::non_negative_decimal())
            .describe("the total amount allowable to by covered by insurance"),
        FieldSchema::optional("amountCurrency", FieldKind::pattern(CURRENCY_CODE, 3))
            .describe("the currency for the insurance coverage amount"),
        FieldSchema::optional("appliesToCTL", FieldKind::Boolean)
            .describe("whether the coverage applies when damage exceeds the depreciated value"),
        FieldSchema::optional("allOrNothing", FieldKind::Boolean)
            .describe("whether the lessee is fully responsible once damage exceeds the coverage"),
        FieldSchema::optional("exceptions", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("exclusions", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("inclusions", FieldKind::array(&STRING_ITEM)),
    ],
};

pub static MACHINERY_INFO: ObjectSchema = ObjectSchema {
    name: "MachineryInfo",
    description: "details the cooling machinery attached to a shipping container",
    fields: &[
        FieldSchema::optional("manufacturer", FieldKind::text(50)),
        FieldSchema::optional("modelName", FieldKind::text(50)),
        FieldSchema::optional("modelNumber", FieldKind::text(50)),
    ],
};

pub static RELEASE_UNIT: ObjectSchema = ObjectSchema {
    name: "ReleaseUnit",
    description: "a specific shipping container on a release detail",
    fields: &[
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::optional("status", FieldKind::text(10)),
        FieldSchema::optional("manufactureDate", FieldKind::Date),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
    ],
};

pub static RELEASE_DETAIL_CRITERIA: ObjectSchema = ObjectSchema {
    name: "ReleaseDetailCriteria",
    description: "additional criteria beyond the required properties of a detail to further restrict units",
    fields: &[
        FieldSchema::required("attribute", FieldKind::text(35)),
        FieldSchema::optional("comparison", FieldKind::one_of(&Comparison::CODES)),
        FieldSchema::required("value", FieldKind::text(100)),
    ],
};

pub static RELEASE_DETAIL: ObjectSchema = ObjectSchema {
    name: "ReleaseDetail",
    description: "groups similar units on a release",
    fields: &[
        FieldSchema::required("customer", FieldKind::Object { schema: &PARTY }),
        FieldSchema::required("contract", FieldKind::text(16)),
        FieldSchema::required("equipment", FieldKind::text(10))
            .describe("the equipment type ISO code"),
        FieldSchema::required("grade", FieldKind::text(10)),
        FieldSchema::optional("upgradeType", FieldKind::one_of(&UPGRADE_TYPES)),
        FieldSchema::required("quantity", FieldKind::non_negative_integer()),
        FieldSchema::optional("preTripInspectionRequired", FieldKind::Boolean),
        FieldSchema::optional("desiredTemperature", FieldKind::Integer { minimum: None }),
        FieldSchema::optional("ventilation", FieldKind::text(10)),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("units", FieldKind::array(&RELEASE_UNIT_ITEM)),
        FieldSchema::optional("criteria", FieldKind::array(&RELEASE_CRITERIA_ITEM)),
    ],
};

pub static RELEASE: ObjectSchema = ObjectSchema {
    name: "Release",
    description: "approval to lease shipping containers out to a customer",
    fields: &[
        FieldSchema::required("releaseNumber", FieldKind::text(16)),
        FieldSchema::optional("status", FieldKind::text(10)),
        FieldSchema::optional("type", FieldKind::text(10)),
        FieldSchema::optional("approvalDate", FieldKind::DateTime),
        FieldSchema::optional("expirationDate", FieldKind::DateTime),
        FieldSchema::optional("depot", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("owner", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("recipient", FieldKind::Object { schema: &PARTY }),
        FieldSchema::required("quantity", FieldKind::non_negative_integer()),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("details", FieldKind::array(&RELEASE_DETAIL_ITEM)),
    ],
};

pub static REDELIVERY_UNIT: ObjectSchema = ObjectSchema {
    name: "RedeliveryUnit",
    description: "a specific shipping container expected back on a redelivery detail",
    fields: &[
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::optional("manufactureDate", FieldKind::Date),
        FieldSchema::optional("lastOnHireDate", FieldKind::Date),
        FieldSchema::optional("lastOnHireLocation", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("billingParty", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("inspectionCriteria", FieldKind::text(10)),
        FieldSchema::optional("status", FieldKind::text(10)),
        FieldSchema::optional("cargoNumber", FieldKind::text(10))
            .describe("identifies the last cargo by UN or another standard number"),
        FieldSchema::optional("technicalBulletins", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("machinery", FieldKind::Object { schema: &MACHINERY_INFO }),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
    ],
};

pub static REDELIVERY_DETAIL: ObjectSchema = ObjectSchema {
    name: "RedeliveryDetail",
    description: "groups similar units on a redelivery",
    fields: &[
        FieldSchema::required("customer", FieldKind::Object { schema: &PARTY }),
        FieldSchema::required("contract", FieldKind::text(16)),
        FieldSchema::required("equipment", FieldKind::text(10)),
        FieldSchema::optional("grade", FieldKind::text(10)),
        FieldSchema::optional("upgradeType", FieldKind::one_of(&UPGRADE_TYPES)),
        FieldSchema::optional("insuranceCoverage", FieldKind::Object {
            schema: &INSURANCE_COVERAGE,
        }),
        FieldSchema::required("quantity", FieldKind::non_negative_integer()),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("units", FieldKind::array(&REDELIVERY_UNIT_ITEM)),
    ],
};

pub static REDELIVERY: ObjectSchema = ObjectSchema {
    name: "Redelivery",
    description: "approval for a customer to turn shipping containers in",
    fields: &[
        FieldSchema::required("redeliveryNumber", FieldKind::text(16)),
        FieldSchema::optional("status", FieldKind::text(10)),
        FieldSchema::optional("approvalDate", FieldKind::DateTime),
        FieldSchema::optional("expirationDate", FieldKind::DateTime),
        FieldSchema::optional("depot", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("recipient", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("owner", FieldKind::Object { schema: &PARTY }),
        FieldSchema::required("quantity", FieldKind::non_negative_integer()),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("estimateRecipients", FieldKind::array(&EMAIL_ITEM))
            .describe("e-mail addresses that should receive estimates for these units"),
        FieldSchema::optional("details", FieldKind::array(&REDELIVERY_DETAIL_ITEM)),
    ],
};

pub static GATE_PHOTO: ObjectSchema = ObjectSchema {
    name: "GatePhoto",
    description: "a photo taken while the unit passed the gate",
    fields: &[
        FieldSchema::required("url", FieldKind::text(500)),
        FieldSchema::optional("status", FieldKind::one_of(&PhotoStatus::CODES)),
    ],
};

pub static GATE_CREATE_REQUEST: ObjectSchema = ObjectSchema {
    name: "GateCreateRequest",
    description: "reports a shipping container entering or leaving a depot",
    fields: &[
        FieldSchema::required("adviceNumber", FieldKind::text(16))
            .describe("the redelivery or release number authorizing the movement"),
        FieldSchema::required("depot", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("customer", FieldKind::Object { schema: &PARTY }),
        FieldSchema::required("type", FieldKind::one_of(&GateType::CODES)),
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::optional("equipment", FieldKind::text(10)),
        FieldSchema::required("status", FieldKind::one_of(&UnitCondition::CODES))
            .describe("`AV` available or `DM` damaged"),
        FieldSchema::required("activityTime", FieldKind::DateTime),
        FieldSchema::optional("transportCompany", FieldKind::text(50)),
        FieldSchema::optional("transportation", FieldKind::one_of(&Transportation::CODES)),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("photos", FieldKind::array(&GATE_PHOTO_ITEM)),
    ],
};

pub static GATE_UPDATE_REQUEST: ObjectSchema = ObjectSchema {
    name: "GateUpdateRequest",
    description: "corrections to a previously reported gate movement",
    fields: &[
        FieldSchema::required("adviceNumber", FieldKind::text(16)),
        FieldSchema::optional("type", FieldKind::one_of(&GateType::CODES)),
        FieldSchema::optional("status", FieldKind::one_of(&UnitCondition::CODES)),
        FieldSchema::optional("activityTime", FieldKind::DateTime),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("photos", FieldKind::array(&GATE_PHOTO_ITEM)),
    ],
};

pub static GATE_STATUS: ObjectSchema = ObjectSchema {
    name: "GateStatus",
    description: "the latest gate movement known for a shipping container",
    fields: &[
        FieldSchema::required("adviceNumber", FieldKind::text(16)),
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::required("type", FieldKind::one_of(&GateType::CODES)),
        FieldSchema::required("status", FieldKind::one_of(&UnitCondition::CODES)),
        FieldSchema::required("activityTime", FieldKind::DateTime),
        FieldSchema::required("depot", FieldKind::Object { schema: &PARTY }),
    ],
};

pub static GATE_RESPONSE: ObjectSchema = ObjectSchema {
    name: "GateResponse",
    description: "A confirmation that a gate completed successfully and the necessary information to perform a damage estimate if required.",
    fields: &[
        FieldSchema::optional("code", FieldKind::pattern(RESPONSE_CODE, 6))
            .describe("indicator code for this response"),
        FieldSchema::optional("message", FieldKind::text(500)),
        FieldSchema::required("adviceNumber", FieldKind::text(16))
            .describe("either the submitted advice number for the gate record or the adjusted one"),
        FieldSchema::optional("customerReference", FieldKind::text(35)),
        FieldSchema::optional("transactionReference", FieldKind::text(35)),
        FieldSchema::optional("insuranceCoverage", FieldKind::Object {
            schema: &INSURANCE_COVERAGE,
        }),
        FieldSchema::optional("currentExchangeRate", FieldKind::non_negative_decimal())
            .describe("the exchange rate to convert billed currency to the local currency"),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::required("currentInspectionCriteria", FieldKind::text(10))
            .describe("the last reported grade or category standard of this unit"),
    ],
};

pub static ESTIMATE_PHOTO: ObjectSchema = ObjectSchema {
    name: "EstimatePhoto",
    description: "a photo documenting damage or a repair",
    fields: &[
        FieldSchema::required("url", FieldKind::text(500)),
        FieldSchema::optional("status", FieldKind::one_of(&PhotoStatus::CODES)),
    ],
};

pub static ESTIMATE_LINE_ITEM_PART: ObjectSchema = ObjectSchema {
    name: "EstimateLineItemPart",
    description: "Represents a part used for the repair of a line item.",
    fields: &[
        FieldSchema::optional("description", FieldKind::text(500)),
        FieldSchema::required("number", FieldKind::text(50))
            .describe("ID number used to signify what part is being used"),
        FieldSchema::required("quantity", FieldKind::Integer { minimum: Some(1) }),
        FieldSchema::required("price", FieldKind::non_negative_decimal()),
    ],
};

pub static ESTIMATE_LINE_ITEM: ObjectSchema = ObjectSchema {
    name: "EstimateLineItem",
    description: "a single damage and repair line of an estimate",
    fields: &[
        FieldSchema::required("lineNumber", FieldKind::Integer { minimum: Some(1) }),
        FieldSchema::required("damageLocationCode", FieldKind::exact_length(4)),
        FieldSchema::required("componentCode", FieldKind::exact_length(3)),
        FieldSchema::required("damageCode", FieldKind::exact_length(2)),
        FieldSchema::required("repairCode", FieldKind::exact_length(2)),
        FieldSchema::optional("length", FieldKind::non_negative_decimal()),
        FieldSchema::optional("width", FieldKind::non_negative_decimal()),
        FieldSchema::optional("quantity", FieldKind::Integer { minimum: Some(1) }),
        FieldSchema::required("hours", FieldKind::non_negative_decimal()),
        FieldSchema::optional("material", FieldKind::non_negative_decimal()),
        FieldSchema::required("responsibility", FieldKind::one_of(&Responsibility::CODES))
            .describe("`O` owner, `U` user, `I` insurance, `D` depot, `S` special, `X` third party"),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("parts", FieldKind::array(&LINE_ITEM_PART_ITEM)),
        FieldSchema::optional("photos", FieldKind::array(&ESTIMATE_PHOTO_ITEM)),
    ],
};

pub static ESTIMATE: ObjectSchema = ObjectSchema {
    name: "Estimate",
    description: "a damage or upgrade estimate for a shipping container after turn in",
    fields: &[
        FieldSchema::required("estimateNumber", FieldKind::text(16)),
        FieldSchema::optional("revision", FieldKind::non_negative_integer()),
        FieldSchema::required("depot", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("customer", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("owner", FieldKind::Object { schema: &PARTY }),
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::optional("equipment", FieldKind::text(10)),
        FieldSchema::required("estimateTime", FieldKind::DateTime),
        FieldSchema::required("currency", FieldKind::pattern(CURRENCY_CODE, 3)),
        FieldSchema::required("labourRate", FieldKind::non_negative_decimal()),
        FieldSchema::optional("depreciatedValue", FieldKind::non_negative_decimal()),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("lineItems", FieldKind::array(&LINE_ITEM_ITEM)),
        FieldSchema::optional("photos", FieldKind::array(&ESTIMATE_PHOTO_ITEM)),
    ],
};

pub static ALLOCATION_TOTAL: ObjectSchema = ObjectSchema {
    name: "AllocationTotal",
    description: "estimate totals billed to one responsible party",
    fields: &[
        FieldSchema::required("partyType", FieldKind::one_of(&Responsibility::CODES)),
        FieldSchema::required("labour", FieldKind::non_negative_decimal()),
        FieldSchema::required("material", FieldKind::non_negative_decimal()),
        FieldSchema::required("total", FieldKind::non_negative_decimal()),
    ],
};

pub static PRELIMINARY_DECISION: ObjectSchema = ObjectSchema {
    name: "PreliminaryDecision",
    description: "an early recommendation whether the unit should be repaired",
    fields: &[
        FieldSchema::required("recommendation", FieldKind::one_of(&RECOMMENDATIONS)),
        FieldSchema::optional("reason", FieldKind::text(500)),
    ],
};

pub static ESTIMATE_ALLOCATION: ObjectSchema = ObjectSchema {
    name: "EstimateAllocation",
    description: "the totals of an accepted estimate split by responsible party",
    fields: &[
        FieldSchema::required("id", FieldKind::non_negative_integer())
            .describe("server-assigned identifier, kept across revisions"),
        FieldSchema::required("estimateNumber", FieldKind::text(16)),
        FieldSchema::required("revision", FieldKind::non_negative_integer()),
        FieldSchema::required("currency", FieldKind::pattern(CURRENCY_CODE, 3)),
        FieldSchema::required("allocations", FieldKind::array(&ALLOCATION_TOTAL_ITEM)),
        FieldSchema::required("total", FieldKind::non_negative_decimal()),
        FieldSchema::optional("preliminaryDecision", FieldKind::Object {
            schema: &PRELIMINARY_DECISION,
        }),
    ],
};

pub static ESTIMATE_CUSTOMER_APPROVAL: ObjectSchema = ObjectSchema {
    name: "EstimateCustomerApproval",
    description: "a customer accepting their share of an estimate",
    fields: &[
        FieldSchema::required("approvalNumber", FieldKind::text(16)),
        FieldSchema::required("approvalTime", FieldKind::DateTime),
        FieldSchema::required("approvalTotal", FieldKind::non_negative_decimal()),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
    ],
};

pub static WORK_ORDER_UNIT: ObjectSchema = ObjectSchema {
    name: "WorkOrderUnit",
    description: "a unit and the estimate approved for its repair",
    fields: &[
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::required("estimateNumber", FieldKind::text(16)),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::optional("repairCompleteTime", FieldKind::DateTime)
            .describe("read only; set when the depot reports the repair complete"),
    ],
};

pub static WORK_ORDER: ObjectSchema = ObjectSchema {
    name: "WorkOrder",
    description: "damage estimates approved for repair at a depot",
    fields: &[
        FieldSchema::required("workOrderNumber", FieldKind::text(16)),
        FieldSchema::required("depot", FieldKind::Object { schema: &PARTY }),
        FieldSchema::optional("approvalTime", FieldKind::DateTime),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
        FieldSchema::required("units", FieldKind::non_empty_array(&WORK_ORDER_UNIT_ITEM)),
    ],
};

pub static REPAIR_COMPLETE: ObjectSchema = ObjectSchema {
    name: "RepairComplete",
    description: "marks a shipping container repaired",
    fields: &[
        FieldSchema::required("unitNumber", FieldKind::pattern(UNIT_NUMBER, 11)),
        FieldSchema::required("completionTime", FieldKind::DateTime),
        FieldSchema::optional("comments", FieldKind::array(&STRING_ITEM)),
    ],
};

pub static ERROR_RESPONSE: ObjectSchema = ObjectSchema {
    name: "ErrorResponse",
    description: "a general response object used when an error occurs to describe why it occurred",
    fields: &[
        FieldSchema::optional("code", FieldKind::pattern(RESPONSE_CODE, 6)),
        FieldSchema::optional("message", FieldKind::text(500)),
        FieldSchema::optional("details", FieldKind::array(&STRING_ITEM)),
    ],
};

/// Every published component, in documentation order.
pub static ALL: [&ObjectSchema; 27] = [
    &ERROR_RESPONSE,
    &INSURANCE_COVERAGE,
    &PARTY,
    &MACHINERY_INFO,
    &REDELIVERY,
    &REDELIVERY_DETAIL,
    &REDELIVERY_UNIT,
    &RELEASE,
    &RELEASE_DETAIL,
    &RELEASE_DETAIL_CRITERIA,
    &RELEASE_UNIT,
    &GATE_CREATE_REQUEST,
    &GATE_PHOTO,
    &GATE_RESPONSE,
    &GATE_STATUS,
    &GATE_UPDATE_REQUEST,
    &ESTIMATE,
    &ESTIMATE_PHOTO,
    &ESTIMATE_LINE_ITEM,
    &ESTIMATE_LINE_ITEM_PART,
    &ESTIMATE_ALLOCATION,
    &ALLOCATION_TOTAL,
    &PRELIMINARY_DECISION,
    &ESTIMATE_CUSTOMER_APPROVAL,
    &WORK_ORDER,
    &WORK_ORDER_UNIT,
    &REPAIR_COMPLETE,
];

pub fn by_name(name: &str) -> Option<&'static ObjectSchema> {
    ALL.iter()
        .copied()
        .find(|schema| schema.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, FieldKind};
    use regex::Regex;
    use serde_json::json;
    use std::collections::HashSet;

    fn patterns(schema: &ObjectSchema, seen: &mut HashSet<&'static str>) {
        for field in schema.fields {
            collect(&field.kind, seen);
        }
    }

    fn collect(kind: &FieldKind, seen: &mut HashSet<&'static str>) {
        match kind {
            FieldKind::Text(rules) => {
                if let Some(pattern) = rules.pattern {
                    seen.insert(pattern);
                }
            }
            FieldKind::Array { items, .. } => collect(items, seen),
            _ => {}
        }
    }

    #[test]
    fn every_pattern_compiles() {
        let mut seen = HashSet::new();
        for schema in ALL {
            patterns(schema, &mut seen);
        }
        assert!(seen.contains(UNIT_NUMBER));
        for pattern in seen {
            Regex::new(pattern).unwrap_or_else(|err| panic!("{pattern} invalid: {err}"));
        }
    }

    #[test]
    fn component_names_are_unique_and_resolvable() {
        let names: HashSet<_> = ALL.iter().map(|schema| schema.name).collect();
        assert_eq!(names.len(), ALL.len());
        assert_eq!(by_name("gateresponse").map(|schema| schema.name), Some("GateResponse"));
        assert!(by_name("Invoice").is_none());
    }

    #[test]
    fn gate_response_requires_advice_number_and_inspection_criteria() {
        let required: Vec<_> = GATE_RESPONSE.required_fields().collect();
        assert_eq!(required, vec!["adviceNumber", "currentInspectionCriteria"]);

        let without_advice = json!({ "currentInspectionCriteria": "IICL" });
        let err = validate(&GATE_RESPONSE, &without_advice).expect_err("advice number missing");
        assert!(err.contains_path("adviceNumber"));

        let without_criteria = json!({ "adviceNumber": "AHAMG33141" });
        let err = validate(&GATE_RESPONSE, &without_criteria).expect_err("criteria missing");
        assert!(err.contains_path("currentInspectionCriteria"));

        let complete = json!({
            "adviceNumber": "AHAMG33141",
            "currentInspectionCriteria": "IICL",
            "code": "TRI521"
        });
        assert!(validate(&GATE_RESPONSE, &complete).is_ok());
    }

    #[test]
    fn currency_codes_must_be_three_upper_case_letters() {
        for bad in ["usd", "US", "USDX", "U5D", ""] {
            let body = json!({ "amountCurrency": bad });
            let err = validate(&INSURANCE_COVERAGE, &body)
                .expect_err("currency should be rejected");
            assert!(err.contains_path("amountCurrency"), "{bad} accepted");
        }
        assert!(validate(&INSURANCE_COVERAGE, &json!({ "amountCurrency": "EUR" })).is_ok());
    }

    #[test]
    fn upgrade_type_is_limited_to_the_documented_codes() {
        let detail = |code: &str| {
            json!({
                "customer": { "companyId": "GBLONCUST" },
                "contract": "EXCUST01-100000",
                "equipment": "22G1",
                "grade": "IICL",
                "quantity": 1,
                "upgradeType": code
            })
        };
        for code in UPGRADE_TYPES {
            assert!(validate(&RELEASE_DETAIL, &detail(code)).is_ok(), "{code} rejected");
            assert!(validate(&REDELIVERY_DETAIL, &detail(code)).is_ok(), "{code} rejected");
        }
        for code in ["fg", "XX", "FGX", ""] {
            assert!(validate(&RELEASE_DETAIL, &detail(code)).is_err(), "{code} accepted");
        }
    }

    #[test]
    fn negative_quantities_are_rejected_everywhere() {
        let cases = [
            (&RELEASE, json!({ "releaseNumber": "R1", "quantity": -1 })),
            (&REDELIVERY, json!({ "redeliveryNumber": "A1", "quantity": -3 })),
            (
                &RELEASE_DETAIL,
                json!({
                    "customer": { "companyId": "GBLONCUST" },
                    "contract": "C", "equipment": "22G1", "grade": "IICL", "quantity": -1
                }),
            ),
            (
                &REDELIVERY_DETAIL,
                json!({
                    "customer": { "companyId": "GBLONCUST" },
                    "contract": "C", "equipment": "22G1", "quantity": -1
                }),
            ),
            (
                &ESTIMATE_LINE_ITEM_PART,
                json!({ "number": "108106", "quantity": -1, "price": 2.88 }),
            ),
        ];
        for (schema, body) in cases {
            let err = validate(schema, &body).expect_err("negative quantity");
            assert!(err.contains_path("quantity"), "{} accepted", schema.name);
        }
    }
}
