use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};

use super::{FieldKind, FieldSchema, ObjectSchema, TextRules};

/// One failed constraint, addressed by a JSON path such as `details[0].units[1].unitNumber`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in a document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{schema} failed validation with {} violation(s)", .violations.len())]
pub struct Violations {
    pub schema: &'static str,
    pub violations: Vec<Violation>,
}

impl Violations {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|violation| violation.path.as_str())
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths().any(|candidate| candidate == path)
    }

    pub fn details(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Check `value` against `schema`, collecting all violations instead of stopping at the first.
///
/// Unknown properties are ignored. `null` counts as absent for every field, arrays included.
pub fn validate(schema: &'static ObjectSchema, value: &Value) -> Result<(), Violations> {
    let mut violations = Vec::new();
    match value.as_object() {
        Some(object) => check_object(schema, object, "", &mut violations),
        None => violations.push(Violation {
            path: "body".to_string(),
            message: format!("must be a JSON object ({})", schema.name),
        }),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Violations {
            schema: schema.name,
            violations,
        })
    }
}

fn check_object(
    schema: &ObjectSchema,
    object: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<Violation>,
) {
    for field in schema.fields {
        let path = join(prefix, field.name);
        check_field(field, object.get(field.name), &path, out);
    }
}

fn check_field(field: &FieldSchema, value: Option<&Value>, path: &str, out: &mut Vec<Violation>) {
    match value {
        None | Some(Value::Null) => {
            if field.required {
                out.push(violation(path, "is required"));
            }
        }
        Some(value) => check_kind(&field.kind, value, path, out),
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match kind {
        FieldKind::Text(rules) => match value.as_str() {
            Some(text) => check_text(rules, text, path, out),
            None => out.push(violation(path, "must be a string")),
        },
        FieldKind::Integer { minimum } => {
            let number = value
                .as_i64()
                .or_else(|| value.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)));
            match number {
                Some(number) => {
                    if let Some(minimum) = minimum {
                        if number < *minimum {
                            out.push(violation(
                                path,
                                format!("must be greater than or equal to {minimum}"),
                            ));
                        }
                    }
                }
                None => out.push(violation(path, "must be an integer")),
            }
        }
        FieldKind::Decimal { minimum } => match value.as_f64() {
            Some(number) => {
                if let Some(minimum) = minimum {
                    if number < *minimum {
                        out.push(violation(
                            path,
                            format!("must be greater than or equal to {minimum}"),
                        ));
                    }
                }
            }
            None => out.push(violation(path, "must be a number")),
        },
        FieldKind::Boolean => {
            if !value.is_boolean() {
                out.push(violation(path, "must be a boolean"));
            }
        }
        FieldKind::Date => {
            let parsed = value
                .as_str()
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
            if parsed.is_none() {
                out.push(violation(path, "must be a date formatted as YYYY-MM-DD"));
            }
        }
        FieldKind::DateTime => {
            let parsed = value
                .as_str()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok());
            if parsed.is_none() {
                out.push(violation(path, "must be an RFC 3339 date-time with offset"));
            }
        }
        FieldKind::Object { schema } => match value.as_object() {
            Some(object) => check_object(schema, object, path, out),
            None => out.push(violation(path, "must be an object")),
        },
        FieldKind::Array { items, min_items } => match value.as_array() {
            Some(elements) => {
                if elements.len() < *min_items {
                    out.push(violation(
                        path,
                        format!("must contain at least {min_items} item(s)"),
                    ));
                }
                for (index, element) in elements.iter().enumerate() {
                    let element_path = format!("{path}[{index}]");
                    if element.is_null() {
                        out.push(violation(&element_path, "must not be null"));
                    } else {
                        check_kind(items, element, &element_path, out);
                    }
                }
            }
            None => out.push(violation(path, "must be an array")),
        },
    }
}

fn check_text(rules: &TextRules, text: &str, path: &str, out: &mut Vec<Violation>) {
    let length = text.chars().count();
    if let Some(min) = rules.min_length {
        if length < min {
            out.push(violation(
                path,
                format!("length must be at least {min} (found {length})"),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if length > max {
            out.push(violation(
                path,
                format!("length must be at most {max} (found {length})"),
            ));
        }
    }
    if let Some(pattern) = rules.pattern {
        if !pattern_matches(pattern, text) {
            out.push(violation(path, format!("must match pattern {pattern}")));
        }
    }
    if !rules.allowed.is_empty() && !rules.allowed.contains(&text) {
        out.push(violation(
            path,
            format!("must be one of {}", rules.allowed.join(", ")),
        ));
    }
}

fn pattern_matches(pattern: &'static str, candidate: &str) -> bool {
    static PATTERNS: OnceLock<Mutex<HashMap<&'static str, Regex>>> = OnceLock::new();

    let mut compiled = PATTERNS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let regex = match compiled.entry(pattern) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => match Regex::new(pattern) {
            Ok(regex) => entry.insert(regex),
            Err(_) => return false,
        },
    };
    regex.is_match(candidate)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn violation(path: &str, message: impl Into<String>) -> Violation {
    Violation {
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog;
    use serde_json::json;

    #[test]
    fn reports_every_violation_with_paths() {
        let body = json!({
            "releaseNumber": "RHAMG134512-TOO-LONG",
            "quantity": -1,
            "details": [{
                "customer": { "companyId": "GBLONCUST" },
                "contract": "EXCUST01-100000",
                "equipment": "22G1",
                "quantity": 1,
                "upgradeType": "ZZ",
                "units": [{ "unitNumber": "bad" }]
            }]
        });

        let err = validate(&catalog::RELEASE, &body).expect_err("invalid release");
        assert!(err.contains_path("releaseNumber"));
        assert!(err.contains_path("quantity"));
        assert!(err.contains_path("details[0].grade"));
        assert!(err.contains_path("details[0].upgradeType"));
        assert!(err.contains_path("details[0].units[0].unitNumber"));
        assert_eq!(err.violations.len(), 5);
    }

    #[test]
    fn null_counts_as_absent() {
        let body = json!({
            "releaseNumber": "RHAMG134512",
            "quantity": 1,
            "comments": null,
            "details": null,
            "status": null
        });
        assert!(validate(&catalog::RELEASE, &body).is_ok());

        let missing = json!({ "releaseNumber": null, "quantity": 1 });
        let err = validate(&catalog::RELEASE, &missing).expect_err("number required");
        assert_eq!(err.details(), vec!["releaseNumber: is required".to_string()]);
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let body = json!({
            "releaseNumber": "RHAMG134512",
            "quantity": 0,
            "futureField": { "anything": true }
        });
        assert!(validate(&catalog::RELEASE, &body).is_ok());
    }

    #[test]
    fn rejects_non_object_documents() {
        let err = validate(&catalog::PARTY, &json!([1, 2])).expect_err("array body");
        assert_eq!(err.violations[0].path, "body");
    }

    #[test]
    fn checks_types_formats_and_minimums() {
        let body = json!({
            "approvalNumber": 12,
            "approvalTime": "2024-02-30T10:00:00Z",
            "approvalTotal": -5.5,
            "comments": "not a list"
        });
        let err = validate(&catalog::ESTIMATE_CUSTOMER_APPROVAL, &body).expect_err("invalid");
        let details = err.details();
        assert!(details.contains(&"approvalNumber: must be a string".to_string()));
        assert!(details
            .iter()
            .any(|detail| detail.starts_with("approvalTime: must be an RFC 3339")));
        assert!(details.contains(&"approvalTotal: must be greater than or equal to 0".to_string()));
        assert!(details.contains(&"comments: must be an array".to_string()));
    }

    #[test]
    fn fractional_quantities_are_not_integers() {
        let body = json!({ "releaseNumber": "R1", "quantity": 1.5 });
        let err = validate(&catalog::RELEASE, &body).expect_err("fractional quantity");
        assert_eq!(err.details(), vec!["quantity: must be an integer".to_string()]);
    }

    #[test]
    fn array_minimums_and_null_elements_are_reported() {
        let body = json!({
            "workOrderNumber": "WO1",
            "depot": { "companyId": "DEHAMCMRA" },
            "units": []
        });
        let err = validate(&catalog::WORK_ORDER, &body).expect_err("empty units");
        assert!(err.contains_path("units"));

        let body = json!({
            "workOrderNumber": "WO1",
            "depot": { "companyId": "DEHAMCMRA" },
            "units": [null]
        });
        let err = validate(&catalog::WORK_ORDER, &body).expect_err("null unit");
        assert!(err.contains_path("units[0]"));
    }
}
