use serde_json::{json, Map, Value};

use super::catalog::{self, ALL};
use super::{FieldKind, ObjectSchema};

pub const API_TITLE: &str = "Depot Life Cycle";
pub const API_VERSION: &str = "2.2.4";

/// One documented operation of the HTTP surface.
pub struct Operation {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    pub request: Option<&'static ObjectSchema>,
    pub response: Option<&'static ObjectSchema>,
}

pub static OPERATIONS: [Operation; 12] = [
    Operation {
        method: "post",
        path: "/api/v2/gate",
        summary: "report a unit entering or leaving a depot",
        request: Some(&catalog::GATE_CREATE_REQUEST),
        response: Some(&catalog::GATE_RESPONSE),
    },
    Operation {
        method: "put",
        path: "/api/v2/gate/{unitNumber}",
        summary: "correct a previously reported gate movement",
        request: Some(&catalog::GATE_UPDATE_REQUEST),
        response: Some(&catalog::GATE_RESPONSE),
    },
    Operation {
        method: "get",
        path: "/api/v2/gate/{unitNumber}",
        summary: "latest gate movement of a unit",
        request: None,
        response: Some(&catalog::GATE_STATUS),
    },
    Operation {
        method: "post",
        path: "/api/v2/estimate",
        summary: "submit a damage estimate",
        request: Some(&catalog::ESTIMATE),
        response: Some(&catalog::ESTIMATE_ALLOCATION),
    },
    Operation {
        method: "post",
        path: "/api/v2/estimate/{estimateNumber}/revision",
        summary: "submit a revised damage estimate",
        request: Some(&catalog::ESTIMATE),
        response: Some(&catalog::ESTIMATE_ALLOCATION),
    },
    Operation {
        method: "put",
        path: "/api/v2/estimate/{estimateNumber}/approve",
        summary: "record the customer approval of an estimate",
        request: Some(&catalog::ESTIMATE_CUSTOMER_APPROVAL),
        response: Some(&catalog::ESTIMATE_ALLOCATION),
    },
    Operation {
        method: "post",
        path: "/api/v2/workOrder",
        summary: "approve estimates for repair",
        request: Some(&catalog::WORK_ORDER),
        response: Some(&catalog::WORK_ORDER),
    },
    Operation {
        method: "put",
        path: "/api/v2/workOrder/{workOrderNumber}/repairComplete",
        summary: "report a unit repaired",
        request: Some(&catalog::REPAIR_COMPLETE),
        response: Some(&catalog::WORK_ORDER),
    },
    Operation {
        method: "post",
        path: "/api/v2/release",
        summary: "create a release",
        request: Some(&catalog::RELEASE),
        response: Some(&catalog::RELEASE),
    },
    Operation {
        method: "put",
        path: "/api/v2/release/{releaseNumber}",
        summary: "replace a release",
        request: Some(&catalog::RELEASE),
        response: Some(&catalog::RELEASE),
    },
    Operation {
        method: "post",
        path: "/api/v2/redelivery",
        summary: "create a redelivery",
        request: Some(&catalog::REDELIVERY),
        response: Some(&catalog::REDELIVERY),
    },
    Operation {
        method: "put",
        path: "/api/v2/redelivery/{redeliveryNumber}",
        summary: "replace a redelivery",
        request: Some(&catalog::REDELIVERY),
        response: Some(&catalog::REDELIVERY),
    },
];

/// Every catalog entry rendered as an OpenAPI 3 component schema, keyed by name.
pub fn components() -> Map<String, Value> {
    ALL.iter()
        .map(|schema| (schema.name.to_string(), object_schema(schema)))
        .collect()
}

/// The complete OpenAPI 3.0 document served at `/openapi.json`.
pub fn document() -> Value {
    let mut paths = Map::new();
    for operation in &OPERATIONS {
        let entry = paths
            .entry(operation.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(operation.method.to_string(), operation_object(operation));
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": "Depot, lessor and customer interactions for the lifecycle of shipping containers."
        },
        "security": [{ "Dynamic_Token": [] }, { "Static_Token": [] }],
        "paths": paths,
        "components": {
            "schemas": components(),
            "securitySchemes": {
                "Dynamic_Token": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" },
                "Static_Token": { "type": "http", "scheme": "bearer" }
            }
        }
    })
}

fn operation_object(operation: &Operation) -> Value {
    let mut object = Map::new();
    object.insert("summary".into(), json!(operation.summary));
    if let Some(request) = operation.request {
        object.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": { "application/json": { "schema": reference(request) } }
            }),
        );
    }

    let success = match operation.response {
        Some(schema) => json!({
            "description": "OK",
            "content": { "application/json": { "schema": reference(schema) } }
        }),
        None => json!({ "description": "OK" }),
    };
    let error = json!({
        "content": { "application/json": { "schema": reference(&catalog::ERROR_RESPONSE) } }
    });
    let mut responses = Map::new();
    responses.insert("200".into(), success);
    for (status, description) in [
        ("400", "Invalid request"),
        ("401", "Missing or invalid bearer token"),
        ("405", "Business rule violation"),
    ] {
        let mut response = error.clone();
        response["description"] = json!(description);
        responses.insert(status.into(), response);
    }
    object.insert("responses".into(), Value::Object(responses));
    Value::Object(object)
}

fn object_schema(schema: &ObjectSchema) -> Value {
    let properties: Map<String, Value> = schema
        .fields
        .iter()
        .map(|field| {
            let mut property = kind_schema(&field.kind);
            if !field.description.is_empty() {
                if let Value::Object(map) = &mut property {
                    // OpenAPI 3.0 ignores siblings of `$ref`
                    if !map.contains_key("$ref") {
                        map.insert("description".into(), json!(field.description));
                    }
                }
            }
            (field.name.to_string(), property)
        })
        .collect();

    let mut object = Map::new();
    object.insert("type".into(), json!("object"));
    object.insert("description".into(), json!(schema.description));
    let required: Vec<&str> = schema.required_fields().collect();
    if !required.is_empty() {
        object.insert("required".into(), json!(required));
    }
    object.insert("properties".into(), Value::Object(properties));
    Value::Object(object)
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Text(rules) => {
            let mut map = Map::new();
            map.insert("type".into(), json!("string"));
            if let Some(min) = rules.min_length {
                map.insert("minLength".into(), json!(min));
            }
            if let Some(max) = rules.max_length {
                map.insert("maxLength".into(), json!(max));
            }
            if let Some(pattern) = rules.pattern {
                map.insert("pattern".into(), json!(pattern));
            }
            if !rules.allowed.is_empty() {
                map.insert("enum".into(), json!(rules.allowed));
            }
            Value::Object(map)
        }
        FieldKind::Integer { minimum } => with_minimum(
            json!({ "type": "integer", "format": "int32" }),
            minimum.map(|value| json!(value)),
        ),
        FieldKind::Decimal { minimum } => {
            with_minimum(json!({ "type": "number" }), minimum.map(|value| json!(value)))
        }
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Date => json!({ "type": "string", "format": "date" }),
        FieldKind::DateTime => json!({ "type": "string", "format": "date-time" }),
        FieldKind::Object { schema } => reference(schema),
        FieldKind::Array { items, min_items } => {
            let mut map = Map::new();
            map.insert("type".into(), json!("array"));
            map.insert("items".into(), kind_schema(items));
            if *min_items > 0 {
                map.insert("minItems".into(), json!(min_items));
            }
            Value::Object(map)
        }
    }
}

fn with_minimum(mut schema: Value, minimum: Option<Value>) -> Value {
    if let Some(minimum) = minimum {
        schema["minimum"] = minimum;
    }
    schema
}

fn reference(schema: &ObjectSchema) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", schema.name) })
}
