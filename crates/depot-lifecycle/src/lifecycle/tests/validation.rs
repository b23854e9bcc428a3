use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::domain::Responsibility;
use crate::lifecycle::fixtures::{Fixtures, UNIT_ONE};

fn release_body(release_number: &str) -> Value {
    let mut body = serde_json::to_value(Fixtures::build(now()).release).expect("release json");
    body["releaseNumber"] = json!(release_number);
    body
}

fn details(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .expect("details")
        .iter()
        .map(|detail| detail.as_str().expect("detail text").to_string())
        .collect()
}

#[tokio::test]
async fn gate_request_violations_are_listed_by_path() {
    let router = router_with_service(seeded_service());
    let mut gate = serde_json::to_value(gate_in(UNIT_ONE)).expect("gate json");
    gate["unitNumber"] = json!("CONU12");
    gate.as_object_mut().expect("object").remove("activityTime");

    let response = router
        .oneshot(json_request("POST", "/api/v2/gate", &gate))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "REQ400");
    let details = details(&body);
    assert!(details.iter().any(|detail| detail.starts_with("unitNumber")));
    assert!(details.iter().any(|detail| detail.starts_with("activityTime")));
}

#[tokio::test]
async fn null_lists_are_treated_as_absent() {
    let router = router_with_service(seeded_service());
    let mut body = release_body("RHAMG000777");
    body["comments"] = Value::Null;
    body["details"][0]["units"] = Value::Null;
    body["details"][0]["criteria"] = Value::Null;

    let response = router
        .oneshot(json_request("POST", "/api/v2/release", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let stored = read_json_body(response).await;
    assert!(stored.get("comments").is_none());
    assert_eq!(stored["details"][0]["units"], json!([]));
}

#[tokio::test]
async fn negative_quantities_are_rejected() {
    let router = router_with_service(seeded_service());
    let mut body = release_body("RHAMG000778");
    body["details"][1]["quantity"] = json!(-1);

    let response = router
        .oneshot(json_request("POST", "/api/v2/release", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let details = details(&read_json_body(response).await);
    assert!(details
        .iter()
        .any(|detail| detail.starts_with("details[1].quantity")));
}

#[tokio::test]
async fn upgrade_types_outside_the_code_list_are_rejected() {
    let router = router_with_service(seeded_service());
    let mut body = release_body("RHAMG000779");
    body["details"][0]["upgradeType"] = json!("ZZ");

    let response = router
        .oneshot(json_request("POST", "/api/v2/release", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let details = details(&read_json_body(response).await);
    assert!(details
        .iter()
        .any(|detail| detail.starts_with("details[0].upgradeType")));
}

#[tokio::test]
async fn estimate_currency_must_be_three_capitals() {
    let router = router_with_service(seeded_service());
    let mut body = serde_json::to_value(estimate(
        "DEHAMCE0000010",
        UNIT_ONE,
        vec![line(1, 1, 10, Responsibility::Customer)],
    ))
    .expect("estimate json");
    body["currency"] = json!("usd");

    let response = router
        .oneshot(json_request("POST", "/api/v2/estimate", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let details = details(&read_json_body(response).await);
    assert!(details.iter().any(|detail| detail.starts_with("currency")));
}

#[tokio::test]
async fn work_order_needs_at_least_one_unit() {
    let router = router_with_service(seeded_service());
    let body = serde_json::to_value(work_order("WHAMG0003", &[])).expect("work order json");

    let response = router
        .oneshot(json_request("POST", "/api/v2/workOrder", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let details = details(&read_json_body(response).await);
    assert!(details.iter().any(|detail| detail.starts_with("units")));
}
