use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::domain::Responsibility;
use crate::lifecycle::fixtures::{Fixtures, UNIT_ONE, UNIT_TWO};
use crate::schema::{catalog, validate};

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(
            Request::get(format!("/api/v2/gate/{UNIT_ONE}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "AUT401");
}

#[tokio::test]
async fn login_token_authorizes_gate_in() {
    let router = router_with_service(seeded_service());

    let login = router
        .clone()
        .oneshot(
            Request::post("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "jdoe", "password": "jdoepassword" }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(login.status(), StatusCode::OK);
    let tokens = read_json_body(login).await;
    assert_eq!(tokens["token_type"], "Bearer");
    let access_token = tokens["access_token"].as_str().expect("access token");

    let gate = serde_json::to_value(gate_in(UNIT_TWO)).expect("gate json");
    let response = router
        .oneshot(
            Request::post("/api/v2/gate")
                .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(gate.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    validate(&catalog::GATE_RESPONSE, &body).expect("gate response matches its schema");
    assert_eq!(body["currentInspectionCriteria"], "CWCA");
    assert_eq!(body["insuranceCoverage"]["amountCovered"], json!(2000.0));
}

#[tokio::test]
async fn business_violations_answer_method_not_allowed() {
    let router = router_with_service(seeded_service());
    let gate = serde_json::to_value(gate_in(UNIT_ONE)).expect("gate json");

    let first = router
        .clone()
        .oneshot(json_request("POST", "/api/v2/gate", &gate))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(json_request("POST", "/api/v2/gate", &gate))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = read_json_body(second).await;
    assert_eq!(body["code"], "GTE405");
    validate(&catalog::ERROR_RESPONSE, &body).expect("error envelope");
}

#[tokio::test]
async fn gate_status_of_unknown_unit_is_not_found() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(get_request("/api/v2/gate/ABCU1234560"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "NFD404");
}

#[tokio::test]
async fn gate_corrections_go_through_the_unit_path() {
    let router = router_with_service(seeded_service());
    let gate = serde_json::to_value(gate_in(UNIT_ONE)).expect("gate json");
    router
        .clone()
        .oneshot(json_request("POST", "/api/v2/gate", &gate))
        .await
        .expect("gate in");

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v2/gate/{UNIT_ONE}"),
            &json!({ "adviceNumber": "AHAMG33141", "status": "AV" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let status = router
        .oneshot(get_request(&format!("/api/v2/gate/{UNIT_ONE}")))
        .await
        .expect("response");
    let body = read_json_body(status).await;
    validate(&catalog::GATE_STATUS, &body).expect("gate status schema");
    assert_eq!(body["status"], "AV");
    assert_eq!(body["type"], "IN");
}

#[tokio::test]
async fn photo_upload_is_not_implemented() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v2/estimate/DEHAMCE1856373/photo",
            &json!({}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "NIM501");
    assert!(body["message"]
        .as_str()
        .expect("message")
        .contains("estimate DEHAMCE1856373"));
}

#[tokio::test]
async fn release_search_binds_query_parameters() {
    let router = router_with_service(seeded_service());

    let response = router
        .clone()
        .oneshot(get_request(&format!(
            "/api/v2/release?unitNumber={UNIT_TWO}&gateCheck=true"
        )))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let releases = body.as_array().expect("array");
    assert_eq!(releases.len(), 1);
    validate(&catalog::RELEASE, &releases[0]).expect("release schema");

    let none = router
        .oneshot(get_request("/api/v2/redelivery?redeliveryNumber=AHAMG00000"))
        .await
        .expect("response");
    assert_eq!(read_json_body(none).await, json!([]));
}

#[tokio::test]
async fn malformed_json_is_an_invalid_request() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(
            Request::post("/api/v2/estimate")
                .header(header::AUTHORIZATION, format!("Bearer {STATIC_TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"estimateNumber\": "))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "REQ400");
}

#[tokio::test]
async fn openapi_document_is_public() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(
            Request::get("/openapi.json")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["info"]["version"], "2.2.4");
    assert!(body["components"]["schemas"]["GateResponse"].is_object());
}

#[tokio::test]
async fn refresh_grant_issues_new_tokens() {
    let router = router_with_service(seeded_service());
    let login = router
        .clone()
        .oneshot(
            Request::post("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "jdoe", "password": "jdoepassword" }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    let tokens = read_json_body(login).await;
    let refresh_token = tokens["refresh_token"].as_str().expect("refresh token");

    let form = |grant: &str| {
        Request::post("/oauth/access_token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "grant_type={grant}&refresh_token={refresh_token}"
            )))
            .expect("request")
    };

    let rejected = router
        .clone()
        .oneshot(form("password"))
        .await
        .expect("response");
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let refreshed = router
        .oneshot(form("refresh_token"))
        .await
        .expect("response");
    assert_eq!(refreshed.status(), StatusCode::OK);
    let body: Value = read_json_body(refreshed).await;
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn validate_endpoint_reports_token_state() {
    let router = router_with_service(seeded_service());

    let valid = router
        .clone()
        .oneshot(get_request("/api/validate"))
        .await
        .expect("response");
    assert_eq!(valid.status(), StatusCode::OK);

    let invalid = router
        .oneshot(
            Request::get("/api/validate")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn estimate_amounts_beyond_the_decimal_range_are_invalid_requests() {
    let service = seeded_service();
    service.create_gate(gate_in(UNIT_TWO)).expect("gate in");
    let router = router_with_service(service);
    let mut body = serde_json::to_value(estimate(
        "DEHAMCE0000020",
        UNIT_TWO,
        vec![line(1, 1, 10, Responsibility::Customer)],
    ))
    .expect("estimate json");
    body["labourRate"] = json!(1e15);
    body["lineItems"][0]["hours"] = json!(1e15);

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v2/estimate", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "REQ400");
    validate(&catalog::ERROR_RESPONSE, &body).expect("error envelope");

    let retried = serde_json::to_value(estimate(
        "DEHAMCE0000020",
        UNIT_TWO,
        vec![line(1, 1, 10, Responsibility::Customer)],
    ))
    .expect("estimate json");
    let accepted = router
        .oneshot(json_request("POST", "/api/v2/estimate", &retried))
        .await
        .expect("response");
    assert_eq!(accepted.status(), StatusCode::OK);
}

#[tokio::test]
async fn business_violations_list_every_unknown_party() {
    let router = router_with_service(seeded_service());
    let mut body = serde_json::to_value(Fixtures::build(now()).release).expect("release json");
    body["releaseNumber"] = json!("RHAMG000901");
    body["owner"] = json!({ "companyId": "ZZUNKNOWN" });
    body["details"][0]["customer"] = json!({ "companyId": "ZZMISSING" });

    let response = router
        .oneshot(json_request("POST", "/api/v2/release", &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = read_json_body(response).await;
    validate(&catalog::ERROR_RESPONSE, &body).expect("error envelope");
    assert_eq!(body["code"], "PTY405");
    let details = body["details"].as_array().expect("details listed");
    assert_eq!(details.len(), 2);
    assert!(details.contains(&json!("party ZZUNKNOWN is not registered")));
    assert!(details.contains(&json!("party ZZMISSING is not registered")));
}
