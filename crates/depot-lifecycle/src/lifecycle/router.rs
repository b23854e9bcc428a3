use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::auth::{auth_router, require_bearer, TokenIssuer};
use super::repository::{DepotRepository, RedeliveryQuery, ReleaseQuery};
use super::service::DepotLifecycleService;
use crate::error::ApiError;
use crate::schema::{catalog, openapi, validate, ObjectSchema};

type SharedService<R> = Arc<DepotLifecycleService<R>>;

/// Router exposing the depot lifecycle API; everything under `/api/v2` needs a bearer token.
pub fn lifecycle_router<R>(service: SharedService<R>, issuer: Arc<TokenIssuer>) -> Router
where
    R: DepotRepository + 'static,
{
    let protected = Router::new()
        .route("/api/v2/gate", post(create_gate_handler::<R>))
        .route(
            "/api/v2/gate/:unitNumber",
            put(update_gate_handler::<R>).get(gate_status_handler::<R>),
        )
        .route("/api/v2/estimate", post(create_estimate_handler::<R>))
        .route(
            "/api/v2/estimate/:estimateNumber/revision",
            post(revise_estimate_handler::<R>),
        )
        .route(
            "/api/v2/estimate/:estimateNumber/approve",
            put(approve_estimate_handler::<R>),
        )
        // estimate the photo belongs to
        .route(
            "/api/v2/estimate/:estimateNumber/photo",
            post(estimate_photo_handler),
        )
        .route("/api/v2/workOrder", post(create_work_order_handler::<R>))
        .route(
            "/api/v2/workOrder/:workOrderNumber/repairComplete",
            put(repair_complete_handler::<R>),
        )
        .route(
            "/api/v2/release",
            post(create_release_handler::<R>).get(search_releases_handler::<R>),
        )
        .route(
            "/api/v2/release/:releaseNumber",
            put(update_release_handler::<R>),
        )
        .route(
            "/api/v2/redelivery",
            post(create_redelivery_handler::<R>).get(search_redeliveries_handler::<R>),
        )
        .route(
            "/api/v2/redelivery/:redeliveryNumber",
            put(update_redelivery_handler::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            issuer.clone(),
            require_bearer,
        ))
        .with_state(service);

    Router::new()
        .route("/openapi.json", get(openapi_handler))
        .merge(auth_router(issuer))
        .merge(protected)
}

/// Reject malformed JSON, check the body against `schema`, then bind it.
fn read_body<T: DeserializeOwned>(
    schema: &'static ObjectSchema,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::malformed(rejection.body_text()))?;
    validate(schema, &value)?;
    serde_json::from_value(value)
        .map_err(|err| ApiError::malformed(format!("{} request is invalid: {err}", schema.name)))
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn openapi_handler() -> Response {
    (StatusCode::OK, Json(openapi::document())).into_response()
}

pub(crate) async fn create_gate_handler<R>(
    State(service): State<SharedService<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        read_body(&catalog::GATE_CREATE_REQUEST, body)
            .and_then(|request| service.create_gate(request).map_err(ApiError::from)),
    )
}

pub(crate) async fn update_gate_handler<R>(
    State(service): State<SharedService<R>>,
    Path(unit_number): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        read_body(&catalog::GATE_UPDATE_REQUEST, body).and_then(|update| {
            service
                .update_gate(&unit_number, update)
                .map_err(ApiError::from)
        }),
    )
}

pub(crate) async fn gate_status_handler<R>(
    State(service): State<SharedService<R>>,
    Path(unit_number): Path<String>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(service.gate_status(&unit_number).map_err(ApiError::from))
}

pub(crate) async fn create_estimate_handler<R>(
    State(service): State<SharedService<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        read_body(&catalog::ESTIMATE, body)
            .and_then(|estimate| service.create_estimate(estimate).map_err(ApiError::from)),
    )
}

pub(crate) async fn revise_estimate_handler<R>(
    State(service): State<SharedService<R>>,
    Path(estimate_number): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(read_body(&catalog::ESTIMATE, body).and_then(|estimate| {
        service
            .revise_estimate(&estimate_number, estimate)
            .map_err(ApiError::from)
    }))
}

pub(crate) async fn approve_estimate_handler<R>(
    State(service): State<SharedService<R>>,
    Path(estimate_number): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        read_body(&catalog::ESTIMATE_CUSTOMER_APPROVAL, body).and_then(|approval| {
            service
                .approve_estimate(&estimate_number, approval)
                .map_err(ApiError::from)
        }),
    )
}

pub(crate) async fn estimate_photo_handler(Path(estimate_number): Path<String>) -> Response {
    ApiError::NotImplemented(format!(
        "photo upload for estimate {estimate_number} is not implemented"
    ))
    .into_response()
}

pub(crate) async fn create_work_order_handler<R>(
    State(service): State<SharedService<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        read_body(&catalog::WORK_ORDER, body).and_then(|work_order| {
            service
                .create_work_order(work_order)
                .map_err(ApiError::from)
        }),
    )
}

pub(crate) async fn repair_complete_handler<R>(
    State(service): State<SharedService<R>>,
    Path(work_order_number): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(read_body(&catalog::REPAIR_COMPLETE, body).and_then(|repair| {
        service
            .complete_repair(&work_order_number, repair)
            .map_err(ApiError::from)
    }))
}

pub(crate) async fn create_release_handler<R>(
    State(service): State<SharedService<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        read_body(&catalog::RELEASE, body)
            .and_then(|release| service.create_release(release).map_err(ApiError::from)),
    )
}

pub(crate) async fn update_release_handler<R>(
    State(service): State<SharedService<R>>,
    Path(release_number): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(read_body(&catalog::RELEASE, body).and_then(|release| {
        service
            .update_release(&release_number, release)
            .map_err(ApiError::from)
    }))
}

pub(crate) async fn search_releases_handler<R>(
    State(service): State<SharedService<R>>,
    query: Result<Query<ReleaseQuery>, QueryRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(
        query
            .map_err(|rejection| ApiError::malformed(rejection.body_text()))
            .and_then(|Query(query)| service.search_releases(&query).map_err(ApiError::from)),
    )
}

pub(crate) async fn create_redelivery_handler<R>(
    State(service): State<SharedService<R>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(read_body(&catalog::REDELIVERY, body).and_then(|redelivery| {
        service
            .create_redelivery(redelivery)
            .map_err(ApiError::from)
    }))
}

pub(crate) async fn update_redelivery_handler<R>(
    State(service): State<SharedService<R>>,
    Path(redelivery_number): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(read_body(&catalog::REDELIVERY, body).and_then(|redelivery| {
        service
            .update_redelivery(&redelivery_number, redelivery)
            .map_err(ApiError::from)
    }))
}

pub(crate) async fn search_redeliveries_handler<R>(
    State(service): State<SharedService<R>>,
    query: Result<Query<RedeliveryQuery>, QueryRejection>,
) -> Response
where
    R: DepotRepository + 'static,
{
    respond(query
        .map_err(|rejection| ApiError::malformed(rejection.body_text()))
        .and_then(|Query(query)| {
            service
                .search_redeliveries(&query)
                .map_err(ApiError::from)
        }))
}
