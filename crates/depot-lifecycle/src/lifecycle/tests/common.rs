use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::AuthConfig;
use crate::domain::{
    Estimate, EstimateAllocation, EstimateLineItem, GateCreateRequest, GateResponse, GateType,
    Party, Redelivery, Release, Responsibility, UnitCondition, WorkOrder, WorkOrderUnit,
};
use crate::lifecycle::fixtures::{self, DEPOT_ONE, REDELIVERY_NUMBER, RELEASE_NUMBER};
use crate::lifecycle::repository::{
    EstimateRecord, EstimateRepository, GateRecord, GateRepository, PartyRecord, PartyRepository,
    RedeliveryQuery, RedeliveryRecord, RedeliveryRepository, ReleaseQuery, ReleaseRecord,
    ReleaseRepository, RepositoryError, WorkOrderRecord, WorkOrderRepository,
};
use crate::lifecycle::{lifecycle_router, DepotLifecycleService, InMemoryDepotStore, TokenIssuer};

pub(super) const STATIC_TOKEN: &str = "depot-static-token";

pub(super) fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub(super) fn seeded_service() -> DepotLifecycleService<InMemoryDepotStore> {
    let service = DepotLifecycleService::new(Arc::new(InMemoryDepotStore::new()));
    fixtures::seed(&service).expect("fixtures seed");
    service
}

pub(super) fn gate_request(advice_number: &str, gate_type: GateType, unit_number: &str) -> GateCreateRequest {
    GateCreateRequest {
        advice_number: advice_number.to_string(),
        depot: Party::reference(DEPOT_ONE),
        customer: None,
        gate_type,
        unit_number: unit_number.to_string(),
        equipment: None,
        status: UnitCondition::Damaged,
        activity_time: now() - Duration::hours(2),
        transport_company: Some("Hamburg Trucking".to_string()),
        transportation: None,
        comments: None,
        photos: Vec::new(),
    }
}

pub(super) fn gate_in(unit_number: &str) -> GateCreateRequest {
    gate_request(REDELIVERY_NUMBER, GateType::In, unit_number)
}

pub(super) fn gate_out(unit_number: &str) -> GateCreateRequest {
    gate_request(RELEASE_NUMBER, GateType::Out, unit_number)
}

pub(super) fn line(
    line_number: u32,
    hours: i64,
    material: i64,
    responsibility: Responsibility,
) -> EstimateLineItem {
    EstimateLineItem {
        line_number,
        damage_location_code: "LX2N".to_string(),
        component_code: "PAA".to_string(),
        damage_code: "DT".to_string(),
        repair_code: "IT".to_string(),
        length: None,
        width: None,
        quantity: None,
        hours: Decimal::from(hours),
        material: Some(Decimal::from(material)),
        responsibility,
        comments: None,
        parts: Vec::new(),
        photos: Vec::new(),
    }
}

pub(super) fn estimate(
    estimate_number: &str,
    unit_number: &str,
    line_items: Vec<EstimateLineItem>,
) -> Estimate {
    Estimate {
        estimate_number: estimate_number.to_string(),
        revision: 0,
        depot: Party::reference(DEPOT_ONE),
        customer: None,
        owner: None,
        unit_number: unit_number.to_string(),
        equipment: None,
        estimate_time: now() - Duration::hours(1),
        currency: "USD".to_string(),
        labour_rate: Decimal::from(40),
        depreciated_value: None,
        comments: None,
        line_items,
        photos: Vec::new(),
    }
}

pub(super) fn work_order(work_order_number: &str, units: &[(&str, &str)]) -> WorkOrder {
    WorkOrder {
        work_order_number: work_order_number.to_string(),
        depot: Party::reference(DEPOT_ONE),
        approval_time: None,
        comments: None,
        units: units
            .iter()
            .map(|(unit_number, estimate_number)| WorkOrderUnit {
                unit_number: unit_number.to_string(),
                estimate_number: estimate_number.to_string(),
                comments: None,
                repair_complete_time: None,
            })
            .collect(),
    }
}

pub(super) fn issuer() -> Arc<TokenIssuer> {
    let mut config = AuthConfig::development();
    config.static_tokens = vec![STATIC_TOKEN.to_string()];
    Arc::new(TokenIssuer::new(config))
}

pub(super) fn router_with_service(service: DepotLifecycleService<InMemoryDepotStore>) -> axum::Router {
    lifecycle_router(Arc::new(service), issuer())
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {STATIC_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {STATIC_TOKEN}"))
        .body(Body::empty())
        .expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

pub(super) struct UnavailableStore;

impl PartyRepository for UnavailableStore {
    fn register_party(&self, _party: Party) -> Result<PartyRecord, RepositoryError> {
        offline()
    }

    fn find_party(&self, _company_id: &str) -> Result<Option<PartyRecord>, RepositoryError> {
        offline()
    }

    fn parties(&self) -> Result<Vec<PartyRecord>, RepositoryError> {
        offline()
    }
}

impl ReleaseRepository for UnavailableStore {
    fn insert_release(&self, _release: Release) -> Result<ReleaseRecord, RepositoryError> {
        offline()
    }

    fn replace_release(&self, _release: Release) -> Result<ReleaseRecord, RepositoryError> {
        offline()
    }

    fn find_release(&self, _release_number: &str) -> Result<Option<ReleaseRecord>, RepositoryError> {
        offline()
    }

    fn search_releases(
        &self,
        _query: &ReleaseQuery,
        _now: DateTime<FixedOffset>,
    ) -> Result<Vec<ReleaseRecord>, RepositoryError> {
        offline()
    }
}

impl RedeliveryRepository for UnavailableStore {
    fn insert_redelivery(&self, _redelivery: Redelivery) -> Result<RedeliveryRecord, RepositoryError> {
        offline()
    }

    fn replace_redelivery(
        &self,
        _redelivery: Redelivery,
    ) -> Result<RedeliveryRecord, RepositoryError> {
        offline()
    }

    fn find_redelivery(
        &self,
        _redelivery_number: &str,
    ) -> Result<Option<RedeliveryRecord>, RepositoryError> {
        offline()
    }

    fn search_redeliveries(
        &self,
        _query: &RedeliveryQuery,
        _now: DateTime<FixedOffset>,
    ) -> Result<Vec<RedeliveryRecord>, RepositoryError> {
        offline()
    }
}

impl GateRepository for UnavailableStore {
    fn insert_gate(
        &self,
        _request: GateCreateRequest,
        _response: GateResponse,
        _limit: usize,
    ) -> Result<GateRecord, RepositoryError> {
        offline()
    }

    fn replace_gate(&self, _record: GateRecord) -> Result<GateRecord, RepositoryError> {
        offline()
    }

    fn find_gate(
        &self,
        _advice_number: &str,
        _unit_number: &str,
    ) -> Result<Option<GateRecord>, RepositoryError> {
        offline()
    }

    fn latest_gate(&self, _unit_number: &str) -> Result<Option<GateRecord>, RepositoryError> {
        offline()
    }
}

impl EstimateRepository for UnavailableStore {
    fn insert_estimate(
        &self,
        _estimate: Estimate,
        _allocation: EstimateAllocation,
    ) -> Result<EstimateRecord, RepositoryError> {
        offline()
    }

    fn replace_estimate(&self, _record: EstimateRecord) -> Result<EstimateRecord, RepositoryError> {
        offline()
    }

    fn find_estimate(&self, _estimate_number: &str) -> Result<Option<EstimateRecord>, RepositoryError> {
        offline()
    }
}

impl WorkOrderRepository for UnavailableStore {
    fn insert_work_order(&self, _work_order: WorkOrder) -> Result<WorkOrderRecord, RepositoryError> {
        offline()
    }

    fn replace_work_order(&self, _record: WorkOrderRecord) -> Result<WorkOrderRecord, RepositoryError> {
        offline()
    }

    fn find_work_order(
        &self,
        _work_order_number: &str,
    ) -> Result<Option<WorkOrderRecord>, RepositoryError> {
        offline()
    }
}
