use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Estimate, EstimateAllocation, EstimateCustomerApproval, EstimateId, GateCreateRequest, GateId,
    GateResponse, Party, PartyId, PartyRef, Redelivery, RedeliveryId, Release,
    ReleaseId, WorkOrder, WorkOrderId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PartyRecord {
    pub id: PartyId,
    pub party: PartyRef,
}

/// A stored release aggregate; details and units are owned by it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRecord {
    pub id: ReleaseId,
    pub release: Release,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedeliveryRecord {
    pub id: RedeliveryId,
    pub redelivery: Redelivery,
    pub updated_at: DateTime<Utc>,
}

/// A gate movement together with the response handed back to the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRecord {
    pub id: GateId,
    pub request: GateCreateRequest,
    pub response: GateResponse,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRecord {
    pub id: EstimateId,
    pub estimate: Estimate,
    pub allocation: EstimateAllocation,
    pub approval: Option<EstimateCustomerApproval>,
}

impl EstimateRecord {
    pub fn is_approved(&self) -> bool {
        self.approval.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderRecord {
    pub id: WorkOrderId,
    pub work_order: WorkOrder,
}

/// Release search filters, bound from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseQuery {
    pub release_number: Option<String>,
    pub unit_number: Option<String>,
    /// Company id of the depot the release is addressed to.
    pub depot: Option<String>,
    /// Only releases usable at the gate right now.
    #[serde(default)]
    pub gate_check: bool,
}

impl ReleaseQuery {
    pub fn matches(&self, release: &Release, now: DateTime<FixedOffset>) -> bool {
        let number = self
            .release_number
            .as_deref()
            .map_or(true, |number| release.release_number.eq_ignore_ascii_case(number));
        let unit = self
            .unit_number
            .as_deref()
            .map_or(true, |unit| release.contains_unit(unit));
        let depot = self
            .depot
            .as_deref()
            .map_or(true, |company_id| release.served_by(company_id));
        number && unit && depot && (!self.gate_check || release.is_active(now))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeliveryQuery {
    pub redelivery_number: Option<String>,
    pub unit_number: Option<String>,
    pub depot: Option<String>,
    #[serde(default)]
    pub gate_check: bool,
}

impl RedeliveryQuery {
    pub fn matches(&self, redelivery: &Redelivery, now: DateTime<FixedOffset>) -> bool {
        let number = self.redelivery_number.as_deref().map_or(true, |number| {
            redelivery.redelivery_number.eq_ignore_ascii_case(number)
        });
        let unit = self
            .unit_number
            .as_deref()
            .map_or(true, |unit| redelivery.contains_unit(unit));
        let depot = self
            .depot
            .as_deref()
            .map_or(true, |company_id| redelivery.served_by(company_id));
        number && unit && depot && (!self.gate_check || redelivery.is_active(now))
    }
}

/// Registry of the parties every other record refers to.
pub trait PartyRepository: Send + Sync {
    fn register_party(&self, party: Party) -> Result<PartyRecord, RepositoryError>;
    fn find_party(&self, company_id: &str) -> Result<Option<PartyRecord>, RepositoryError>;
    fn parties(&self) -> Result<Vec<PartyRecord>, RepositoryError>;
}

/// Release aggregates, always written whole.
pub trait ReleaseRepository: Send + Sync {
    fn insert_release(&self, release: Release) -> Result<ReleaseRecord, RepositoryError>;
    /// Swap the stored aggregate for `release`, keeping its id.
    fn replace_release(&self, release: Release) -> Result<ReleaseRecord, RepositoryError>;
    fn find_release(&self, release_number: &str) -> Result<Option<ReleaseRecord>, RepositoryError>;
    fn search_releases(
        &self,
        query: &ReleaseQuery,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<ReleaseRecord>, RepositoryError>;
}

pub trait RedeliveryRepository: Send + Sync {
    fn insert_redelivery(&self, redelivery: Redelivery)
        -> Result<RedeliveryRecord, RepositoryError>;
    fn replace_redelivery(
        &self,
        redelivery: Redelivery,
    ) -> Result<RedeliveryRecord, RepositoryError>;
    fn find_redelivery(
        &self,
        redelivery_number: &str,
    ) -> Result<Option<RedeliveryRecord>, RepositoryError>;
    fn search_redeliveries(
        &self,
        query: &RedeliveryQuery,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<RedeliveryRecord>, RepositoryError>;
}

pub trait GateRepository: Send + Sync {
    /// Conflicts when the same advice, unit and direction were already recorded. Fails with
    /// `LimitReached` once `limit` movements in that direction exist under the advice.
    fn insert_gate(
        &self,
        request: GateCreateRequest,
        response: GateResponse,
        limit: usize,
    ) -> Result<GateRecord, RepositoryError>;
    /// Conflicts when the corrected record would repeat another record's advice, unit and
    /// direction.
    fn replace_gate(&self, record: GateRecord) -> Result<GateRecord, RepositoryError>;
    /// Most recent movement of `unit_number` under `advice_number`.
    fn find_gate(
        &self,
        advice_number: &str,
        unit_number: &str,
    ) -> Result<Option<GateRecord>, RepositoryError>;
    /// Most recent movement of `unit_number` under any advice.
    fn latest_gate(&self, unit_number: &str) -> Result<Option<GateRecord>, RepositoryError>;
}

pub trait EstimateRepository: Send + Sync {
    /// Store a new estimate; the assigned id is written into `allocation.id`.
    fn insert_estimate(
        &self,
        estimate: Estimate,
        allocation: EstimateAllocation,
    ) -> Result<EstimateRecord, RepositoryError>;
    fn replace_estimate(&self, record: EstimateRecord) -> Result<EstimateRecord, RepositoryError>;
    fn find_estimate(
        &self,
        estimate_number: &str,
    ) -> Result<Option<EstimateRecord>, RepositoryError>;
}

pub trait WorkOrderRepository: Send + Sync {
    fn insert_work_order(&self, work_order: WorkOrder)
        -> Result<WorkOrderRecord, RepositoryError>;
    fn replace_work_order(
        &self,
        record: WorkOrderRecord,
    ) -> Result<WorkOrderRecord, RepositoryError>;
    fn find_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Option<WorkOrderRecord>, RepositoryError>;
}

/// Everything the lifecycle service persists.
pub trait DepotRepository:
    PartyRepository
    + ReleaseRepository
    + RedeliveryRepository
    + GateRepository
    + EstimateRepository
    + WorkOrderRepository
{
}

impl<T> DepotRepository for T where
    T: PartyRepository
        + ReleaseRepository
        + RedeliveryRepository
        + GateRepository
        + EstimateRepository
        + WorkOrderRepository
{
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("advice limit reached")]
    LimitReached,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
