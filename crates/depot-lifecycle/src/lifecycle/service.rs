use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{info, warn};

use super::allocation::{allocate, AmountOverflow};
use super::repository::{
    DepotRepository, EstimateRecord, GateRecord, PartyRecord, RedeliveryQuery, ReleaseQuery,
    RepositoryError,
};
use super::rules::BusinessViolation;
use crate::domain::{
    list_or_empty, Estimate, EstimateAllocation, EstimateCustomerApproval, EstimateId, GateCreateRequest,
    GateResponse, GateStatus, GateType, GateUpdateRequest, InsuranceCoverage, Party,
    PartyReferences, Redelivery, Release, RepairComplete, Responsibility, WorkOrder,
};
use crate::error::ApiError;

/// Inspection standard reported when neither the unit nor its detail names one.
pub const DEFAULT_INSPECTION_CRITERIA: &str = "IICL";

/// Service applying the depot lifecycle rules on top of a repository.
pub struct DepotLifecycleService<R> {
    repository: Arc<R>,
}

impl<R> DepotLifecycleService<R>
where
    R: DepotRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }

    pub fn register_party(&self, party: Party) -> Result<PartyRecord, LifecycleServiceError> {
        let company_id = party.company_id.clone();
        let record = self
            .repository
            .register_party(party)
            .map_err(|err| conflict_as(err, "party", &company_id))?;
        info!(company_id = %company_id, "party registered");
        Ok(record)
    }

    pub fn party(&self, company_id: &str) -> Result<PartyRecord, LifecycleServiceError> {
        self.repository
            .find_party(company_id)?
            .ok_or_else(|| LifecycleServiceError::not_found("party", company_id))
    }

    /// Swap every party handle in `record` for the registered party with the same company id.
    pub fn resolve_parties<T: PartyReferences>(
        &self,
        record: &mut T,
    ) -> Result<(), LifecycleServiceError> {
        let mut unknown: Vec<String> = Vec::new();
        for handle in record.party_refs_mut() {
            match self.repository.find_party(&handle.company_id)? {
                Some(registered) => *handle = registered.party,
                None if unknown.contains(&handle.company_id) => {}
                None => {
                    warn!(company_id = %handle.company_id, "rejected unknown party");
                    unknown.push(handle.company_id.clone());
                }
            }
        }

        let violations = unknown
            .into_iter()
            .map(|company_id| BusinessViolation::UnknownParty { company_id })
            .collect();
        match BusinessViolation::from_all(violations) {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    pub fn create_release(&self, mut release: Release) -> Result<Release, LifecycleServiceError> {
        self.resolve_parties(&mut release)?;
        let number = release.release_number.clone();
        let record = self
            .repository
            .insert_release(release)
            .map_err(|err| conflict_as(err, "release", &number))?;
        info!(release = %number, id = %record.id, details = record.release.details.len(), "release created");
        Ok(record.release)
    }

    /// Replace a release aggregate, details and units included.
    pub fn update_release(
        &self,
        release_number: &str,
        mut release: Release,
    ) -> Result<Release, LifecycleServiceError> {
        ensure_same_number("release", release_number, &release.release_number)?;
        self.resolve_parties(&mut release)?;
        let record = self
            .repository
            .replace_release(release)
            .map_err(|err| missing_as(err, "release", release_number))?;
        info!(release = %release_number, "release replaced");
        Ok(record.release)
    }

    pub fn search_releases(&self, query: &ReleaseQuery) -> Result<Vec<Release>, LifecycleServiceError> {
        let records = self.repository.search_releases(query, self.now())?;
        Ok(records.into_iter().map(|record| record.release).collect())
    }

    pub fn create_redelivery(
        &self,
        mut redelivery: Redelivery,
    ) -> Result<Redelivery, LifecycleServiceError> {
        self.resolve_parties(&mut redelivery)?;
        let number = redelivery.redelivery_number.clone();
        let record = self
            .repository
            .insert_redelivery(redelivery)
            .map_err(|err| conflict_as(err, "redelivery", &number))?;
        info!(redelivery = %number, id = %record.id, details = record.redelivery.details.len(), "redelivery created");
        Ok(record.redelivery)
    }

    pub fn update_redelivery(
        &self,
        redelivery_number: &str,
        mut redelivery: Redelivery,
    ) -> Result<Redelivery, LifecycleServiceError> {
        ensure_same_number("redelivery", redelivery_number, &redelivery.redelivery_number)?;
        self.resolve_parties(&mut redelivery)?;
        let record = self
            .repository
            .replace_redelivery(redelivery)
            .map_err(|err| missing_as(err, "redelivery", redelivery_number))?;
        info!(redelivery = %redelivery_number, "redelivery replaced");
        Ok(record.redelivery)
    }

    pub fn search_redeliveries(
        &self,
        query: &RedeliveryQuery,
    ) -> Result<Vec<Redelivery>, LifecycleServiceError> {
        let records = self.repository.search_redeliveries(query, self.now())?;
        Ok(records.into_iter().map(|record| record.redelivery).collect())
    }

    /// Record a gate movement against the redelivery (IN) or release (OUT) named by its advice.
    pub fn create_gate(
        &self,
        mut request: GateCreateRequest,
    ) -> Result<GateResponse, LifecycleServiceError> {
        self.resolve_parties(&mut request)?;
        let (mut response, quantity) = match request.gate_type {
            GateType::In => self.admit_gate_in(&request)?,
            GateType::Out => self.admit_gate_out(&request)?,
        };

        let advice_number = request.advice_number.clone();
        let unit_number = request.unit_number.clone();
        let gate_type = request.gate_type;
        let mut record = self
            .repository
            .insert_gate(request, response.clone(), quantity as usize)
            .map_err(|err| match err {
                RepositoryError::Conflict => BusinessViolation::DuplicateGate {
                    advice_number: advice_number.clone(),
                    unit_number: unit_number.clone(),
                    gate_type,
                }
                .into(),
                RepositoryError::LimitReached => BusinessViolation::QuantityExhausted {
                    advice_number: response.advice_number.clone(),
                    quantity,
                }
                .into(),
                other => LifecycleServiceError::Repository(other),
            })?;

        response.transaction_reference = Some(record.id.to_string());
        record.response = response.clone();
        self.repository.replace_gate(record)?;

        info!(
            advice = %advice_number,
            unit = %unit_number,
            gate = gate_type.label(),
            "gate recorded"
        );
        Ok(response)
    }

    /// The response for an admitted gate in, with the redelivery's authorized quantity.
    fn admit_gate_in(
        &self,
        request: &GateCreateRequest,
    ) -> Result<(GateResponse, u32), LifecycleServiceError> {
        let unauthorized = || BusinessViolation::NoAuthorization {
            kind: "redelivery",
            advice_number: request.advice_number.clone(),
            unit_number: request.unit_number.clone(),
        };
        let redelivery = self
            .repository
            .find_redelivery(&request.advice_number)?
            .map(|record| record.redelivery)
            .filter(|redelivery| redelivery.is_active(self.now()))
            .ok_or_else(unauthorized)?;
        ensure_depot(&request.advice_number, redelivery.depot.as_ref(), request)?;

        let detail = redelivery
            .detail_for(&request.unit_number, request.equipment.as_deref())
            .ok_or_else(unauthorized)?;
        let criteria = detail
            .inspection_criteria_for(&request.unit_number)
            .unwrap_or(DEFAULT_INSPECTION_CRITERIA);
        let comments = detail
            .unit(&request.unit_number)
            .and_then(|unit| unit.comments.clone());
        let response = GateResponse {
            code: Some("GTI200".to_string()),
            message: Some(format!("gate in accepted under redelivery {}", redelivery.redelivery_number)),
            advice_number: redelivery.redelivery_number.clone(),
            customer_reference: Some(detail.contract.clone()),
            transaction_reference: None,
            insurance_coverage: detail.insurance_coverage.clone(),
            current_exchange_rate: None,
            comments,
            current_inspection_criteria: criteria.to_string(),
        };
        Ok((response, redelivery.quantity))
    }

    fn admit_gate_out(
        &self,
        request: &GateCreateRequest,
    ) -> Result<(GateResponse, u32), LifecycleServiceError> {
        let unauthorized = || BusinessViolation::NoAuthorization {
            kind: "release",
            advice_number: request.advice_number.clone(),
            unit_number: request.unit_number.clone(),
        };
        let release = self
            .repository
            .find_release(&request.advice_number)?
            .map(|record| record.release)
            .filter(|release| release.is_active(self.now()))
            .ok_or_else(unauthorized)?;
        ensure_depot(&request.advice_number, release.depot.as_ref(), request)?;

        let detail = release
            .detail_for(&request.unit_number, request.equipment.as_deref())
            .ok_or_else(unauthorized)?;
        let comments = detail
            .unit(&request.unit_number)
            .and_then(|unit| unit.comments.clone());
        let response = GateResponse {
            code: Some("GTO200".to_string()),
            message: Some(format!("gate out accepted under release {}", release.release_number)),
            advice_number: release.release_number.clone(),
            customer_reference: Some(detail.contract.clone()),
            transaction_reference: None,
            insurance_coverage: None,
            current_exchange_rate: None,
            comments,
            current_inspection_criteria: detail.grade.clone(),
        };
        Ok((response, release.quantity))
    }

    /// Apply corrections to the latest movement of `unit_number` under the given advice.
    pub fn update_gate(
        &self,
        unit_number: &str,
        update: GateUpdateRequest,
    ) -> Result<GateResponse, LifecycleServiceError> {
        let mut record: GateRecord = self
            .repository
            .find_gate(&update.advice_number, unit_number)?
            .ok_or_else(|| {
                LifecycleServiceError::not_found(
                    "gate",
                    format!("{unit_number} under {}", update.advice_number),
                )
            })?;

        let request = &mut record.request;
        if let Some(gate_type) = update.gate_type {
            request.gate_type = gate_type;
        }
        if let Some(status) = update.status {
            request.status = status;
        }
        if let Some(activity_time) = update.activity_time {
            request.activity_time = activity_time;
        }
        if update.comments.is_some() {
            request.comments = update.comments;
        }
        if let Some(photos) = update.photos {
            request.photos = photos;
        }
        record.response.message = Some(format!("gate for {unit_number} corrected"));

        let gate_type = record.request.gate_type;
        let record = self
            .repository
            .replace_gate(record)
            .map_err(|err| match err {
                RepositoryError::Conflict => BusinessViolation::DuplicateGate {
                    advice_number: update.advice_number.clone(),
                    unit_number: unit_number.to_string(),
                    gate_type,
                }
                .into(),
                other => LifecycleServiceError::Repository(other),
            })?;
        info!(advice = %update.advice_number, unit = %unit_number, "gate corrected");
        Ok(record.response)
    }

    pub fn gate_status(&self, unit_number: &str) -> Result<GateStatus, LifecycleServiceError> {
        let record = self
            .repository
            .latest_gate(unit_number)?
            .ok_or_else(|| LifecycleServiceError::not_found("gate", unit_number))?;
        let request = record.request;
        Ok(GateStatus {
            advice_number: request.advice_number,
            unit_number: request.unit_number,
            gate_type: request.gate_type,
            status: request.status,
            activity_time: request.activity_time,
            depot: request.depot,
        })
    }

    /// Accept a first estimate for a unit that is gated in at the estimating depot.
    pub fn create_estimate(
        &self,
        mut estimate: Estimate,
    ) -> Result<EstimateAllocation, LifecycleServiceError> {
        self.resolve_parties(&mut estimate)?;
        let coverage = self.coverage_for_gated_unit(&estimate)?;
        // the repository assigns the real id on insert
        let allocation = allocate(EstimateId(0), &estimate, coverage.as_ref())?;

        let number = estimate.estimate_number.clone();
        let record = self
            .repository
            .insert_estimate(estimate, allocation)
            .map_err(|err| match err {
                RepositoryError::Conflict => BusinessViolation::DuplicateEstimate {
                    number: number.clone(),
                }
                .into(),
                other => LifecycleServiceError::Repository(other),
            })?;
        info!(estimate = %number, id = %record.id, total = %record.allocation.total, "estimate accepted");
        Ok(record.allocation)
    }

    pub fn revise_estimate(
        &self,
        estimate_number: &str,
        mut estimate: Estimate,
    ) -> Result<EstimateAllocation, LifecycleServiceError> {
        ensure_same_number("estimate", estimate_number, &estimate.estimate_number)?;
        let current = self.estimate(estimate_number)?;
        if current.is_approved() {
            return Err(BusinessViolation::EstimateApproved {
                number: estimate_number.to_string(),
            }
            .into());
        }
        if estimate.revision <= current.estimate.revision {
            return Err(BusinessViolation::RevisionNotIncreasing {
                number: estimate_number.to_string(),
                current: current.estimate.revision,
                submitted: estimate.revision,
            }
            .into());
        }

        self.resolve_parties(&mut estimate)?;
        let coverage = self.coverage_for_gated_unit(&estimate)?;
        let allocation = allocate(current.id, &estimate, coverage.as_ref())?;
        let record = self.repository.replace_estimate(EstimateRecord {
            id: current.id,
            estimate,
            allocation,
            approval: None,
        })?;
        info!(estimate = %estimate_number, revision = record.estimate.revision, "estimate revised");
        Ok(record.allocation)
    }

    /// Record the customer accepting their share; the approved total must match it exactly.
    pub fn approve_estimate(
        &self,
        estimate_number: &str,
        approval: EstimateCustomerApproval,
    ) -> Result<EstimateAllocation, LifecycleServiceError> {
        let mut record = self.estimate(estimate_number)?;
        if record.is_approved() {
            return Err(BusinessViolation::EstimateApproved {
                number: estimate_number.to_string(),
            }
            .into());
        }
        let expected = record.allocation.total_for(Responsibility::Customer);
        if approval.approval_total != expected {
            warn!(estimate = %estimate_number, %expected, submitted = %approval.approval_total, "approval total mismatch");
            return Err(BusinessViolation::ApprovalMismatch {
                number: estimate_number.to_string(),
                expected,
                submitted: approval.approval_total,
            }
            .into());
        }

        let approval_number = approval.approval_number.clone();
        record.approval = Some(approval);
        let record = self.repository.replace_estimate(record)?;
        info!(estimate = %estimate_number, approval = %approval_number, "estimate approved by customer");
        Ok(record.allocation)
    }

    pub fn estimate(&self, estimate_number: &str) -> Result<EstimateRecord, LifecycleServiceError> {
        self.repository
            .find_estimate(estimate_number)?
            .ok_or_else(|| LifecycleServiceError::not_found("estimate", estimate_number))
    }

    /// The unit must currently be gated in at the estimating depot; its redelivery detail may
    /// carry insurance coverage.
    fn coverage_for_gated_unit(
        &self,
        estimate: &Estimate,
    ) -> Result<Option<InsuranceCoverage>, LifecycleServiceError> {
        let gate = self
            .repository
            .latest_gate(&estimate.unit_number)?
            .filter(|gate| {
                gate.request.gate_type == GateType::In
                    && gate.request.depot.company_id == estimate.depot.company_id
            })
            .ok_or_else(|| BusinessViolation::NotGatedIn {
                unit_number: estimate.unit_number.clone(),
                depot: estimate.depot.company_id.clone(),
            })?;

        let coverage = self
            .repository
            .find_redelivery(&gate.request.advice_number)?
            .and_then(|record| {
                record
                    .redelivery
                    .detail_for(&estimate.unit_number, estimate.equipment.as_deref())
                    .and_then(|detail| detail.insurance_coverage.clone())
            });
        Ok(coverage)
    }

    /// Approve estimates for repair; every unit must name an estimate written for it.
    pub fn create_work_order(
        &self,
        mut work_order: WorkOrder,
    ) -> Result<WorkOrder, LifecycleServiceError> {
        self.resolve_parties(&mut work_order)?;
        let mut violations = Vec::new();
        for unit in &mut work_order.units {
            unit.repair_complete_time = None;
            match self.repository.find_estimate(&unit.estimate_number)? {
                None => violations.push(BusinessViolation::UnknownEstimate {
                    estimate_number: unit.estimate_number.clone(),
                }),
                Some(record)
                    if !record
                        .estimate
                        .unit_number
                        .eq_ignore_ascii_case(&unit.unit_number) =>
                {
                    violations.push(BusinessViolation::EstimateUnitMismatch {
                        estimate_number: unit.estimate_number.clone(),
                        estimate_unit: record.estimate.unit_number,
                        unit_number: unit.unit_number.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        if let Some(violation) = BusinessViolation::from_all(violations) {
            warn!(work_order = %work_order.work_order_number, "rejected work order units");
            return Err(violation.into());
        }
        if work_order.approval_time.is_none() {
            work_order.approval_time = Some(self.now());
        }

        let number = work_order.work_order_number.clone();
        let record = self
            .repository
            .insert_work_order(work_order)
            .map_err(|err| conflict_as(err, "work order", &number))?;
        info!(work_order = %number, units = record.work_order.units.len(), "work order created");
        Ok(record.work_order)
    }

    pub fn complete_repair(
        &self,
        work_order_number: &str,
        repair: RepairComplete,
    ) -> Result<WorkOrder, LifecycleServiceError> {
        let mut record = self
            .repository
            .find_work_order(work_order_number)?
            .ok_or_else(|| LifecycleServiceError::not_found("work order", work_order_number))?;

        let unit = record
            .work_order
            .unit_mut(&repair.unit_number)
            .ok_or_else(|| BusinessViolation::UnitNotOnWorkOrder {
                work_order_number: work_order_number.to_string(),
                unit_number: repair.unit_number.clone(),
            })?;
        if unit.repair_complete_time.is_some() {
            return Err(BusinessViolation::RepairAlreadyComplete {
                work_order_number: work_order_number.to_string(),
                unit_number: repair.unit_number.clone(),
            }
            .into());
        }
        unit.repair_complete_time = Some(repair.completion_time);
        if !list_or_empty(&repair.comments).is_empty() {
            unit.comments
                .get_or_insert_with(Vec::new)
                .extend(list_or_empty(&repair.comments).iter().cloned());
        }

        let record = self.repository.replace_work_order(record)?;
        info!(work_order = %work_order_number, unit = %repair.unit_number, "repair completed");
        Ok(record.work_order)
    }
}

fn ensure_same_number(
    kind: &'static str,
    path: &str,
    body: &str,
) -> Result<(), LifecycleServiceError> {
    if path.eq_ignore_ascii_case(body) {
        Ok(())
    } else {
        Err(LifecycleServiceError::NumberMismatch {
            kind,
            path: path.to_string(),
            body: body.to_string(),
        })
    }
}

fn ensure_depot(
    advice_number: &str,
    addressed_to: Option<&crate::domain::PartyRef>,
    request: &GateCreateRequest,
) -> Result<(), BusinessViolation> {
    match addressed_to {
        Some(depot) if depot.company_id != request.depot.company_id => {
            Err(BusinessViolation::WrongDepot {
                advice_number: advice_number.to_string(),
                depot: request.depot.company_id.clone(),
            })
        }
        _ => Ok(()),
    }
}

fn conflict_as(err: RepositoryError, kind: &'static str, number: &str) -> LifecycleServiceError {
    match err {
        RepositoryError::Conflict => BusinessViolation::Duplicate {
            kind,
            number: number.to_string(),
        }
        .into(),
        other => LifecycleServiceError::Repository(other),
    }
}

fn missing_as(err: RepositoryError, kind: &'static str, number: &str) -> LifecycleServiceError {
    match err {
        RepositoryError::NotFound => LifecycleServiceError::not_found(kind, number),
        other => LifecycleServiceError::Repository(other),
    }
}

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleServiceError {
    #[error(transparent)]
    Rule(#[from] BusinessViolation),
    #[error("{kind} {number} not found")]
    NotFound { kind: &'static str, number: String },
    #[error("{kind} number {body} in the body does not match {path} in the path")]
    NumberMismatch {
        kind: &'static str,
        path: String,
        body: String,
    },
    #[error(transparent)]
    Amount(#[from] AmountOverflow),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LifecycleServiceError {
    pub fn not_found(kind: &'static str, number: impl Into<String>) -> Self {
        LifecycleServiceError::NotFound {
            kind,
            number: number.into(),
        }
    }
}

impl From<LifecycleServiceError> for ApiError {
    fn from(value: LifecycleServiceError) -> Self {
        match value {
            LifecycleServiceError::Rule(violation) => ApiError::Business(violation),
            LifecycleServiceError::NotFound { .. } => ApiError::NotFound(value.to_string()),
            LifecycleServiceError::NumberMismatch { .. } | LifecycleServiceError::Amount(_) => {
                ApiError::malformed(value.to_string())
            }
            LifecycleServiceError::Repository(RepositoryError::NotFound) => {
                ApiError::NotFound(value.to_string())
            }
            LifecycleServiceError::Repository(err) => ApiError::Unavailable(err.to_string()),
        }
    }
}
